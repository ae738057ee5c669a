use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use metatoken::{
    batch::source_name,
    config::{OutputMode, RunSettings},
    export,
    invocation::{check_clear_is_safe, ensure_empty_directory, run_prefix, save_record},
    text::StemAlgorithm,
    Collator, RecordShaper, TableLoader, TableWriter,
};
use serde::Serialize;
use std::{fs, path::PathBuf};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Extract fields and tokenized descriptions from data dictionary files.
#[derive(Parser, Debug, Serialize)]
#[command(author, version, about)]
struct Args {
    /// Source file, or directory when --is-directory is given
    #[arg(short, long)]
    src_path: PathBuf,

    /// Treat src_path as a directory of data dictionaries
    #[arg(short = 'd', long)]
    is_directory: bool,

    /// Directory receiving output files
    #[arg(short, long, default_value = ".")]
    target_dir: PathBuf,

    /// File-name suffix selecting inputs in directory mode
    #[arg(short = 'e', long, default_value = ".txt")]
    suffix: String,

    /// Column delimiter of the input files
    #[arg(long, default_value_t = '\t')]
    delimiter: char,

    /// Last column of each input is a classification label
    #[arg(short, long)]
    labeled: bool,

    #[arg(short, long, value_enum, default_value_t = OutputMode::Tokenized)]
    output_type: OutputMode,

    /// Stemmer used to recognise description headers
    #[arg(long, value_enum, default_value_t = StemAlgorithm::Lancaster)]
    stemmer: StemAlgorithm,

    /// Also write each file's export separately
    #[arg(long)]
    save_each: bool,

    /// Empty target_dir before writing
    #[arg(long)]
    clear_target: bool,
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();
    let delimiter = u8::try_from(args.delimiter)
        .with_context(|| format!("delimiter {:?} is not a single byte", args.delimiter))?;

    // ─── 2) prepare target ───────────────────────────────────────────
    if args.clear_target {
        check_clear_is_safe(&args.src_path, &args.target_dir)?;
        let state = ensure_empty_directory(&args.target_dir)?;
        info!(dir = %args.target_dir.display(), ?state, "target prepared");
    } else {
        fs::create_dir_all(&args.target_dir)
            .with_context(|| format!("creating {:?}", args.target_dir))?;
    }

    let prefix = run_prefix(Local::now());
    save_record(&args, &args.target_dir, &prefix)?;

    let settings = RunSettings {
        output_mode: args.output_type,
        stemmer: args.stemmer,
        input_delimiter: delimiter,
        suffix: args.suffix.clone(),
        ..RunSettings::default()
    };
    let collator = Collator::new(
        TableLoader::new(settings.input_delimiter),
        RecordShaper::new(settings.stemmer.build(), settings.shape_options(args.labeled)),
    );
    let writer = TableWriter::new(settings.output_mode.column_delimiter());
    let ext = settings.output_mode.extension();

    // ─── 3) single file: errors surface directly ─────────────────────
    if !args.is_directory {
        let dataset = collator
            .process_one(&args.src_path)
            .with_context(|| format!("processing {:?}", args.src_path))?;
        let table = export::render(&dataset, settings.output_mode)?;
        let name = format!("{prefix}_ProcessedDF {}.{ext}", source_name(&args.src_path));
        writer.write(&table, args.target_dir.join(name))?;
        return Ok(());
    }

    // ─── 4) directory: collect successes and failures ────────────────
    let report = collator.process_many(&args.src_path, &settings.suffix)?;

    if args.save_each {
        for (path, dataset) in report.processed() {
            let table = export::render(dataset, settings.output_mode)?;
            let name = format!("{prefix}_ProcessedDF {}.{ext}", source_name(path));
            writer.write(&table, args.target_dir.join(name))?;
        }
    }

    for failure in &report.failures {
        error!("{}", failure);
    }

    // ─── 5) collate & write ──────────────────────────────────────────
    let collated = report.collate();
    if collated.is_empty() {
        info!("no records collated; nothing saved");
        return Ok(());
    }

    let table = export::render(&collated, settings.output_mode)?;
    writer.write(&table, args.target_dir.join(format!("{prefix}collated.{ext}")))?;

    for rec in collated.iter().take(5) {
        info!(source = %rec.source, field = %rec.field, tokens = %rec.description, "preview");
    }

    info!(
        records = collated.len(),
        rejected = report.failures.len(),
        "all done"
    );
    Ok(())
}

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use metatoken::{
    config::{OutputMode, RunSettings, STATUS_SHEET},
    export,
    invocation::{run_prefix, save_record},
    text::StemAlgorithm,
    Collator, RecordShaper, TableLoader, TableWriter,
};
use serde::Serialize;
use std::{fs, path::PathBuf};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Extract fields, labels and tokenized descriptions from every sheet of a
/// data dictionary workbook.
#[derive(Parser, Debug, Serialize)]
#[command(author, version, about)]
struct Args {
    /// Workbook (.xlsx, .xlsm, .xls, .ods)
    #[arg(short, long)]
    src_path: PathBuf,

    /// Directory receiving the output file
    #[arg(short, long, default_value = ".")]
    target_dir: PathBuf,

    /// `tokenized` (tab-separated) or `training` / `bert` (category,text)
    #[arg(short, long, value_enum, default_value_t = OutputMode::Tokenized)]
    output_type: OutputMode,

    /// Stemmer used to recognise description headers
    #[arg(long, value_enum, default_value_t = StemAlgorithm::Lancaster)]
    stemmer: StemAlgorithm,

    /// Sheets to skip, in addition to the status sheet
    #[arg(long = "exclude")]
    excluded: Vec<String>,

    /// Abort if any sheet cannot be shaped
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();
    fs::create_dir_all(&args.target_dir)
        .with_context(|| format!("creating {:?}", args.target_dir))?;

    let prefix = run_prefix(Local::now());
    save_record(&args, &args.target_dir, &prefix)?;

    let mut settings = RunSettings {
        output_mode: args.output_type,
        stemmer: args.stemmer,
        ..RunSettings::default()
    };
    settings.excluded_sheets.extend(args.excluded.iter().cloned());
    info!(status_sheet = STATUS_SHEET, excluded = ?settings.excluded_sheets, "sheet filter");

    let collator = Collator::new(
        TableLoader::default(),
        RecordShaper::new(settings.stemmer.build(), settings.shape_options(true)),
    );
    let report = collator
        .process_workbook(&args.src_path, &settings.excluded_sheets)
        .with_context(|| format!("reading workbook {:?}", args.src_path))?;

    for failure in &report.failures {
        error!("{}", failure);
    }
    if args.strict && !report.failures.is_empty() {
        bail!("{} sheet(s) could not be processed", report.failures.len());
    }

    let dataset = report.collate();
    if dataset.is_empty() {
        info!("no records collated; nothing saved");
        return Ok(());
    }
    let table = export::render(&dataset, settings.output_mode)?;
    let path = args.target_dir.join(format!("{prefix}labelled.txt"));
    TableWriter::new(settings.output_mode.column_delimiter()).write(&table, &path)?;

    info!(records = dataset.len(), path = %path.display(), "all done");
    Ok(())
}

// src/invocation.rs
//! Run bookkeeping: timestamp prefixes, the saved command line, and target
//! directory preparation.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

/// `yymmdd_HHMMSS` for `now`; prefixes every file a run writes.
pub fn run_prefix(now: DateTime<Local>) -> String {
    now.format("%y%m%d_%H%M%S").to_string()
}

/// Render the invocation: the command line, then `key=value` per argument.
/// Absent (`null`) and `false` values render as empty strings.
pub fn render_record<A: Serialize>(command_line: &[String], args: &A) -> Result<String> {
    let value = serde_json::to_value(args).context("serializing arguments")?;
    let mut lines = vec![command_line.join(" ")];

    if let Value::Object(map) = value {
        for (key, v) in map {
            let rendered = match v {
                Value::Null | Value::Bool(false) => String::new(),
                Value::String(s) => s,
                other => other.to_string(),
            };
            lines.push(format!("{key}={rendered}"));
        }
    }

    Ok(lines.join("\n"))
}

/// Write `<prefix> Command args.txt` next to `target_dir` (in its parent) so
/// a run can be reproduced. Returns the written path.
pub fn save_record<A: Serialize>(args: &A, target_dir: &Path, prefix: &str) -> Result<PathBuf> {
    let command_line: Vec<String> = std::env::args().collect();
    let content = render_record(&command_line, args)?;

    let parent = target_dir
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let path = parent.join(format!("{prefix} Command args.txt"));
    fs::write(&path, content).with_context(|| format!("writing invocation record {:?}", path))?;
    info!(path = %path.display(), "command arguments saved");
    Ok(path)
}

/// What [`ensure_empty_directory`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirState {
    Created,
    AlreadyEmpty,
    Cleared,
}

/// Fail when `src` is `target` or lies inside it, since clearing `target`
/// would delete the inputs before they are read. Paths that do not exist yet
/// cannot overlap and pass.
pub fn check_clear_is_safe(src: &Path, target: &Path) -> Result<()> {
    let (Ok(src), Ok(target)) = (src.canonicalize(), target.canonicalize()) else {
        return Ok(());
    };
    if src.starts_with(&target) {
        bail!(
            "refusing to clear {:?}: it contains the source {:?}",
            target,
            src
        );
    }
    Ok(())
}

/// Create `dir` if missing, otherwise delete everything inside it.
pub fn ensure_empty_directory(dir: &Path) -> Result<DirState> {
    if !dir.exists() {
        fs::create_dir_all(dir).with_context(|| format!("creating directory {:?}", dir))?;
        return Ok(DirState::Created);
    }

    let mut cleared = false;
    for entry in fs::read_dir(dir).with_context(|| format!("reading directory {:?}", dir))? {
        let path = entry?.path();
        if path.is_dir() {
            fs::remove_dir_all(&path).with_context(|| format!("removing {:?}", path))?;
        } else {
            fs::remove_file(&path).with_context(|| format!("removing {:?}", path))?;
        }
        cleared = true;
    }

    Ok(if cleared {
        DirState::Cleared
    } else {
        DirState::AlreadyEmpty
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    #[derive(Serialize)]
    struct Args {
        src_path: String,
        is_directory: bool,
        suffix: Option<String>,
    }

    #[test]
    fn test_run_prefix_format() {
        let t = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(run_prefix(t), "240309_070501");
    }

    #[test]
    fn test_render_record() -> Result<()> {
        let args = Args {
            src_path: "in/dict.txt".into(),
            is_directory: false,
            suffix: None,
        };
        let cmd = vec!["metatoken".to_string(), "-s".into(), "in/dict.txt".into()];
        let text = render_record(&cmd, &args)?;
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "metatoken -s in/dict.txt");
        assert!(lines.contains(&"src_path=in/dict.txt"));
        assert!(lines.contains(&"is_directory="));
        assert!(lines.contains(&"suffix="));
        Ok(())
    }

    #[test]
    fn test_save_record_lands_in_parent() -> Result<()> {
        let root = tempdir()?;
        let target = root.path().join("results");
        let args = Args {
            src_path: "x".into(),
            is_directory: true,
            suffix: Some(".txt".into()),
        };
        let path = save_record(&args, &target, "240101_000000")?;
        assert_eq!(path, root.path().join("240101_000000 Command args.txt"));
        let text = fs::read_to_string(path)?;
        assert!(text.contains("is_directory=true"));
        assert!(text.contains("suffix=.txt"));
        Ok(())
    }

    #[test]
    fn test_ensure_empty_directory_states() -> Result<()> {
        let root = tempdir()?;
        let dir = root.path().join("out");

        assert_eq!(ensure_empty_directory(&dir)?, DirState::Created);
        assert_eq!(ensure_empty_directory(&dir)?, DirState::AlreadyEmpty);

        fs::write(dir.join("a.tsv"), "x")?;
        fs::create_dir(dir.join("nested"))?;
        fs::write(dir.join("nested").join("b.tsv"), "y")?;
        assert_eq!(ensure_empty_directory(&dir)?, DirState::Cleared);
        assert_eq!(fs::read_dir(&dir)?.count(), 0);
        Ok(())
    }

    #[test]
    fn test_clear_refused_when_source_inside_target() -> Result<()> {
        let root = tempdir()?;
        let dicts = root.path().join("dicts");
        fs::create_dir(&dicts)?;
        fs::write(dicts.join("a.txt"), "Field\tDescription\n")?;

        assert!(check_clear_is_safe(&dicts, root.path()).is_err());
        assert!(check_clear_is_safe(&dicts.join("a.txt"), root.path()).is_err());
        assert!(check_clear_is_safe(root.path(), root.path()).is_err());
        // relative spellings of the same directory are caught too
        assert!(check_clear_is_safe(&dicts, &dicts.join("..")).is_err());
        assert!(dicts.join("a.txt").exists());
        Ok(())
    }

    #[test]
    fn test_clear_allowed_for_separate_target() -> Result<()> {
        let root = tempdir()?;
        let dicts = root.path().join("dicts");
        let out = root.path().join("out");
        fs::create_dir(&dicts)?;
        fs::create_dir(&out)?;

        check_clear_is_safe(&dicts, &out)?;
        check_clear_is_safe(&dicts, &root.path().join("not_yet"))?;
        // a sibling whose name shares a prefix is not inside
        let dicts_out = root.path().join("dicts_out");
        fs::create_dir(&dicts_out)?;
        check_clear_is_safe(&dicts, &dicts_out)?;
        Ok(())
    }
}

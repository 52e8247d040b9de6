//! File helpers for commands that write JSONL output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::CliError;

/// Creates the parent directory of `path` when it does not exist yet.
///
/// # Example
///
/// ```rust,no_run
/// use std::path::Path;
/// # use brag_cli::io_utils::ensure_parent_dir;
///
/// let path = Path::new("output/sims/run.jsonl");
/// ensure_parent_dir(path).unwrap();
/// ```
pub fn ensure_parent_dir(path: &Path) -> Result<(), CliError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            CliError::InvalidInput(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }
    Ok(())
}

/// Opens `path` for writing, truncating any previous content.
pub fn create_jsonl(path: &Path) -> Result<BufWriter<File>, CliError> {
    ensure_parent_dir(path)?;
    Ok(BufWriter::new(File::create(path)?))
}

/// Appends one record as a single JSON line.
pub fn write_jsonl<T: Serialize>(writer: &mut dyn Write, record: &T) -> Result<(), CliError> {
    serde_json::to_writer(&mut *writer, record)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jsonl_records_end_with_newline() {
        let mut buf = Vec::new();
        write_jsonl(&mut buf, &serde_json::json!({"round": 1})).unwrap();
        write_jsonl(&mut buf, &serde_json::json!({"round": 2})).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "{\"round\":1}\n{\"round\":2}\n");
    }

    #[test]
    fn parent_dirs_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/out.jsonl");
        let mut w = create_jsonl(&path).unwrap();
        w.flush().unwrap();
        assert!(path.exists());
    }
}

use serde::Serialize;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV writing error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Completed,
    Failed,
}

/// One row of a verdict report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRecord {
    pub file: String,
    pub status: ReportStatus,
    pub reasons: String,
}

/// Writes records as CSV with a `file,status,reasons` header.
pub fn write_report<'a>(
    records: impl IntoIterator<Item = &'a ReportRecord>,
    writer: impl Write,
) -> Result<(), ReportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush().map_err(|e| ReportError::Io {
        path: "<writer>".to_string(),
        source: e,
    })?;
    Ok(())
}

pub fn write_report_file<'a>(
    records: impl IntoIterator<Item = &'a ReportRecord>,
    path: &Path,
) -> Result<(), ReportError> {
    let file = std::fs::File::create(path).map_err(|e| ReportError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    write_report(records, std::io::BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn records() -> Vec<ReportRecord> {
        vec![
            ReportRecord {
                file: "ok.log".to_string(),
                status: ReportStatus::Completed,
                reasons: String::new(),
            },
            ReportRecord {
                file: "bad.log".to_string(),
                status: ReportStatus::Failed,
                reasons: "imaginary freq -15.3432\tpreempted".to_string(),
            },
        ]
    }

    #[test]
    fn report_has_header_and_one_row_per_record() {
        let mut buffer = Vec::new();
        write_report(&records(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "file,status,reasons");
        assert_eq!(lines[1], "ok.log,completed,");
        assert!(lines[2].starts_with("bad.log,failed,"));
        assert!(lines[2].contains("imaginary freq -15.3432"));
    }

    #[test]
    fn report_file_is_created_on_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.csv");
        write_report_file(&records(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("file,status,reasons\n"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn report_file_in_missing_directory_is_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope").join("report.csv");
        assert!(matches!(
            write_report_file(&records(), &path),
            Err(ReportError::Io { .. })
        ));
    }
}

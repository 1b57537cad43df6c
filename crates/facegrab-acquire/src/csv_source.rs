use facegrab_model::Identifier;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const UNIQUE_ID_COLUMN: &str = "Unique ID";
pub const DELIMITER: u8 = b';';

#[derive(Debug, Error)]
pub enum CsvSourceError {
    #[error("CSV file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("CSV file does not contain '{}' column", UNIQUE_ID_COLUMN)]
    MissingColumn,

    #[error("CSV row on line {line} has no '{}' field", UNIQUE_ID_COLUMN)]
    RowMissingColumn { line: u64 },

    #[error("Error opening CSV file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error reading CSV file: {0}")]
    Read(#[from] csv::Error),
}

/// Read the `Unique ID` column of a semicolon-delimited export.
///
/// Rows may carry extra trailing fields or stop short after the ID; a row
/// too short to reach the `Unique ID` field aborts the whole read. Blank
/// cells are skipped.
pub fn read_unique_ids(path: &Path) -> Result<Vec<Identifier>, CsvSourceError> {
    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => CsvSourceError::NotFound(path.to_path_buf()),
        _ => CsvSourceError::Open {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let ids = parse_unique_ids(file)?;
    tracing::info!(path = %path.display(), ids = ids.len(), "Read Unique IDs");
    Ok(ids)
}

/// Keep only the identifiers named in `only`; an empty filter keeps everything.
pub fn retain_only(ids: Vec<Identifier>, only: &[String]) -> Vec<Identifier> {
    if only.is_empty() {
        return ids;
    }
    let total = ids.len();
    let kept: Vec<_> = ids
        .into_iter()
        .filter(|id| only.iter().any(|wanted| wanted.trim() == id.as_str()))
        .collect();
    tracing::info!(kept = kept.len(), total, "Applied --only filter");
    kept
}

fn parse_unique_ids<R: Read>(input: R) -> Result<Vec<Identifier>, CsvSourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);

    let column = reader
        .headers()?
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}') == UNIQUE_ID_COLUMN)
        .ok_or(CsvSourceError::MissingColumn)?;

    let mut ids = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let raw = record
            .get(column)
            .ok_or(CsvSourceError::RowMissingColumn { line })?;
        match Identifier::new(raw) {
            Ok(id) => ids.push(id),
            Err(e) => {
                tracing::warn!(line, "Skipping row: {e}");
            }
        }
    }

    Ok(ids)
}

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Number of header lines preceding the contact rows.
const HEADER_LINES: usize = 2;

#[derive(Debug, Error)]
pub enum ContactParseError {
    #[error("Failed to open contact report '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Malformed contact report: {0}")]
    Csv(#[from] csv::Error),
    #[error("Contact row on line {line} has {found} columns, expected at least 4")]
    MissingColumns { line: u64, found: usize },
}

/// One interaction reported by the static contact tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRow {
    /// Interaction type code (`hb`, `vdw`, `sb`, ...).
    pub interaction_type: String,
    /// First participating atom, `chain:residue:number:atom`.
    pub atom1: String,
    /// Second participating atom, `chain:residue:number:atom`.
    pub atom2: String,
}

/// A parsed contact report: tab-separated rows of `frame, type, atom1, atom2[, ...]`
/// after two header lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactReport {
    rows: Vec<ContactRow>,
}

impl ContactReport {
    pub fn new(rows: Vec<ContactRow>) -> Self {
        Self { rows }
    }

    pub fn parse<R: Read>(reader: R) -> Result<Self, ContactParseError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in csv_reader.records().skip(HEADER_LINES) {
            let record = record?;
            if record.len() < 4 {
                return Err(ContactParseError::MissingColumns {
                    line: record.position().map(|p| p.line()).unwrap_or(0),
                    found: record.len(),
                });
            }
            rows.push(ContactRow {
                interaction_type: record[1].trim().to_string(),
                atom1: record[2].trim().to_string(),
                atom2: record[3].trim().to_string(),
            });
        }

        Ok(Self { rows })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ContactParseError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ContactParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(file)
    }

    pub fn rows(&self) -> &[ContactRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

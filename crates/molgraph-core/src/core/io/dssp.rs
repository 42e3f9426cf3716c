use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

const TABLE_HEADER: &str = "  #  RESIDUE";

#[derive(Debug, Error)]
pub enum DsspError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: DsspParseErrorKind },
    #[error("DSSP output has no residue table header")]
    MissingHeader,
}

#[derive(Debug, Error)]
pub enum DsspParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Residue line is too short (must reach column 38)")]
    LineTooShort,
}

/// One residue row of classic DSSP output.
#[derive(Debug, Clone, PartialEq)]
pub struct DsspRecord {
    pub chain_id: char,
    pub residue_number: isize,
    pub insertion_code: Option<char>,
    /// One-letter amino acid as written by DSSP (lower case marks half-cystines).
    pub amino_acid: char,
    /// Secondary-structure code; blank is reported as `-`.
    pub secondary_structure: char,
    /// Absolute solvent accessibility in square angstroms.
    pub accessibility: f64,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn column_char(line: &str, index: usize) -> Option<char> {
    line.get(index..index + 1).and_then(|s| s.chars().next())
}

fn parse_int(line: &str, line_num: usize, start: usize, end: usize) -> Result<isize, DsspError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| DsspError::Parse {
        line: line_num,
        kind: DsspParseErrorKind::InvalidInt {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

/// Parses the residue table of classic DSSP output. Chain-break rows (`!`) are skipped.
pub fn parse(reader: &mut impl BufRead) -> Result<Vec<DsspRecord>, DsspError> {
    let mut records = Vec::new();
    let mut in_table = false;

    for (line_num, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line_num = line_num + 1;

        if !in_table {
            in_table = line.starts_with(TABLE_HEADER);
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        if line.len() < 38 {
            return Err(DsspError::Parse {
                line: line_num,
                kind: DsspParseErrorKind::LineTooShort,
            });
        }

        let amino_acid = column_char(&line, 13).unwrap_or(' ');
        if amino_acid == '!' {
            continue;
        }

        let residue_number = parse_int(&line, line_num, 5, 10)?;
        let accessibility = parse_int(&line, line_num, 34, 38)? as f64;
        let secondary_structure = match column_char(&line, 16) {
            Some(' ') | None => '-',
            Some(c) => c,
        };

        records.push(DsspRecord {
            chain_id: column_char(&line, 11).unwrap_or('A'),
            residue_number,
            insertion_code: column_char(&line, 10).filter(|c| !c.is_whitespace()),
            amino_acid,
            secondary_structure,
            accessibility,
        });
    }

    if !in_table {
        return Err(DsspError::MissingHeader);
    }
    Ok(records)
}

pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<DsspRecord>, DsspError> {
    let file = File::open(path)?;
    parse(&mut BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const OUTPUT: &str = "\
==== Secondary Structure Definition by the program DSSP ====
  #  RESIDUE AA STRUCTURE BP1 BP2  ACC     N-H-->O    O-->H-N    N-H-->O    O-->H-N    TCO  KAPPA ALPHA  PHI   PSI    X-CA   Y-CA   Z-CA
    1    1 A M              0   0  188      0, 0.0     2,-0.3     0, 0.0     0, 0.0   0.000 360.0 360.0 360.0 -30.4   27.3   24.4    2.6
    2    2 A K  H  >  -     0   0   94      1,-0.1     4,-2.5     0, 0.0     0, 0.0  -0.406 360.0-130.6 -73.1 147.7   26.2   25.4    2.8
    3        !              0   0    0      0, 0.0     0, 0.0     0, 0.0     0, 0.0   0.000 360.0 360.0 360.0 360.0    0.0    0.0    0.0
    4    5 B a  E           0   0   12      0, 0.0     0, 0.0     0, 0.0     0, 0.0   0.000 360.0 360.0 360.0 360.0    1.0    1.0    1.0
    5    6AB G              0   0   40      0, 0.0     0, 0.0     0, 0.0     0, 0.0   0.000 360.0 360.0 360.0 360.0    1.0    1.0    1.0
";

    #[test]
    fn parses_residue_rows_after_header() {
        let records = parse(&mut Cursor::new(OUTPUT)).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(
            records[0],
            DsspRecord {
                chain_id: 'A',
                residue_number: 1,
                insertion_code: None,
                amino_acid: 'M',
                secondary_structure: '-',
                accessibility: 188.0,
            }
        );
        assert_eq!(records[1].secondary_structure, 'H');
        assert_eq!(records[1].accessibility, 94.0);
    }

    #[test]
    fn skips_chain_breaks_and_keeps_raw_amino_acid() {
        let records = parse(&mut Cursor::new(OUTPUT)).unwrap();
        assert_eq!(records[2].chain_id, 'B');
        assert_eq!(records[2].amino_acid, 'a');
        assert_eq!(records[2].secondary_structure, 'E');
    }

    #[test]
    fn reads_insertion_codes() {
        let records = parse(&mut Cursor::new(OUTPUT)).unwrap();
        assert_eq!(records[3].residue_number, 6);
        assert_eq!(records[3].insertion_code, Some('A'));
        assert_eq!(records[3].chain_id, 'B');
    }

    #[test]
    fn missing_header_is_an_error() {
        let err = parse(&mut Cursor::new("no table here\n")).unwrap_err();
        assert!(matches!(err, DsspError::MissingHeader));
    }
}

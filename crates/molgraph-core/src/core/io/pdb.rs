use crate::core::io::traits::StructureFile;
use crate::core::models::record::{AtomRecord, AtomTable, RecordKind};
use nalgebra::Point3;
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for ATOM/HETATM record (must reach column 54)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn column_char(line: &str, index: usize) -> Option<char> {
    line.get(index..index + 1)
        .and_then(|s| s.chars().next())
        .filter(|c| !c.is_whitespace())
}

fn parse_float(line: &str, line_num: usize, start: usize, end: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

/// Reader for the fixed-column PDB format.
///
/// Only `ATOM` and `HETATM` records of the first model are read; every other record
/// type is ignored.
pub struct PdbFile;

impl PdbFile {
    fn parse_record(line: &str, line_num: usize, kind: RecordKind, fallback_serial: usize) -> Result<AtomRecord, PdbError> {
        if line.len() < 54 {
            return Err(PdbError::Parse {
                line: line_num,
                kind: PdbParseErrorKind::LineTooShort,
            });
        }

        let atom_name = slice_and_trim(line, 12, 16);
        if atom_name.is_empty() {
            return Err(PdbError::Parse {
                line: line_num,
                kind: PdbParseErrorKind::MissingRequiredField {
                    columns: "13-16".into(),
                },
            });
        }

        // Hybrid-36 and overflowed serials are common in large files; keep file order instead.
        let serial = slice_and_trim(line, 6, 11)
            .parse::<usize>()
            .unwrap_or(fallback_serial);

        let res_seq_str = slice_and_trim(line, 22, 26);
        let residue_number: isize = res_seq_str.parse().map_err(|_| PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::InvalidInt {
                columns: "23-26".into(),
                value: res_seq_str.into(),
            },
        })?;

        let x = parse_float(line, line_num, 30, 38)?;
        let y = parse_float(line, line_num, 38, 46)?;
        let z = parse_float(line, line_num, 46, 54)?;

        let occupancy = match slice_and_trim(line, 54, 60) {
            "" => 1.0,
            _ => parse_float(line, line_num, 54, 60)?,
        };

        let element = match slice_and_trim(line, 76, 78) {
            "" => atom_name
                .chars()
                .find(|c| c.is_ascii_alphabetic())
                .map(|c| c.to_string())
                .unwrap_or_default(),
            e => e.to_string(),
        };

        Ok(AtomRecord {
            kind,
            serial,
            atom_name: atom_name.to_string(),
            alt_loc: column_char(line, 16),
            residue_name: slice_and_trim(line, 17, 20).to_string(),
            chain_id: column_char(line, 21).unwrap_or('A'),
            residue_number,
            insertion_code: column_char(line, 26),
            position: Point3::new(x, y, z),
            occupancy,
            element,
        })
    }
}

impl StructureFile for PdbFile {
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<AtomTable, Self::Error> {
        let mut table = AtomTable::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            let kind = match slice_and_trim(&line, 0, 6) {
                "ATOM" => RecordKind::Atom,
                "HETATM" => RecordKind::Hetatm,
                "ENDMDL" => break,
                _ => continue,
            };
            let record = Self::parse_record(&line, line_num, kind, table.len() + 1)?;
            table.push(record);
        }

        Ok(table)
    }
}

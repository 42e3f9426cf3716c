use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CustomEdgeError {
    #[error("Failed to open edge list '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Malformed edge list: {0}")]
    Csv(#[from] csv::Error),
    #[error("Edge row on line {line} needs at least a source and a target column")]
    MissingEndpoints { line: u64 },
    #[error("Invalid edge value '{value}' on line {line}")]
    InvalidValue { line: u64, value: String },
}

/// One user-supplied edge: two endpoint tokens and the attribute vector.
///
/// Endpoint tokens are either node identities (`A:LEU:42`) or node indices; their
/// interpretation is left to the graph builder.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomEdgeRow {
    pub source: String,
    pub target: String,
    pub data: Vec<f64>,
}

/// Reads a comma-separated edge list with a header row (`res1,res2,data...`).
pub fn parse<R: Read>(reader: R) -> Result<Vec<CustomEdgeRow>, CustomEdgeError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.len() < 2 {
            return Err(CustomEdgeError::MissingEndpoints { line });
        }
        let data = record
            .iter()
            .skip(2)
            .map(|v| {
                v.parse::<f64>().map_err(|_| CustomEdgeError::InvalidValue {
                    line,
                    value: v.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(CustomEdgeRow {
            source: record[0].to_string(),
            target: record[1].to_string(),
            data,
        });
    }
    Ok(rows)
}

pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<CustomEdgeRow>, CustomEdgeError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| CustomEdgeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_identity_and_index_endpoints() {
        let text = "res1,res2,weight,flag\nA:LEU:5,A:ILE:30,0.5,1\n0,3,2.0,0\n";
        let rows = parse(text.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].source, "A:LEU:5");
        assert_eq!(rows[0].data, vec![0.5, 1.0]);
        assert_eq!(rows[1].target, "3");
    }

    #[test]
    fn allows_edges_without_data() {
        let rows = parse("res1,res2\n1,2\n".as_bytes()).unwrap();
        assert!(rows[0].data.is_empty());
    }

    #[test]
    fn rejects_non_numeric_data() {
        let err = parse("res1,res2,w\n1,2,heavy\n".as_bytes()).unwrap_err();
        assert!(matches!(err, CustomEdgeError::InvalidValue { line: 2, .. }));
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = parse("res1,res2,w\n1,2,0.1\n1,2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, CustomEdgeError::Csv(_)));
    }
}

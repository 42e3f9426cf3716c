use crate::error::Result;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Opens `path` for writing, or standard output when no path is given.
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            debug!("Writing output to {:?}", path);
            Ok(Box::new(BufWriter::new(File::create(path)?)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

pub fn write_json<T: Serialize>(value: &T, path: Option<&Path>) -> Result<()> {
    let mut writer = open_output(path)?;
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Writes one CSV record per row, with a header taken from the row's field names.
pub fn write_csv<T: Serialize>(rows: impl IntoIterator<Item = T>, path: Option<&Path>) -> Result<()> {
    let mut writer = csv::Writer::from_writer(open_output(path)?);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

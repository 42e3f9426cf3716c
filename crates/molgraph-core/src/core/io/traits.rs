use crate::core::models::record::AtomTable;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading coordinate file formats into an [`AtomTable`].
///
/// Implementors handle format-specific parsing; the path-based helper is shared.
pub trait StructureFile {
    /// The error type for parsing and I/O failures.
    type Error: Error + From<io::Error>;

    /// Reads all coordinate records from a buffered reader.
    ///
    /// # Arguments
    ///
    /// * `reader` - The buffered reader to read from.
    ///
    /// # Errors
    ///
    /// Returns an error if a record cannot be parsed or the reader fails.
    fn read_from(reader: &mut impl BufRead) -> Result<AtomTable, Self::Error>;

    /// Reads all coordinate records from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<AtomTable, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}

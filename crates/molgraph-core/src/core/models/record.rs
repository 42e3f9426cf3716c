use nalgebra::Point3;
use std::fmt;

/// Distinguishes standard polymer records from hetero-group records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordKind {
    #[default]
    Atom,
    Hetatm,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Atom => write!(f, "ATOM"),
            RecordKind::Hetatm => write!(f, "HETATM"),
        }
    }
}

/// A single coordinate record as read from a structure file.
///
/// Records are kept flat (no chain/residue hierarchy) because graph construction only
/// ever needs ordered iteration, grouping by residue key and coordinate access.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    pub kind: RecordKind,
    pub serial: usize,
    pub atom_name: String,
    pub alt_loc: Option<char>,
    pub residue_name: String,
    pub chain_id: char,
    pub residue_number: isize,
    pub insertion_code: Option<char>,
    pub position: Point3<f64>,
    pub occupancy: f64,
    pub element: String,
}

/// Key that identifies the residue a record belongs to.
pub type ResidueKey = (char, isize, Option<char>);

impl AtomRecord {
    /// Creates an `ATOM` record with default bookkeeping fields.
    ///
    /// The element is inferred from the first alphabetic character of the atom name,
    /// which is what most writers do when columns 77-78 are blank.
    pub fn new(
        atom_name: &str,
        residue_name: &str,
        chain_id: char,
        residue_number: isize,
        position: Point3<f64>,
    ) -> Self {
        let element = atom_name
            .chars()
            .find(|c| c.is_ascii_alphabetic())
            .map(|c| c.to_string())
            .unwrap_or_default();
        Self {
            kind: RecordKind::Atom,
            serial: 0,
            atom_name: atom_name.to_string(),
            alt_loc: None,
            residue_name: residue_name.to_string(),
            chain_id,
            residue_number,
            insertion_code: None,
            position,
            occupancy: 1.0,
            element,
        }
    }

    pub fn residue_key(&self) -> ResidueKey {
        (self.chain_id, self.residue_number, self.insertion_code)
    }

    /// Returns `true` for records without an alternate location or with location `A`.
    pub fn is_primary_conformer(&self) -> bool {
        matches!(self.alt_loc, None | Some('A'))
    }

    pub fn is_hetero(&self) -> bool {
        self.kind == RecordKind::Hetatm
    }
}

/// The records of one structure, split by record kind in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtomTable {
    pub atoms: Vec<AtomRecord>,
    pub hetatms: Vec<AtomRecord>,
}

impl AtomTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: AtomRecord) {
        match record.kind {
            RecordKind::Atom => self.atoms.push(record),
            RecordKind::Hetatm => self.hetatms.push(record),
        }
    }

    pub fn len(&self) -> usize {
        self.atoms.len() + self.hetatms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty() && self.hetatms.is_empty()
    }

    /// Distinct chain identifiers of the `ATOM` records, in order of first appearance.
    pub fn chains(&self) -> Vec<char> {
        let mut seen = Vec::new();
        for record in &self.atoms {
            if !seen.contains(&record.chain_id) {
                seen.push(record.chain_id);
            }
        }
        seen
    }
}

impl FromIterator<AtomRecord> for AtomTable {
    fn from_iter<I: IntoIterator<Item = AtomRecord>>(iter: I) -> Self {
        let mut table = AtomTable::new();
        for record in iter {
            table.push(record);
        }
        table
    }
}

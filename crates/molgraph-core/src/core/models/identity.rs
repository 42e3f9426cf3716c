use super::record::AtomRecord;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityParseError {
    #[error("Identifier '{0}' must have the form chain:residue:number[:atom]")]
    WrongFieldCount(String),
    #[error("Chain field '{0}' must be a single character")]
    InvalidChain(String),
    #[error("Residue number '{0}' is not an integer")]
    InvalidResidueNumber(String),
}

/// The identity of a graph node: `chain:residue_name:residue_number[:atom_name]`.
///
/// Node identities are the join key between node construction, identifier-based edge
/// strategies (contacts, custom edges) and the secondary-structure alignment. They are
/// unique within one graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    /// Single-character chain identifier.
    pub chain_id: char,
    /// Residue name as written in the structure file (three-letter for proteins).
    pub residue_name: String,
    /// Author residue number.
    pub residue_number: isize,
    /// Atom name, present only for atom-level graphs.
    pub atom_name: Option<String>,
}

impl NodeId {
    pub fn residue(chain_id: char, residue_name: &str, residue_number: isize) -> Self {
        Self {
            chain_id,
            residue_name: residue_name.to_string(),
            residue_number,
            atom_name: None,
        }
    }

    pub fn atom(chain_id: char, residue_name: &str, residue_number: isize, atom_name: &str) -> Self {
        Self {
            atom_name: Some(atom_name.to_string()),
            ..Self::residue(chain_id, residue_name, residue_number)
        }
    }

    /// Builds the identity of a record, with the atom suffix when `atom_level` is set.
    pub fn from_record(record: &AtomRecord, atom_level: bool) -> Self {
        if atom_level {
            Self::atom(
                record.chain_id,
                &record.residue_name,
                record.residue_number,
                &record.atom_name,
            )
        } else {
            Self::residue(record.chain_id, &record.residue_name, record.residue_number)
        }
    }

    /// The residue part of this identity (drops the atom suffix).
    pub fn residue_id(&self) -> NodeId {
        Self::residue(self.chain_id, &self.residue_name, self.residue_number)
    }

    pub fn is_atom_level(&self) -> bool {
        self.atom_name.is_some()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.chain_id, self.residue_name, self.residue_number
        )?;
        if let Some(atom) = &self.atom_name {
            write!(f, ":{}", atom)?;
        }
        Ok(())
    }
}

impl FromStr for NodeId {
    type Err = IdentityParseError;

    /// Parses `chain:residue:number` or `chain:residue:number:atom`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.trim().split(':').collect();
        if !(3..=4).contains(&fields.len()) {
            return Err(IdentityParseError::WrongFieldCount(s.to_string()));
        }

        let mut chain_chars = fields[0].chars();
        let chain_id = match (chain_chars.next(), chain_chars.next()) {
            (Some(c), None) => c,
            _ => return Err(IdentityParseError::InvalidChain(fields[0].to_string())),
        };
        let residue_number = fields[2]
            .parse::<isize>()
            .map_err(|_| IdentityParseError::InvalidResidueNumber(fields[2].to_string()))?;

        Ok(Self {
            chain_id,
            residue_name: fields[1].to_string(),
            residue_number,
            atom_name: fields.get(3).map(|a| a.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn display_renders_colon_form() {
        assert_eq!(NodeId::residue('A', "LEU", 42).to_string(), "A:LEU:42");
        assert_eq!(NodeId::atom('B', "GLY", -3, "CA").to_string(), "B:GLY:-3:CA");
    }

    #[test]
    fn from_str_parses_residue_and_atom_forms() {
        let id: NodeId = "A:LEU:42".parse().unwrap();
        assert_eq!(id, NodeId::residue('A', "LEU", 42));
        let id: NodeId = "A:ARG:76:NH2".parse().unwrap();
        assert_eq!(id.atom_name.as_deref(), Some("NH2"));
        assert_eq!(id.residue_id(), NodeId::residue('A', "ARG", 76));
    }

    #[test]
    fn from_str_rejects_malformed_identifiers() {
        assert!(matches!(
            "A:LEU".parse::<NodeId>(),
            Err(IdentityParseError::WrongFieldCount(_))
        ));
        assert!(matches!(
            "AB:LEU:1".parse::<NodeId>(),
            Err(IdentityParseError::InvalidChain(_))
        ));
        assert!(matches!(
            "A:LEU:42A".parse::<NodeId>(),
            Err(IdentityParseError::InvalidResidueNumber(_))
        ));
    }

    #[test]
    fn from_record_respects_atom_level_flag() {
        let record = AtomRecord::new("CB", "SER", 'C', 7, Point3::origin());
        assert_eq!(NodeId::from_record(&record, false).to_string(), "C:SER:7");
        assert_eq!(NodeId::from_record(&record, true).to_string(), "C:SER:7:CB");
    }
}

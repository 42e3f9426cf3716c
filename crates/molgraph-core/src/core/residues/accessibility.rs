use phf::{Map, phf_map};

/// Maximum solvent accessibility per residue (Sander & Rost, 1994), in square angstroms.
static SANDER_MAX_ASA: Map<char, f64> = phf_map! {
    'A' => 106.0, 'R' => 248.0, 'N' => 157.0, 'D' => 163.0, 'C' => 135.0,
    'Q' => 198.0, 'E' => 194.0, 'G' => 84.0, 'H' => 184.0, 'I' => 169.0,
    'L' => 164.0, 'K' => 205.0, 'M' => 188.0, 'F' => 197.0, 'P' => 136.0,
    'S' => 130.0, 'T' => 142.0, 'W' => 227.0, 'Y' => 222.0, 'V' => 142.0,
};

pub fn max_accessibility(one_letter: char) -> Option<f64> {
    SANDER_MAX_ASA.get(&one_letter).copied()
}

/// Relative accessibility `acc / max_acc`, or `None` for residues without a reference value.
pub fn relative_accessibility(one_letter: char, acc: f64) -> Option<f64> {
    max_accessibility(one_letter).map(|max| acc / max)
}

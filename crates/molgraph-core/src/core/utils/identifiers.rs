use phf::{Map, Set, phf_map, phf_set};

static WATER_RESIDUE_NAMES: Set<&'static str> = phf_set! {
    "HOH", "WAT", "H2O", "DOD", "TIP", "TIP3", "SOL",
};

static THREE_TO_ONE: Map<&'static str, char> = phf_map! {
    "ALA" => 'A', "ARG" => 'R', "ASN" => 'N', "ASP" => 'D', "CYS" => 'C',
    "GLN" => 'Q', "GLU" => 'E', "GLY" => 'G', "HIS" => 'H', "ILE" => 'I',
    "LEU" => 'L', "LYS" => 'K', "MET" => 'M', "PHE" => 'F', "PRO" => 'P',
    "SER" => 'S', "THR" => 'T', "TRP" => 'W', "TYR" => 'Y', "VAL" => 'V',
    "PTR" => 'Y', "TPO" => 'T', "SEP" => 'S', "KCX" => 'K', "LLP" => 'K',
    "PCA" => 'E', "MSE" => 'M', "CSO" => 'C', "CAS" => 'C', "CAF" => 'C',
    "CSD" => 'C',
};

static ONE_TO_THREE: Map<char, &'static str> = phf_map! {
    'A' => "ALA", 'R' => "ARG", 'N' => "ASN", 'D' => "ASP", 'C' => "CYS",
    'Q' => "GLN", 'E' => "GLU", 'G' => "GLY", 'H' => "HIS", 'I' => "ILE",
    'L' => "LEU", 'K' => "LYS", 'M' => "MET", 'F' => "PHE", 'P' => "PRO",
    'S' => "SER", 'T' => "THR", 'W' => "TRP", 'Y' => "TYR", 'V' => "VAL",
};

pub fn is_water_residue(residue_name: &str) -> bool {
    WATER_RESIDUE_NAMES.contains(residue_name.trim())
}

pub fn is_heavy_atom(atom_name: &str) -> bool {
    let first_char = atom_name
        .trim()
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase());
    !matches!(first_char, Some('H') | Some('D'))
}

/// One-letter code of a residue, mapping common modified residues to their parent.
pub fn three_to_one(residue_name: &str) -> Option<char> {
    THREE_TO_ONE.get(residue_name.trim()).copied()
}

/// Three-letter name of a standard amino acid.
pub fn one_to_three(code: char) -> Option<&'static str> {
    ONE_TO_THREE.get(&code).copied()
}

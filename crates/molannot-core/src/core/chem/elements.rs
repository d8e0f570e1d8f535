use phf::{Map, Set, phf_map, phf_set};

/// Metals assumed to be present as cations.
pub static METAL_CATIONS: Set<&'static str> = phf_set! {
    "MG", "MN", "RH", "ZN", "FE", "BI", "AS", "AG",
};

/// Two-letter symbols recognised when the element has to be guessed from an
/// atom name. `CA` is deliberately absent: in a structure file it is far more
/// often an alpha carbon than calcium.
pub static TWO_LETTER_ELEMENTS: Set<&'static str> = phf_set! {
    "BR", "CL", "BI", "AS", "AG", "LI", "MG", "MN", "RH", "ZN", "FE",
};

/// AutoDock atom types that differ from the element symbol they stand for.
pub static AUTODOCK_TYPES: Map<&'static str, &'static str> = phf_map! {
    "A" => "C",
    "HD" => "H",
    "HS" => "H",
    "NA" => "N",
    "NS" => "N",
    "OA" => "O",
    "OS" => "O",
    "SA" => "S",
};

/// Normalizes a PDB element column value to an uppercase element symbol.
/// Returns `None` for a blank field.
pub fn normalize_element(raw: &str) -> Option<String> {
    let symbol: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_ascii_uppercase();
    (!symbol.is_empty()).then_some(symbol)
}

/// Element symbol for a PDBQT AutoDock atom type such as `"OA"` or `"A"`.
pub fn element_from_autodock_type(raw: &str) -> Option<String> {
    normalize_element(raw).map(|symbol| {
        AUTODOCK_TYPES
            .get(symbol.as_str())
            .map(|s| s.to_string())
            .unwrap_or(symbol)
    })
}

/// Guesses the element from an atom name such as `"CA"`, `"1HB2"` or `"ZN"`.
pub fn element_from_atom_name(name: &str) -> Option<String> {
    let letters: String = name
        .trim()
        .chars()
        .skip_while(|c| !c.is_ascii_alphabetic())
        .take_while(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_ascii_uppercase();

    if letters.len() >= 2 && TWO_LETTER_ELEMENTS.contains(&letters[..2]) {
        return Some(letters[..2].to_string());
    }
    letters.get(..1).map(str::to_string)
}

pub fn is_metal_cation(element: &str) -> bool {
    METAL_CATIONS.contains(element)
}

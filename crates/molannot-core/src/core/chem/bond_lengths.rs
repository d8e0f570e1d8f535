use phf::{Map, phf_map};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BondLengthError {
    #[error("No reference bond length between {0} and {1}")]
    UnknownPair(String, String),
}

/// Representative single-bond lengths in Angstroms, keyed `"A:B"`.
/// Each unordered pair is stored once.
static BOND_LENGTHS: Map<&'static str, f64> = phf_map! {
    "C:C" => 1.53,
    "N:N" => 1.425,
    "O:O" => 1.469,
    "S:S" => 2.048,
    "SI:SI" => 2.359,

    "C:H" => 1.059,
    "C:N" => 1.469,
    "C:O" => 1.413,
    "C:S" => 1.819,
    "C:F" => 1.399,
    "C:CL" => 1.790,
    "C:BR" => 1.910,
    "C:I" => 2.162,

    "N:H" => 1.009,
    "N:O" => 1.463,
    "N:BR" => 1.843,
    "N:CL" => 1.743,
    "N:F" => 1.406,
    "N:I" => 2.2,

    "O:S" => 1.577,
    "O:H" => 0.967,

    "S:H" => 1.35,
    "S:N" => 1.633,
    "S:BR" => 2.321,
    "S:CL" => 2.283,
    "S:F" => 1.640,
    "S:I" => 2.687,

    "P:BR" => 2.366,
    "P:CL" => 2.008,
    "P:F" => 1.495,
    "P:I" => 2.490,
    "P:O" => 1.6,

    "SI:BR" => 2.284,
    "SI:CL" => 2.072,
    "SI:F" => 1.636,
    "SI:P" => 2.264,
    "SI:S" => 2.145,
    "SI:C" => 1.888,
    "SI:N" => 1.743,
    "SI:O" => 1.631,

    "H:H" => 0.7414,
};

/// Reference bond length between two elements, independent of argument order.
pub fn bond_length(element1: &str, element2: &str) -> Result<f64, BondLengthError> {
    BOND_LENGTHS
        .get(format!("{element1}:{element2}").as_str())
        .or_else(|| BOND_LENGTHS.get(format!("{element2}:{element1}").as_str()))
        .copied()
        .ok_or_else(|| BondLengthError::UnknownPair(element1.to_string(), element2.to_string()))
}

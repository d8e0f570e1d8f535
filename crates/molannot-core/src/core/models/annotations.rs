use nalgebra::Point3;
use serde::Serialize;
use std::fmt;

/// Formal sign carried by a charged group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChargeSign {
    Positive,
    Negative,
}

impl ChargeSign {
    pub fn is_positive(self) -> bool {
        matches!(self, ChargeSign::Positive)
    }
}

impl fmt::Display for ChargeSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ChargeSign::Positive => "+",
                ChargeSign::Negative => "-",
            }
        )
    }
}

/// A group of atoms sharing one formal charge.
///
/// Records are produced once per rule match and never merged, so an atom that
/// satisfies two rules appears in two records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargedGroup {
    /// Anchor point of the charge (an atom position or an average of several).
    pub center: Point3<f64>,
    /// 1-based indices of the atoms forming the group.
    pub atoms: Vec<usize>,
    pub sign: ChargeSign,
}

impl ChargedGroup {
    pub fn new(center: Point3<f64>, atoms: Vec<usize>, sign: ChargeSign) -> Self {
        Self {
            center,
            atoms,
            sign,
        }
    }
}

/// Plane in `ax + by + cz = d` form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlaneEquation {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl PlaneEquation {
    /// Signed value of `ax + by + cz - d` at `point`; zero for points on the plane.
    pub fn evaluate(&self, point: &Point3<f64>) -> f64 {
        self.a * point.x + self.b * point.y + self.c * point.z - self.d
    }
}

/// Descriptor of a planar aromatic ring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AromaticRing {
    pub center: Point3<f64>,
    /// Member atom indices, in the order they were found.
    pub atoms: Vec<usize>,
    pub plane: PlaneEquation,
    /// Largest distance from the center to any member atom.
    pub radius: f64,
}

/// Per-residue secondary-structure label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SecondaryStructure {
    Alpha,
    Beta,
    #[default]
    Other,
}

impl fmt::Display for SecondaryStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SecondaryStructure::Alpha => "ALPHA",
                SecondaryStructure::Beta => "BETA",
                SecondaryStructure::Other => "OTHER",
            }
        )
    }
}

use crate::core::taxonomy::{SsClass, UnknownCodeError};
use serde::Serialize;

/// Sentinel used by both assignment tools for an undefined dihedral angle.
pub const UNDEFINED_ANGLE: f64 = 360.0;

/// Secondary structure assignment of a single residue, as reported by
/// STRIDE or DSSP.
///
/// The last three fields are tool specific: STRIDE reports the solvent
/// accessible `area`, while DSSP reports the virtual bond angle `kappa` and
/// the virtual torsion angle `alpha`. Fields that the producing tool does not
/// report are `0.0`.
///
/// Records are only built through [`SecondaryStructureRecord::new`], so the
/// class of every record is a member of the taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecondaryStructureRecord {
    residue_name: String,
    chain_id: String,
    residue_number: isize,
    class: SsClass,
    phi: f64,
    psi: f64,
    area: f64,
    kappa: f64,
    alpha: f64,
}

impl SecondaryStructureRecord {
    /// Creates a record with the tool specific fields set to `0.0`.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownCodeError`] if `code` is not a secondary structure code.
    pub fn new(
        residue_name: impl Into<String>,
        chain_id: impl Into<String>,
        residue_number: isize,
        code: char,
        phi: f64,
        psi: f64,
    ) -> Result<Self, UnknownCodeError> {
        Ok(Self {
            residue_name: residue_name.into(),
            chain_id: chain_id.into(),
            residue_number,
            class: SsClass::from_code(code)?,
            phi,
            psi,
            area: 0.0,
            kappa: 0.0,
            alpha: 0.0,
        })
    }

    pub fn with_area(mut self, area: f64) -> Self {
        self.area = area;
        self
    }

    pub fn with_virtual_angles(mut self, kappa: f64, alpha: f64) -> Self {
        self.kappa = kappa;
        self.alpha = alpha;
        self
    }

    pub fn residue_name(&self) -> &str {
        &self.residue_name
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn residue_number(&self) -> isize {
        self.residue_number
    }

    /// The one-letter code of the assignment, normalized to the taxonomy.
    pub fn code(&self) -> char {
        self.class.code()
    }

    pub fn class(&self) -> SsClass {
        self.class
    }

    pub fn phi(&self) -> f64 {
        self.phi
    }

    pub fn psi(&self) -> f64 {
        self.psi
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn kappa(&self) -> f64 {
        self.kappa
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn has_defined_phi(&self) -> bool {
        self.phi != UNDEFINED_ANGLE
    }

    pub fn has_defined_psi(&self) -> bool {
        self.psi != UNDEFINED_ANGLE
    }

    /// Whether two records describe the same residue, ignoring the assignment.
    pub fn same_residue(&self, other: &Self) -> bool {
        self.residue_number == other.residue_number
            && self.chain_id == other.chain_id
            && self.residue_name == other.residue_name
    }
}

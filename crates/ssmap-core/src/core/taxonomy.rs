use super::models::record::SecondaryStructureRecord;
use phf::{Map, phf_map};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The ten secondary structure classes reported by STRIDE and DSSP.
///
/// The discriminant of each variant is the stable numeric id written into
/// secondary structure maps, so it must never be renumbered.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum SsClass {
    Helix310 = 1,
    AlphaHelix = 2,
    PiHelix = 3,
    KappaHelix = 4,
    Turn = 5,
    BetaStrand = 6,
    BetaBridge = 7,
    Bend = 8,
    Coil = 9,
    Loop = 10,
}

/// Families of classes that are commonly counted together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SsGroup {
    /// 310, alpha, pi and kappa helices.
    Helix,
    /// Beta strands and beta bridges.
    Strand,
}

struct ClassEntry {
    class: SsClass,
    name: &'static str,
    code: char,
    group: Option<SsGroup>,
}

// Indexed by `id - 1`.
const TABLE: [ClassEntry; 10] = [
    ClassEntry {
        class: SsClass::Helix310,
        name: "310 helix",
        code: 'G',
        group: Some(SsGroup::Helix),
    },
    ClassEntry {
        class: SsClass::AlphaHelix,
        name: "alpha helix",
        code: 'H',
        group: Some(SsGroup::Helix),
    },
    ClassEntry {
        class: SsClass::PiHelix,
        name: "pi helix",
        code: 'I',
        group: Some(SsGroup::Helix),
    },
    ClassEntry {
        class: SsClass::KappaHelix,
        name: "kappa helix",
        code: 'P',
        group: Some(SsGroup::Helix),
    },
    ClassEntry {
        class: SsClass::Turn,
        name: "turn",
        code: 'T',
        group: None,
    },
    ClassEntry {
        class: SsClass::BetaStrand,
        name: "beta strand",
        code: 'E',
        group: Some(SsGroup::Strand),
    },
    ClassEntry {
        class: SsClass::BetaBridge,
        name: "beta bridge",
        code: 'B',
        group: Some(SsGroup::Strand),
    },
    ClassEntry {
        class: SsClass::Bend,
        name: "bend",
        code: 'S',
        group: None,
    },
    ClassEntry {
        class: SsClass::Coil,
        name: "coil",
        code: 'C',
        group: None,
    },
    ClassEntry {
        class: SsClass::Loop,
        name: "loop",
        code: ' ',
        group: None,
    },
];

static CLASS_BY_CODE: Map<char, SsClass> = phf_map! {
    'G' => SsClass::Helix310,
    'H' => SsClass::AlphaHelix,
    'I' => SsClass::PiHelix,
    'P' => SsClass::KappaHelix,
    'T' => SsClass::Turn,
    'E' => SsClass::BetaStrand,
    'B' => SsClass::BetaBridge,
    'S' => SsClass::Bend,
    'C' => SsClass::Coil,
    ' ' => SsClass::Loop,
};

static CLASS_BY_NAME: Map<&'static str, SsClass> = phf_map! {
    "310 helix" => SsClass::Helix310,
    "310-helix" => SsClass::Helix310,
    "alpha helix" => SsClass::AlphaHelix,
    "alpha-helix" => SsClass::AlphaHelix,
    "pi helix" => SsClass::PiHelix,
    "pi-helix" => SsClass::PiHelix,
    "kappa helix" => SsClass::KappaHelix,
    "kappa-helix" => SsClass::KappaHelix,
    "turn" => SsClass::Turn,
    "beta strand" => SsClass::BetaStrand,
    "beta-strand" => SsClass::BetaStrand,
    "beta bridge" => SsClass::BetaBridge,
    "beta-bridge" => SsClass::BetaBridge,
    "bend" => SsClass::Bend,
    "coil" => SsClass::Coil,
    "loop" => SsClass::Loop,
};

/// Error returned when a code, id or name is not part of the class table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown secondary structure code: '{0}'")]
pub struct UnknownCodeError(pub String);

impl SsClass {
    /// All classes in id order.
    pub const ALL: [SsClass; 10] = [
        SsClass::Helix310,
        SsClass::AlphaHelix,
        SsClass::PiHelix,
        SsClass::KappaHelix,
        SsClass::Turn,
        SsClass::BetaStrand,
        SsClass::BetaBridge,
        SsClass::Bend,
        SsClass::Coil,
        SsClass::Loop,
    ];

    fn entry(self) -> &'static ClassEntry {
        &TABLE[self as usize - 1]
    }

    /// The numeric id stored in secondary structure maps (1..=10).
    #[inline]
    pub fn id(self) -> u8 {
        self as u8
    }

    /// The single-character code used by STRIDE and DSSP.
    #[inline]
    pub fn code(self) -> char {
        self.entry().code
    }

    /// The human readable class name (e.g. `"alpha helix"`).
    #[inline]
    pub fn name(self) -> &'static str {
        self.entry().name
    }

    #[inline]
    pub fn group(self) -> Option<SsGroup> {
        self.entry().group
    }

    pub fn from_code(code: char) -> Result<Self, UnknownCodeError> {
        CLASS_BY_CODE
            .get(&code)
            .copied()
            .ok_or_else(|| UnknownCodeError(code.to_string()))
    }

    pub fn from_id(id: u8) -> Result<Self, UnknownCodeError> {
        match id {
            1..=10 => Ok(TABLE[id as usize - 1].class),
            _ => Err(UnknownCodeError(id.to_string())),
        }
    }

    /// Looks a class up by its name or its kebab-case alias (`"beta-strand"`).
    pub fn from_name(name: &str) -> Result<Self, UnknownCodeError> {
        CLASS_BY_NAME
            .get(name.trim().to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| UnknownCodeError(name.to_string()))
    }
}

impl fmt::Display for SsClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SsClass {
    type Err = UnknownCodeError;

    /// Accepts a class name, a kebab-case alias or a one-letter code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(class) = Self::from_name(s) {
            return Ok(class);
        }
        s.ss_class()
    }
}

impl SsGroup {
    /// Classes belonging to this group, derived from the class table.
    pub fn members(self) -> impl Iterator<Item = SsClass> {
        SsClass::ALL
            .into_iter()
            .filter(move |class| class.group() == Some(self))
    }

    pub fn name(self) -> &'static str {
        match self {
            SsGroup::Helix => "helix",
            SsGroup::Strand => "strand",
        }
    }
}

impl fmt::Display for SsGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Anything that can be resolved to a secondary structure class: codes,
/// numeric ids, classes and parsed records.
pub trait ClassKey {
    fn ss_class(&self) -> Result<SsClass, UnknownCodeError>;
}

impl ClassKey for SsClass {
    fn ss_class(&self) -> Result<SsClass, UnknownCodeError> {
        Ok(*self)
    }
}

impl ClassKey for char {
    fn ss_class(&self) -> Result<SsClass, UnknownCodeError> {
        SsClass::from_code(*self)
    }
}

impl ClassKey for str {
    fn ss_class(&self) -> Result<SsClass, UnknownCodeError> {
        let mut chars = self.chars();
        match (chars.next(), chars.next()) {
            (Some(code), None) => SsClass::from_code(code),
            _ => Err(UnknownCodeError(self.to_string())),
        }
    }
}

impl ClassKey for String {
    fn ss_class(&self) -> Result<SsClass, UnknownCodeError> {
        self.as_str().ss_class()
    }
}

impl ClassKey for u8 {
    fn ss_class(&self) -> Result<SsClass, UnknownCodeError> {
        SsClass::from_id(*self)
    }
}

impl ClassKey for i32 {
    fn ss_class(&self) -> Result<SsClass, UnknownCodeError> {
        u8::try_from(*self)
            .map_err(|_| UnknownCodeError(self.to_string()))
            .and_then(SsClass::from_id)
    }
}

impl ClassKey for usize {
    fn ss_class(&self) -> Result<SsClass, UnknownCodeError> {
        u8::try_from(*self)
            .map_err(|_| UnknownCodeError(self.to_string()))
            .and_then(SsClass::from_id)
    }
}

impl ClassKey for SecondaryStructureRecord {
    fn ss_class(&self) -> Result<SsClass, UnknownCodeError> {
        Ok(self.class())
    }
}

impl<K: ClassKey + ?Sized> ClassKey for &K {
    fn ss_class(&self) -> Result<SsClass, UnknownCodeError> {
        (**self).ss_class()
    }
}

/// Returns the class name for a code, numeric id, class or record.
///
/// # Errors
///
/// Returns [`UnknownCodeError`] if the key is not in the class table.
pub fn classify<K: ClassKey + ?Sized>(key: &K) -> Result<&'static str, UnknownCodeError> {
    key.ss_class().map(SsClass::name)
}

/// A test applied to a class, used to compute content along trajectories.
pub trait ClassPredicate {
    fn matches(&self, class: SsClass) -> bool;
}

impl ClassPredicate for SsClass {
    fn matches(&self, class: SsClass) -> bool {
        *self == class
    }
}

impl ClassPredicate for SsGroup {
    fn matches(&self, class: SsClass) -> bool {
        class.group() == Some(*self)
    }
}

impl<F: Fn(SsClass) -> bool> ClassPredicate for F {
    fn matches(&self, class: SsClass) -> bool {
        self(class)
    }
}

fn key_matches<K: ClassKey + ?Sized, P: ClassPredicate>(key: &K, predicate: P) -> bool {
    key.ss_class().is_ok_and(|class| predicate.matches(class))
}

pub fn is_310helix<K: ClassKey + ?Sized>(key: &K) -> bool {
    key_matches(key, SsClass::Helix310)
}

pub fn is_alphahelix<K: ClassKey + ?Sized>(key: &K) -> bool {
    key_matches(key, SsClass::AlphaHelix)
}

pub fn is_pihelix<K: ClassKey + ?Sized>(key: &K) -> bool {
    key_matches(key, SsClass::PiHelix)
}

pub fn is_kappahelix<K: ClassKey + ?Sized>(key: &K) -> bool {
    key_matches(key, SsClass::KappaHelix)
}

pub fn is_turn<K: ClassKey + ?Sized>(key: &K) -> bool {
    key_matches(key, SsClass::Turn)
}

pub fn is_betastrand<K: ClassKey + ?Sized>(key: &K) -> bool {
    key_matches(key, SsClass::BetaStrand)
}

pub fn is_betabridge<K: ClassKey + ?Sized>(key: &K) -> bool {
    key_matches(key, SsClass::BetaBridge)
}

pub fn is_bend<K: ClassKey + ?Sized>(key: &K) -> bool {
    key_matches(key, SsClass::Bend)
}

pub fn is_coil<K: ClassKey + ?Sized>(key: &K) -> bool {
    key_matches(key, SsClass::Coil)
}

pub fn is_loop<K: ClassKey + ?Sized>(key: &K) -> bool {
    key_matches(key, SsClass::Loop)
}

/// True for any of the four helix classes.
pub fn is_anyhelix<K: ClassKey + ?Sized>(key: &K) -> bool {
    key_matches(key, SsGroup::Helix)
}

/// True for beta strands and beta bridges.
pub fn is_anystrand<K: ClassKey + ?Sized>(key: &K) -> bool {
    key_matches(key, SsGroup::Strand)
}

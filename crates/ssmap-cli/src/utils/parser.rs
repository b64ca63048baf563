use ssmap::core::taxonomy::{ClassPredicate, SsClass, SsGroup};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error(
    "Unknown class '{0}'. Expected a class name (e.g., 'alpha helix'), a code (e.g., 'H'), or 'helix'/'strand'."
)]
pub struct ParseClassError(pub String);

/// A single class or a whole group, as named on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassSelector {
    Class(SsClass),
    Group(SsGroup),
}

impl ClassPredicate for ClassSelector {
    fn matches(&self, class: SsClass) -> bool {
        match self {
            ClassSelector::Class(selected) => selected.matches(class),
            ClassSelector::Group(group) => group.matches(class),
        }
    }
}

impl FromStr for ClassSelector {
    type Err = ParseClassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "helix" | "anyhelix" | "any helix" => Ok(ClassSelector::Group(SsGroup::Helix)),
            "strand" | "anystrand" | "any strand" => Ok(ClassSelector::Group(SsGroup::Strand)),
            _ => s
                .parse::<SsClass>()
                .map(ClassSelector::Class)
                .map_err(|_| ParseClassError(s.to_string())),
        }
    }
}

impl fmt::Display for ClassSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassSelector::Class(class) => write!(f, "{}", class),
            ClassSelector::Group(group) => write!(f, "{}", group),
        }
    }
}

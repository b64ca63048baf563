use crate::core::models::map::{IndexError, SecondaryStructureMap};
use crate::core::models::record::SecondaryStructureRecord;
use crate::core::taxonomy::{ClassPredicate, SsClass, SsGroup, UnknownCodeError};
use std::collections::BTreeMap;

/// Number of residues in each of the ten classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Composition {
    counts: [usize; 10],
}

impl Composition {
    pub fn from_classes(classes: impl IntoIterator<Item = SsClass>) -> Self {
        let mut composition = Self::default();
        for class in classes {
            composition.counts[Self::slot(class)] += 1;
        }
        composition
    }

    fn slot(class: SsClass) -> usize {
        usize::from(class.id() - 1)
    }

    pub fn get(&self, class: SsClass) -> usize {
        self.counts[Self::slot(class)]
    }

    /// Count of the class named `name`, accepting the same spellings as
    /// [`SsClass::from_name`].
    pub fn get_by_name(&self, name: &str) -> Result<usize, UnknownCodeError> {
        SsClass::from_name(name).map(|class| self.get(class))
    }

    /// Counts of all ten classes in table order, zeros included.
    pub fn iter(&self) -> impl Iterator<Item = (SsClass, usize)> + '_ {
        SsClass::ALL.into_iter().map(|class| (class, self.get(class)))
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn group_count(&self, group: SsGroup) -> usize {
        group.members().map(|class| self.get(class)).sum()
    }

    /// Share of residues in `class`, or `0.0` for an empty composition.
    pub fn fraction(&self, class: SsClass) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.get(class) as f64 / total as f64,
        }
    }

    pub fn to_named_map(&self) -> BTreeMap<&'static str, usize> {
        self.iter().map(|(class, count)| (class.name(), count)).collect()
    }
}

fn matching_fraction<P>(predicate: &P, classes: impl IntoIterator<Item = SsClass>) -> f64
where
    P: ClassPredicate + ?Sized,
{
    let (mut matching, mut total) = (0usize, 0usize);
    for class in classes {
        total += 1;
        if predicate.matches(class) {
            matching += 1;
        }
    }
    if total == 0 {
        0.0
    } else {
        matching as f64 / total as f64
    }
}

/// Fraction of residues matching `predicate` in a single frame.
pub fn frame_content<P>(predicate: &P, classes: &[SsClass]) -> f64
where
    P: ClassPredicate + ?Sized,
{
    matching_fraction(predicate, classes.iter().copied())
}

/// Fraction of residues matching `predicate` in every frame of `map`, in
/// frame order.
pub fn class_content<P>(predicate: &P, map: &SecondaryStructureMap) -> Vec<f64>
where
    P: ClassPredicate + ?Sized,
{
    map.frames()
        .map(|classes| frame_content(predicate, classes))
        .collect()
}

/// Fraction of frames in which each residue matches `predicate`, in residue
/// order.
pub fn residue_content<P>(predicate: &P, map: &SecondaryStructureMap) -> Vec<f64>
where
    P: ClassPredicate + ?Sized,
{
    (0..map.n_residues())
        .map(|residue| matching_fraction(predicate, map.residue(residue)))
        .collect()
}

/// Class composition of one frame of `map`.
pub fn composition(map: &SecondaryStructureMap, frame: usize) -> Result<Composition, IndexError> {
    Ok(Composition::from_classes(map.frame(frame)?.iter().copied()))
}

/// Class composition of the records of a single assignment.
pub fn composition_of(records: &[SecondaryStructureRecord]) -> Composition {
    Composition::from_classes(records.iter().map(SecondaryStructureRecord::class))
}

use super::error::{ConsistencyDetail, EngineError};
use super::frames::FrameSink;
use crate::core::analysis::frame_content;
use crate::core::models::map::{MapError, SecondaryStructureMap};
use crate::core::taxonomy::{ClassPredicate, SsClass};

/// Accumulates per-frame classes into a [`SecondaryStructureMap`].
///
/// The number of rows is fixed by the first frame. A builder that never
/// receives a frame finishes as an empty 0x0 map.
#[derive(Debug, Default)]
pub struct MapBuilder {
    map: Option<SecondaryStructureMap>,
}

impl MapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn n_frames(&self) -> usize {
        self.map.as_ref().map_or(0, SecondaryStructureMap::n_frames)
    }

    pub fn finish(self) -> SecondaryStructureMap {
        self.map.unwrap_or_default()
    }
}

impl FrameSink for MapBuilder {
    fn accept(&mut self, frame: usize, classes: &[SsClass]) -> Result<(), EngineError> {
        let map = self
            .map
            .get_or_insert_with(|| SecondaryStructureMap::with_residues(classes.len()));
        match map.push_frame(classes) {
            Err(MapError::ColumnLength { expected, found }) => Err(EngineError::Consistency {
                frame,
                detail: ConsistencyDetail::ResidueCount { expected, found },
            }),
            other => Ok(other?),
        }
    }
}

/// Fraction of residues matching a predicate in each frame, computed as
/// frames arrive without keeping their classes.
pub struct ContentSeries<'p, P: ?Sized> {
    predicate: &'p P,
    values: Vec<f64>,
}

impl<'p, P> ContentSeries<'p, P>
where
    P: ClassPredicate + ?Sized,
{
    pub fn new(predicate: &'p P) -> Self {
        Self {
            predicate,
            values: Vec::new(),
        }
    }

    pub fn finish(self) -> Vec<f64> {
        self.values
    }
}

impl<P> FrameSink for ContentSeries<'_, P>
where
    P: ClassPredicate + ?Sized,
{
    fn accept(&mut self, _frame: usize, classes: &[SsClass]) -> Result<(), EngineError> {
        self.values.push(frame_content(self.predicate, classes));
        Ok(())
    }
}

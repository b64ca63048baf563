use super::assigner::SecondaryStructureAssigner;
use super::error::{ConsistencyDetail, EngineError};
use super::progress::{Progress, ProgressReporter};
use crate::core::models::record::SecondaryStructureRecord;
use crate::core::models::structure::{Frame, Structure};
use crate::core::taxonomy::SsClass;
use std::error::Error;
use tracing::{debug, info};

/// Consumer of the per-frame classes produced by a [`FrameRunner`].
pub trait FrameSink {
    fn accept(&mut self, frame: usize, classes: &[SsClass]) -> Result<(), EngineError>;
}

fn residue_label(record: &SecondaryStructureRecord) -> String {
    format!(
        "{}{}:{}",
        record.residue_name(),
        record.residue_number(),
        record.chain_id()
    )
}

/// Residues of the first frame; every later frame must repeat them.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResidueLayout {
    residues: Vec<SecondaryStructureRecord>,
}

impl ResidueLayout {
    pub(crate) fn from_records(records: &[SecondaryStructureRecord]) -> Self {
        Self {
            residues: records.to_vec(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.residues.len()
    }

    pub(crate) fn check(
        &self,
        frame: usize,
        records: &[SecondaryStructureRecord],
    ) -> Result<(), EngineError> {
        if records.len() != self.residues.len() {
            return Err(EngineError::Consistency {
                frame,
                detail: ConsistencyDetail::ResidueCount {
                    expected: self.residues.len(),
                    found: records.len(),
                },
            });
        }
        let changed = self
            .residues
            .iter()
            .zip(records)
            .position(|(expected, found)| !expected.same_residue(found));
        if let Some(position) = changed {
            return Err(EngineError::Consistency {
                frame,
                detail: ConsistencyDetail::ResidueIdentity {
                    position,
                    expected: residue_label(&self.residues[position]),
                    found: residue_label(&records[position]),
                },
            });
        }
        Ok(())
    }
}

/// Drives the assignment of every frame of a trajectory.
///
/// Frames are processed strictly in order: a frame is read, copied into the
/// selected atoms, assigned and validated before the next one is read. The
/// first failure ends the run.
pub struct FrameRunner<'a, A: ?Sized> {
    assigner: &'a A,
    reporter: &'a ProgressReporter<'a>,
}

impl<'a, A> FrameRunner<'a, A>
where
    A: SecondaryStructureAssigner + ?Sized,
{
    pub fn new(assigner: &'a A, reporter: &'a ProgressReporter<'a>) -> Self {
        Self { assigner, reporter }
    }

    /// Runs every frame of `trajectory` through the assigner, handing the
    /// classes of each frame to `sink`. Returns the number of frames.
    pub fn run<T, E, S>(
        &self,
        subset: &Structure,
        trajectory: T,
        sink: &mut S,
    ) -> Result<usize, EngineError>
    where
        T: IntoIterator<Item = Result<Frame, E>>,
        E: Into<Box<dyn Error + Send + Sync>>,
        S: FrameSink + ?Sized,
    {
        let frames = trajectory.into_iter();
        let expected_frames = match frames.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(lower as u64),
            _ => None,
        };
        self.reporter
            .report(Progress::TrajectoryStart { expected_frames });

        let mut snapshot = subset.clone();
        let mut layout: Option<ResidueLayout> = None;
        let mut count = 0;
        for (index, frame) in frames.enumerate() {
            let frame = frame.map_err(|e| EngineError::Trajectory {
                frame: index,
                source: e.into(),
            })?;
            let records = snapshot
                .update_positions(&frame)
                .map_err(EngineError::from)
                .and_then(|()| self.assigner.assign(&snapshot))
                .map_err(|e| EngineError::Frame {
                    frame: index,
                    source: Box::new(e),
                })?;
            match &layout {
                Some(layout) => layout.check(index, &records)?,
                None => {
                    let first = ResidueLayout::from_records(&records);
                    info!(residues = first.len(), "Residue layout fixed by frame 0");
                    layout = Some(first);
                }
            }

            let classes: Vec<SsClass> = records
                .iter()
                .map(SecondaryStructureRecord::class)
                .collect();
            sink.accept(index, &classes)?;

            debug!(frame = index, residues = classes.len(), "Frame assigned");
            self.reporter.report(Progress::FrameComplete {
                frame: index,
                residues: classes.len(),
            });
            count = index + 1;
        }

        self.reporter
            .report(Progress::TrajectoryFinish { frames: count });
        Ok(count)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::models::structure::Atom;
    use crate::core::parsers::AssignmentTool;
    use crate::engine::process::ExecutionError;
    use nalgebra::Point3;
    use std::cell::RefCell;
    use std::io;

    /// Assigner double returning one canned code string per call, where
    /// each character is the code of one residue.
    pub(crate) struct CannedAssigner {
        frames: Vec<&'static str>,
        calls: RefCell<usize>,
        pub(crate) seen_x: RefCell<Vec<f64>>,
    }

    impl CannedAssigner {
        pub(crate) fn new(frames: Vec<&'static str>) -> Self {
            Self {
                frames,
                calls: RefCell::new(0),
                seen_x: RefCell::new(Vec::new()),
            }
        }
    }

    impl SecondaryStructureAssigner for CannedAssigner {
        fn assign(
            &self,
            snapshot: &Structure,
        ) -> Result<Vec<SecondaryStructureRecord>, EngineError> {
            let mut calls = self.calls.borrow_mut();
            let codes = self.frames[*calls];
            *calls += 1;
            self.seen_x.borrow_mut().push(snapshot.atoms()[0].position.x);
            Ok(codes
                .chars()
                .enumerate()
                .map(|(i, code)| {
                    SecondaryStructureRecord::new("ALA", "A", i as isize + 1, code, -60.0, -45.0)
                        .unwrap()
                })
                .collect())
        }
    }

    /// Assigner double whose tool produces no residues on call `fail_at`.
    pub(crate) struct FailingAssigner {
        fail_at: usize,
        calls: RefCell<usize>,
    }

    impl FailingAssigner {
        pub(crate) fn new(fail_at: usize) -> Self {
            Self {
                fail_at,
                calls: RefCell::new(0),
            }
        }
    }

    impl SecondaryStructureAssigner for FailingAssigner {
        fn assign(
            &self,
            _snapshot: &Structure,
        ) -> Result<Vec<SecondaryStructureRecord>, EngineError> {
            let mut calls = self.calls.borrow_mut();
            let call = *calls;
            *calls += 1;
            if call == self.fail_at {
                return Err(ExecutionError::NoResidues {
                    tool: AssignmentTool::Stride,
                }
                .into());
            }
            Ok(vec![
                SecondaryStructureRecord::new("ALA", "A", 1, 'H', -60.0, -45.0).unwrap(),
            ])
        }
    }

    pub(crate) fn subset() -> Structure {
        Structure::new(vec![Atom {
            index: 1,
            serial: 2,
            name: "CA".to_string(),
            residue_name: "ALA".to_string(),
            chain_id: 'A',
            residue_number: 1,
            insertion_code: None,
            element: "C".to_string(),
            position: Point3::origin(),
        }])
    }

    pub(crate) fn frames(n: usize) -> Vec<Result<Frame, io::Error>> {
        (0..n)
            .map(|i| {
                Ok(Frame::new(vec![
                    Point3::origin(),
                    Point3::new(i as f64, 0.0, 0.0),
                ]))
            })
            .collect()
    }

    #[derive(Default)]
    struct Collect(Vec<(usize, Vec<SsClass>)>);

    impl FrameSink for Collect {
        fn accept(&mut self, frame: usize, classes: &[SsClass]) -> Result<(), EngineError> {
            self.0.push((frame, classes.to_vec()));
            Ok(())
        }
    }

    #[test]
    fn frames_are_assigned_in_order_with_updated_coordinates() {
        let assigner = CannedAssigner::new(vec!["HHC", "HEC", "GGT"]);
        let reporter = ProgressReporter::new();
        let mut sink = Collect::default();
        let count = FrameRunner::new(&assigner, &reporter)
            .run(&subset(), frames(3), &mut sink)
            .unwrap();
        assert_eq!(count, 3);
        assert_eq!(sink.0[1].0, 1);
        assert_eq!(
            sink.0[1].1,
            vec![SsClass::AlphaHelix, SsClass::BetaStrand, SsClass::Coil]
        );
        assert_eq!(*assigner.seen_x.borrow(), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn residue_count_change_names_the_frame() {
        let assigner = CannedAssigner::new(vec!["HHC", "HHC", "HH"]);
        let reporter = ProgressReporter::new();
        let err = FrameRunner::new(&assigner, &reporter)
            .run(&subset(), frames(3), &mut Collect::default())
            .unwrap_err();
        match err {
            EngineError::Consistency { frame, detail } => {
                assert_eq!(frame, 2);
                assert_eq!(
                    detail,
                    ConsistencyDetail::ResidueCount {
                        expected: 3,
                        found: 2
                    }
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn changed_residue_identity_is_inconsistent() {
        let layout = ResidueLayout::from_records(&[
            SecondaryStructureRecord::new("MET", "A", 1, 'C', 0.0, 0.0).unwrap(),
            SecondaryStructureRecord::new("PHE", "A", 2, 'C', 0.0, 0.0).unwrap(),
        ]);
        let renumbered = [
            SecondaryStructureRecord::new("MET", "A", 1, 'C', 0.0, 0.0).unwrap(),
            SecondaryStructureRecord::new("PHE", "A", 3, 'C', 0.0, 0.0).unwrap(),
        ];
        let err = layout.check(4, &renumbered).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Consistency {
                frame: 4,
                detail: ConsistencyDetail::ResidueIdentity { position: 1, .. }
            }
        ));
    }

    #[test]
    fn trajectory_read_error_carries_the_frame_index() {
        let assigner = CannedAssigner::new(vec!["HH", "HH"]);
        let reporter = ProgressReporter::new();
        let mut trajectory = frames(1);
        trajectory.push(Err(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated")));
        let err = FrameRunner::new(&assigner, &reporter)
            .run(&subset(), trajectory, &mut Collect::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::Trajectory { frame: 1, .. }));
        assert_eq!(err.frame(), Some(1));
    }

    #[test]
    fn tool_failure_carries_the_frame_index() {
        let assigner = FailingAssigner::new(3);
        let reporter = ProgressReporter::new();
        let mut sink = Collect::default();
        let err = FrameRunner::new(&assigner, &reporter)
            .run(&subset(), frames(5), &mut sink)
            .unwrap_err();
        assert_eq!(err.frame(), Some(3));
        assert_eq!(sink.0.len(), 3);
        match err {
            EngineError::Frame { frame, source } => {
                assert_eq!(frame, 3);
                assert!(matches!(
                    *source,
                    EngineError::Execution(ExecutionError::NoResidues { .. })
                ));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn frame_too_small_for_the_selection_is_rejected() {
        let assigner = CannedAssigner::new(vec!["H"]);
        let reporter = ProgressReporter::new();
        let short: Vec<Result<Frame, io::Error>> = vec![Ok(Frame::new(vec![Point3::origin()]))];
        let err = FrameRunner::new(&assigner, &reporter)
            .run(&subset(), short, &mut Collect::default())
            .unwrap_err();
        assert_eq!(err.frame(), Some(0));
        assert!(matches!(
            err,
            EngineError::Frame { frame: 0, ref source } if matches!(**source, EngineError::Snapshot(_))
        ));
    }
}

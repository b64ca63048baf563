use crate::core::models::map::SecondaryStructureMap;
use crate::core::models::structure::{Frame, Structure};
use crate::core::parsers::AssignmentTool;
use crate::core::taxonomy::ClassPredicate;
use crate::engine::assigner::{ExternalAssigner, SecondaryStructureAssigner};
use crate::engine::builder::{ContentSeries, MapBuilder};
use crate::engine::config::AssignerConfig;
use crate::engine::error::EngineError;
use crate::engine::frames::FrameRunner;
use crate::engine::progress::ProgressReporter;
use std::error::Error;
use tracing::{info, instrument};

/// Builds the residue-by-frame map of a trajectory.
///
/// Every frame is copied into `subset`, assigned with `tool` and checked
/// against the residues of frame 0. The first failing frame aborts the
/// build. A trajectory without frames yields an empty map.
#[instrument(skip_all, name = "map_workflow", fields(tool = %tool))]
pub fn build_map<T, E>(
    subset: &Structure,
    trajectory: T,
    tool: AssignmentTool,
    config: &AssignerConfig,
    reporter: &ProgressReporter,
) -> Result<SecondaryStructureMap, EngineError>
where
    T: IntoIterator<Item = Result<Frame, E>>,
    E: Into<Box<dyn Error + Send + Sync>>,
{
    build_map_with(subset, trajectory, &ExternalAssigner::new(tool, config), reporter)
}

/// Like [`build_map`], with the assignment step supplied by the caller.
pub fn build_map_with<A, T, E>(
    subset: &Structure,
    trajectory: T,
    assigner: &A,
    reporter: &ProgressReporter,
) -> Result<SecondaryStructureMap, EngineError>
where
    A: SecondaryStructureAssigner + ?Sized,
    T: IntoIterator<Item = Result<Frame, E>>,
    E: Into<Box<dyn Error + Send + Sync>>,
{
    info!(atoms = subset.len(), "Building secondary structure map.");
    let mut builder = MapBuilder::new();
    FrameRunner::new(assigner, reporter).run(subset, trajectory, &mut builder)?;
    let map = builder.finish();
    info!(
        residues = map.n_residues(),
        frames = map.n_frames(),
        "Secondary structure map complete."
    );
    Ok(map)
}

/// Fraction of residues matching `predicate` in every frame of a
/// trajectory, computed without building the map.
#[instrument(skip_all, name = "content_workflow", fields(tool = %tool))]
pub fn class_content<P, T, E>(
    predicate: &P,
    subset: &Structure,
    trajectory: T,
    tool: AssignmentTool,
    config: &AssignerConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<f64>, EngineError>
where
    P: ClassPredicate + ?Sized,
    T: IntoIterator<Item = Result<Frame, E>>,
    E: Into<Box<dyn Error + Send + Sync>>,
{
    class_content_with(
        predicate,
        subset,
        trajectory,
        &ExternalAssigner::new(tool, config),
        reporter,
    )
}

/// Like [`class_content`], with the assignment step supplied by the caller.
pub fn class_content_with<P, A, T, E>(
    predicate: &P,
    subset: &Structure,
    trajectory: T,
    assigner: &A,
    reporter: &ProgressReporter,
) -> Result<Vec<f64>, EngineError>
where
    P: ClassPredicate + ?Sized,
    A: SecondaryStructureAssigner + ?Sized,
    T: IntoIterator<Item = Result<Frame, E>>,
    E: Into<Box<dyn Error + Send + Sync>>,
{
    let mut series = ContentSeries::new(predicate);
    let frames = FrameRunner::new(assigner, reporter).run(subset, trajectory, &mut series)?;
    info!(frames, "Content series complete.");
    Ok(series.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analysis::{class_content as map_content, composition};
    use crate::core::io::pdb::PdbTrajectory;
    use crate::core::taxonomy::{SsClass, SsGroup};
    use crate::engine::error::ConsistencyDetail;
    use crate::engine::frames::tests::{CannedAssigner, FailingAssigner, frames, subset};
    use crate::engine::progress::Progress;
    use std::io::{self, Cursor};
    use std::sync::Mutex;

    #[test]
    fn map_has_one_row_per_residue_and_one_column_per_frame() {
        let assigner = CannedAssigner::new(vec!["HHE C", "GHEBT", "IPSTC", "HHHHH"]);
        let map = build_map_with(&subset(), frames(4), &assigner, &ProgressReporter::new()).unwrap();
        assert_eq!(map.n_residues(), 5);
        assert_eq!(map.n_frames(), 4);
        for frame in 0..4 {
            for residue in 0..5 {
                let id = map.id(residue, frame).unwrap();
                assert!((1..=10).contains(&id));
            }
        }
        assert_eq!(map.get(3, 0), Some(SsClass::Loop));
        assert_eq!(map.get(1, 2), Some(SsClass::KappaHelix));
    }

    #[test]
    fn residue_count_mismatch_aborts_with_the_frame_index() {
        let assigner = CannedAssigner::new(vec!["HHC", "HHC", "HHCC", "HHC"]);
        let err = build_map_with(&subset(), frames(4), &assigner, &ProgressReporter::new())
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Consistency {
                frame: 2,
                detail: ConsistencyDetail::ResidueCount {
                    expected: 3,
                    found: 4
                }
            }
        ));
    }

    #[test]
    fn empty_trajectory_yields_an_empty_map() {
        let assigner = CannedAssigner::new(vec![]);
        let map = build_map_with(&subset(), frames(0), &assigner, &ProgressReporter::new()).unwrap();
        assert_eq!((map.n_residues(), map.n_frames()), (0, 0));
    }

    #[test]
    fn progress_is_reported_once_per_frame() {
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(event);
        }));
        let assigner = CannedAssigner::new(vec!["HC", "EC", "TC"]);
        build_map_with(&subset(), frames(3), &assigner, &reporter).unwrap();
        drop(reporter);

        let events = events.into_inner().unwrap();
        assert_eq!(
            events.first(),
            Some(&Progress::TrajectoryStart {
                expected_frames: Some(3)
            })
        );
        let completed: Vec<usize> = events
            .iter()
            .filter_map(|event| match event {
                Progress::FrameComplete { frame, .. } => Some(*frame),
                _ => None,
            })
            .collect();
        assert_eq!(completed, vec![0, 1, 2]);
        assert_eq!(events.last(), Some(&Progress::TrajectoryFinish { frames: 3 }));
    }

    #[test]
    fn streamed_content_equals_content_of_the_map() {
        let codes = vec!["HHEC", "GEEC", "CCCC"];
        let map = build_map_with(
            &subset(),
            frames(3),
            &CannedAssigner::new(codes.clone()),
            &ProgressReporter::new(),
        )
        .unwrap();
        let streamed = class_content_with(
            &SsGroup::Helix,
            &subset(),
            frames(3),
            &CannedAssigner::new(codes),
            &ProgressReporter::new(),
        )
        .unwrap();
        assert_eq!(streamed, map_content(&SsGroup::Helix, &map));
        assert_eq!(streamed, vec![0.5, 0.25, 0.0]);

        let n = map.n_residues() as f64;
        for (frame, value) in streamed.iter().enumerate() {
            let composition = composition(&map, frame).unwrap();
            assert_eq!(*value, composition.group_count(SsGroup::Helix) as f64 / n);
        }
    }

    #[test]
    fn trajectory_errors_abort_without_a_partial_map() {
        let mut trajectory = frames(2);
        trajectory.push(Err(io::Error::other("corrupt frame")));
        let err = build_map_with(
            &subset(),
            trajectory,
            &CannedAssigner::new(vec!["H", "H", "H"]),
            &ProgressReporter::new(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Trajectory { frame: 2, .. }));
    }

    #[test]
    fn failed_assignment_names_its_frame() {
        let err = build_map_with(
            &subset(),
            frames(5),
            &FailingAssigner::new(3),
            &ProgressReporter::new(),
        )
        .unwrap_err();
        assert_eq!(err.frame(), Some(3));
        assert!(err.to_string().starts_with("Frame 3: "));
    }

    #[test]
    fn pdb_models_drive_the_frame_loop() {
        let text = "\
MODEL        1
ATOM      1  N   ALA A   1       0.000   0.000   0.000  1.00  0.00           N
ATOM      2  CA  ALA A   1       1.000   0.000   0.000  1.00  0.00           C
ENDMDL
MODEL        2
ATOM      1  N   ALA A   1       0.000   0.000   0.000  1.00  0.00           N
ATOM      2  CA  ALA A   1       5.000   0.000   0.000  1.00  0.00           C
ENDMDL
";
        let assigner = CannedAssigner::new(vec!["H", "E"]);
        let map = build_map_with(
            &subset(),
            PdbTrajectory::new(Cursor::new(text)),
            &assigner,
            &ProgressReporter::new(),
        )
        .unwrap();
        assert_eq!(map.n_frames(), 2);
        assert_eq!(*assigner.seen_x.borrow(), vec![1.0, 5.0]);
    }
}

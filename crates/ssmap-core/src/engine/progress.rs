#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    TrajectoryStart { expected_frames: Option<u64> },
    FrameComplete { frame: usize, residues: usize },
    TrajectoryFinish { frames: usize },
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn events_reach_the_callback_in_order() {
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(event);
        }));
        reporter.report(Progress::TrajectoryStart {
            expected_frames: None,
        });
        reporter.report(Progress::FrameComplete {
            frame: 0,
            residues: 12,
        });
        drop(reporter);
        assert_eq!(
            events.into_inner().unwrap(),
            vec![
                Progress::TrajectoryStart {
                    expected_frames: None
                },
                Progress::FrameComplete {
                    frame: 0,
                    residues: 12
                },
            ]
        );
    }

    #[test]
    fn reporter_without_callback_ignores_events() {
        ProgressReporter::new().report(Progress::TrajectoryFinish { frames: 0 });
    }
}

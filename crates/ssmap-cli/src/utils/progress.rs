use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use ssmap::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0)
            .with_style(Self::spinner_style())
            .with_message("Initializing...");
        pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        pb.disable_steady_tick();
        pb.finish_and_clear();

        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::TrajectoryStart { expected_frames } => {
                    pb_guard.reset();
                    pb_guard.set_position(0);
                    match expected_frames {
                        Some(total) => {
                            pb_guard.disable_steady_tick();
                            pb_guard.set_length(total);
                            pb_guard.set_style(Self::bar_style());
                        }
                        None => {
                            pb_guard.set_length(0);
                            pb_guard.set_style(Self::spinner_style());
                            pb_guard.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                        }
                    }
                    pb_guard.set_message("Assigning frames");
                }
                Progress::FrameComplete { frame, residues } => {
                    pb_guard.inc(1);
                    pb_guard.set_message(format!("Frame {} ({} residues)", frame, residues));
                }
                Progress::TrajectoryFinish { frames } => {
                    pb_guard.disable_steady_tick();
                    pb_guard.finish_with_message(format!("✓ {} frames assigned", frames));
                }
            }
        })
    }

    /// Removes a bar that is still running, as left behind by a trajectory
    /// that failed before its last frame.
    pub fn clear(&self) {
        match self.pb.lock() {
            Ok(pb) if !pb.is_finished() => pb.finish_and_clear(),
            Ok(_) => {}
            Err(_) => warn!("Progress bar mutex was poisoned. Cannot clear progress."),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{pos} frames, {elapsed}]")
            .expect("Failed to create spinner style template")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<28} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .expect("Failed to create bar style template")
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                },
            )
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn handler_initializes_in_a_clean_state() {
        let handler = CliProgressHandler::new();
        let pb = handler.pb.lock().unwrap();
        assert_eq!(pb.length(), Some(0));
        assert!(pb.is_finished());
    }

    #[test]
    fn known_frame_count_drives_a_bar() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        callback(Progress::TrajectoryStart {
            expected_frames: Some(10),
        });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.length(), Some(10));
            assert_eq!(pb.position(), 0);
            assert!(!pb.is_finished());
        }

        callback(Progress::FrameComplete {
            frame: 0,
            residues: 42,
        });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.position(), 1);
            assert_eq!(pb.message(), "Frame 0 (42 residues)");
        }

        callback(Progress::TrajectoryFinish { frames: 1 });
        {
            let pb = handler.pb.lock().unwrap();
            assert!(pb.is_finished());
            assert_eq!(pb.message(), "✓ 1 frames assigned");
        }
    }

    #[test]
    fn unknown_frame_count_uses_a_spinner() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();
        callback(Progress::TrajectoryStart {
            expected_frames: None,
        });
        callback(Progress::FrameComplete {
            frame: 0,
            residues: 3,
        });
        callback(Progress::FrameComplete {
            frame: 1,
            residues: 3,
        });
        let pb = handler.pb.lock().unwrap();
        assert_eq!(pb.position(), 2);
        assert!(!pb.is_finished());
    }

    #[test]
    fn clear_stops_an_interrupted_spinner() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();
        callback(Progress::TrajectoryStart {
            expected_frames: None,
        });
        callback(Progress::FrameComplete {
            frame: 0,
            residues: 3,
        });
        assert!(!handler.pb.lock().unwrap().is_finished());

        handler.clear();
        assert!(handler.pb.lock().unwrap().is_finished());
    }

    #[test]
    fn clear_keeps_a_finished_bar() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();
        callback(Progress::TrajectoryStart {
            expected_frames: Some(1),
        });
        callback(Progress::TrajectoryFinish { frames: 1 });

        handler.clear();
        let pb = handler.pb.lock().unwrap();
        assert!(pb.is_finished());
        assert_eq!(pb.message(), "✓ 1 frames assigned");
    }

    #[test]
    fn callback_is_thread_safe() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::TrajectoryStart {
                expected_frames: Some(1),
            });
            callback(Progress::FrameComplete {
                frame: 0,
                residues: 1,
            });
            callback(Progress::TrajectoryFinish { frames: 1 });
        })
        .join()
        .unwrap();

        let pb = handler.pb.lock().unwrap();
        assert!(pb.is_finished());
        assert_eq!(pb.position(), 1);
    }
}

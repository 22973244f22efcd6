use std::sync::Arc;
use std::time::{Duration, Instant};

use animator::Animator;
use anyhow::{anyhow, Context, Result};
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::error::{InitError, RenderError};
use crate::frame::FrameOutcome;
use crate::types::RendererConfig;
use crate::Renderer;

const STATS_INTERVAL: Duration = Duration::from_secs(1);

/// Opens the window and drives the display loop until it is closed.
///
/// Each redraw advances the animator by one step and renders the resulting
/// state. Redraws are requested whenever winit is about to wait, and Fifo
/// presentation blocks frame acquisition until the next vblank, so the loop
/// ticks once per display refresh.
pub(crate) fn run(config: &RendererConfig, mut animator: Animator) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to initialize event loop")?;
    let (width, height) = config.surface_size;
    let window = WindowBuilder::new()
        .with_title(config.title.clone())
        .with_inner_size(PhysicalSize::new(width, height))
        .with_resizable(false)
        .build(&event_loop)
        .map_err(|err| InitError::Window(err.to_string()))?;
    let window = Arc::new(window);

    let mut renderer = Renderer::initialize(window, config)?;
    let size = renderer.size();
    tracing::info!(
        width = size.width,
        height = size.height,
        motion = %animator.motion().kind(),
        texture = %config.texture_path.display(),
        "sand warp running"
    );
    renderer.window().request_redraw();

    let mut stats = FrameStats::new(Instant::now());
    let mut fatal: Option<RenderError> = None;

    event_loop
        .run(|event, elwt| {
            elwt.set_control_flow(ControlFlow::Wait);

            match event {
                Event::WindowEvent { window_id, event } if window_id == renderer.window().id() => {
                    match event {
                        WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                            elwt.exit();
                        }
                        WindowEvent::Resized(new_size) => {
                            tracing::debug!(
                                width = new_size.width,
                                height = new_size.height,
                                "window resized"
                            );
                            renderer.resize(new_size);
                        }
                        WindowEvent::ScaleFactorChanged {
                            mut inner_size_writer,
                            ..
                        } => {
                            let _ = inner_size_writer.request_inner_size(renderer.size());
                        }
                        WindowEvent::RedrawRequested => {
                            let state = animator.tick();
                            match renderer.render_frame(state) {
                                Ok(outcome) => {
                                    if let FrameOutcome::Skipped(reason) = outcome {
                                        tracing::trace!(%reason, "frame skipped");
                                    }
                                    if let Some(report) = stats.record(outcome, Instant::now()) {
                                        tracing::debug!(
                                            fps = report.fps.round(),
                                            presented = report.presented,
                                            skipped = report.skipped,
                                            phase = state.phase,
                                            "render stats"
                                        );
                                    }
                                }
                                Err(err) => {
                                    tracing::error!(error = %err, "unrecoverable render error; exiting");
                                    fatal = Some(err);
                                    elwt.exit();
                                }
                            }
                        }
                        _ => {}
                    }
                }
                Event::AboutToWait => {
                    renderer.window().request_redraw();
                }
                _ => {}
            }
        })
        .map_err(|err| anyhow!("event loop error: {err}"))?;

    match fatal {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct StatsReport {
    pub fps: f32,
    pub presented: u64,
    pub skipped: u64,
}

/// Presented/skipped counters with a once-per-interval fps report.
#[derive(Debug)]
pub(crate) struct FrameStats {
    last_report: Instant,
    presented_since_report: u32,
    presented: u64,
    skipped: u64,
}

impl FrameStats {
    pub(crate) fn new(now: Instant) -> Self {
        Self {
            last_report: now,
            presented_since_report: 0,
            presented: 0,
            skipped: 0,
        }
    }

    pub(crate) fn record(&mut self, outcome: FrameOutcome, now: Instant) -> Option<StatsReport> {
        match outcome {
            FrameOutcome::Presented => {
                self.presented += 1;
                self.presented_since_report += 1;
            }
            FrameOutcome::Skipped(_) => self.skipped += 1,
        }

        let elapsed = now.saturating_duration_since(self.last_report);
        if elapsed < STATS_INTERVAL {
            return None;
        }
        let fps = self.presented_since_report as f32 / elapsed.as_secs_f32();
        self.presented_since_report = 0;
        self.last_report = now;
        Some(StatsReport {
            fps,
            presented: self.presented,
            skipped: self.skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::SkipReason;

    #[test]
    fn reports_once_per_interval() {
        let start = Instant::now();
        let mut stats = FrameStats::new(start);
        for frame in 1..60u64 {
            let now = start + Duration::from_millis(frame * 16);
            assert!(stats.record(FrameOutcome::Presented, now).is_none());
        }
        let report = stats
            .record(FrameOutcome::Presented, start + Duration::from_secs(1))
            .expect("report after one second");
        assert_eq!(report.presented, 60);
        assert_eq!(report.skipped, 0);
        assert!((report.fps - 60.0).abs() < 0.01);

        let next = start + Duration::from_millis(1016);
        assert!(stats.record(FrameOutcome::Presented, next).is_none());
    }

    #[test]
    fn skipped_frames_do_not_count_towards_fps() {
        let start = Instant::now();
        let mut stats = FrameStats::new(start);
        stats.record(FrameOutcome::Skipped(SkipReason::Timeout), start);
        stats.record(FrameOutcome::Presented, start + Duration::from_millis(500));
        let report = stats
            .record(
                FrameOutcome::Skipped(SkipReason::Lost),
                start + Duration::from_secs(2),
            )
            .expect("report");
        assert_eq!(report.presented, 1);
        assert_eq!(report.skipped, 2);
        assert!((report.fps - 0.5).abs() < 1e-6);
    }
}

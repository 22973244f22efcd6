//! The per-frame command sequence, independent of any GPU.
//!
//! [`render_frame`] turns an [`AnimationState`] into a [`FramePlan`] and hands
//! it to a [`FrameTarget`]. The wgpu-backed target lives in `gpu::state`; tests
//! use a recording target so the draw count and the bound parameters can be
//! checked without a device.

use animator::AnimationState;
use bytemuck::{Pod, Zeroable};

use crate::error::RenderError;
use crate::types::ClearColor;

/// Bind group holding the per-frame parameters.
pub const PARAMS_GROUP: u32 = 0;
/// Parameter slot 0: the drag offset in surface pixels.
pub const OFFSET_BINDING: u32 = 0;
/// Parameter slot 1: the distortion intensity.
pub const INTENSITY_BINDING: u32 = 1;
/// Bind group holding the sand texture.
pub const TEXTURE_GROUP: u32 = 1;
/// Texture slot 0.
pub const TEXTURE_BINDING: u32 = 0;
pub const SAMPLER_BINDING: u32 = 1;

/// Vertices in the full-surface triangle strip.
pub const STRIP_VERTICES: u32 = 4;

/// Offset bytes as uploaded to parameter slot 0.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct OffsetParam {
    pub drag: [f32; 2],
}

/// Intensity bytes as uploaded to parameter slot 1.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct IntensityParam {
    pub intensity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WarpParams {
    pub offset: OffsetParam,
    pub intensity: IntensityParam,
}

impl From<&AnimationState> for WarpParams {
    fn from(state: &AnimationState) -> Self {
        Self {
            offset: OffsetParam {
                drag: state.offset.to_array(),
            },
            intensity: IntensityParam {
                intensity: state.intensity,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topology {
    TriangleStrip,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawCall {
    pub topology: Topology,
    pub vertices: std::ops::Range<u32>,
    pub instances: std::ops::Range<u32>,
}

impl DrawCall {
    pub fn full_surface_strip() -> Self {
        Self {
            topology: Topology::TriangleStrip,
            vertices: 0..STRIP_VERTICES,
            instances: 0..1,
        }
    }
}

/// Everything one presented frame needs: clear, bind, upload, draw.
#[derive(Clone, Debug, PartialEq)]
pub struct FramePlan {
    pub clear: ClearColor,
    pub params: WarpParams,
    pub draw: DrawCall,
}

impl FramePlan {
    pub fn new(clear: ClearColor, state: &AnimationState) -> Self {
        Self {
            clear,
            params: WarpParams::from(state),
            draw: DrawCall::full_surface_strip(),
        }
    }
}

/// Why a frame was dropped without encoding anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    Timeout,
    Outdated,
    Lost,
    Other,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SkipReason::Timeout => "timeout",
            SkipReason::Outdated => "outdated",
            SkipReason::Lost => "lost",
            SkipReason::Other => "other",
        };
        f.write_str(label)
    }
}

pub enum Acquire<F> {
    Ready(F),
    Unavailable(SkipReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented,
    Skipped(SkipReason),
}

/// Something a [`FramePlan`] can be executed against.
pub trait FrameTarget {
    type Frame;

    /// Fetches the next drawable. Transient failures come back as
    /// [`Acquire::Unavailable`]; only unrecoverable ones are errors.
    fn acquire(&mut self) -> Result<Acquire<Self::Frame>, RenderError>;

    /// Records and submits the plan into `frame`.
    fn encode(&mut self, frame: &Self::Frame, plan: &FramePlan);

    fn present(&mut self, frame: Self::Frame);
}

/// Draws one frame for `state`, or skips it when no drawable is available.
pub fn render_frame<T: FrameTarget>(
    target: &mut T,
    clear: ClearColor,
    state: &AnimationState,
) -> Result<FrameOutcome, RenderError> {
    let frame = match target.acquire()? {
        Acquire::Ready(frame) => frame,
        Acquire::Unavailable(reason) => return Ok(FrameOutcome::Skipped(reason)),
    };
    let plan = FramePlan::new(clear, state);
    target.encode(&frame, &plan);
    target.present(frame);
    Ok(FrameOutcome::Presented)
}

#[cfg(test)]
mod tests {
    use super::*;
    use animator::{Animator, AnimationSection, Motion, MotionKind};
    use std::collections::VecDeque;

    enum Scripted {
        Ready,
        Skip(SkipReason),
        OutOfMemory,
    }

    #[derive(Default)]
    struct RecordingTarget {
        script: VecDeque<Scripted>,
        plans: Vec<FramePlan>,
        presented: Vec<u32>,
        next_frame: u32,
    }

    impl RecordingTarget {
        fn scripted(script: impl IntoIterator<Item = Scripted>) -> Self {
            Self {
                script: script.into_iter().collect(),
                ..Self::default()
            }
        }

        fn draw_count(&self) -> usize {
            self.plans.len()
        }
    }

    impl FrameTarget for RecordingTarget {
        type Frame = u32;

        fn acquire(&mut self) -> Result<Acquire<u32>, RenderError> {
            match self.script.pop_front().unwrap_or(Scripted::Ready) {
                Scripted::Ready => {
                    self.next_frame += 1;
                    Ok(Acquire::Ready(self.next_frame))
                }
                Scripted::Skip(reason) => Ok(Acquire::Unavailable(reason)),
                Scripted::OutOfMemory => Err(RenderError::OutOfMemory),
            }
        }

        fn encode(&mut self, _frame: &u32, plan: &FramePlan) {
            self.plans.push(plan.clone());
        }

        fn present(&mut self, frame: u32) {
            self.presented.push(frame);
        }
    }

    #[test]
    fn presented_frame_encodes_exactly_one_strip_draw() {
        let mut target = RecordingTarget::default();
        let animator = Animator::default();
        let outcome = render_frame(&mut target, ClearColor::default(), animator.state()).unwrap();

        assert_eq!(outcome, FrameOutcome::Presented);
        assert_eq!(target.draw_count(), 1);
        assert_eq!(target.presented, vec![1]);
        let draw = &target.plans[0].draw;
        assert_eq!(draw.topology, Topology::TriangleStrip);
        assert_eq!(draw.vertices, 0..4);
        assert_eq!(draw.instances, 0..1);
    }

    #[test]
    fn unavailable_drawable_encodes_nothing() {
        for reason in [
            SkipReason::Timeout,
            SkipReason::Outdated,
            SkipReason::Lost,
            SkipReason::Other,
        ] {
            let mut target = RecordingTarget::scripted([Scripted::Skip(reason)]);
            let outcome =
                render_frame(&mut target, ClearColor::default(), Animator::default().state())
                    .unwrap();
            assert_eq!(outcome, FrameOutcome::Skipped(reason));
            assert_eq!(target.draw_count(), 0);
            assert!(target.presented.is_empty());
        }
    }

    #[test]
    fn out_of_memory_is_an_error() {
        let mut target = RecordingTarget::scripted([Scripted::OutOfMemory]);
        let result = render_frame(&mut target, ClearColor::default(), Animator::default().state());
        assert!(matches!(result, Err(RenderError::OutOfMemory)));
        assert_eq!(target.draw_count(), 0);
    }

    #[test]
    fn skipped_frame_does_not_block_the_next_one() {
        let mut target = RecordingTarget::scripted([Scripted::Skip(SkipReason::Outdated)]);
        let mut animator = Animator::default();
        let first = render_frame(&mut target, ClearColor::default(), animator.tick()).unwrap();
        let second = render_frame(&mut target, ClearColor::default(), animator.tick()).unwrap();
        assert_eq!(first, FrameOutcome::Skipped(SkipReason::Outdated));
        assert_eq!(second, FrameOutcome::Presented);
        assert_eq!(target.draw_count(), 1);
    }

    #[test]
    fn bound_parameters_equal_the_rendered_state() {
        let mut target = RecordingTarget::default();
        let mut animator = Animator::default();
        for _ in 0..32 {
            let state = *animator.tick();
            render_frame(&mut target, ClearColor::default(), &state).unwrap();
            let params = target.plans.last().unwrap().params;
            assert_eq!(params.offset.drag, [state.offset.x, state.offset.y]);
            assert_eq!(params.intensity.intensity, state.intensity);
        }
    }

    #[test]
    fn parameter_bytes_match_shader_sizes() {
        let params = WarpParams::from(Animator::default().state());
        assert_eq!(bytemuck::bytes_of(&params.offset).len(), 8);
        assert_eq!(bytemuck::bytes_of(&params.intensity).len(), 4);
        let drag: [f32; 2] = bytemuck::cast(params.offset);
        assert_eq!(drag, [280.0, 180.0]);
    }

    #[test]
    fn clear_color_is_carried_into_the_plan() {
        let mut target = RecordingTarget::default();
        let clear = ClearColor::new(0.1, 0.2, 0.3, 1.0);
        render_frame(&mut target, clear, Animator::default().state()).unwrap();
        assert_eq!(target.plans[0].clear, clear);
    }

    #[test]
    fn spiral_changes_offsets_but_not_draw_count() {
        let spiral = AnimationSection {
            motion: MotionKind::Spiral,
            ..AnimationSection::default()
        };
        let mut orbit = Animator::default();
        let mut swirl = Animator::new(Motion::from_config(&spiral).unwrap(), 0.01).unwrap();
        let mut orbit_target = RecordingTarget::default();
        let mut spiral_target = RecordingTarget::default();

        for _ in 0..60 {
            render_frame(&mut orbit_target, ClearColor::default(), orbit.tick()).unwrap();
            render_frame(&mut spiral_target, ClearColor::default(), swirl.tick()).unwrap();
        }

        assert_eq!(orbit_target.draw_count(), 60);
        assert_eq!(spiral_target.draw_count(), 60);
        let differing = orbit_target
            .plans
            .iter()
            .zip(&spiral_target.plans)
            .filter(|(a, b)| a.params.offset != b.params.offset)
            .count();
        assert_eq!(differing, 60);
    }
}

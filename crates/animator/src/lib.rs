//! Phase accumulator and motion strategies for the sand warp effect.
//!
//! The [`Animator`] owns the only [`AnimationState`] in the program. Each
//! display tick advances the phase by a fixed step and re-derives the offset
//! and intensity from the configured [`Motion`]; renderers only ever borrow
//! the state.

mod motion;

pub use motion::{Motion, MotionParams, MotionSample};
pub use warpconfig::{AnimationSection, MotionKind};

/// Phase advance per tick used by the reference animation.
pub const DEFAULT_STEP: f64 = 0.01;

#[derive(Debug, thiserror::Error)]
pub enum AnimatorError {
    #[error("phase step must be a positive, finite number of radians (got {0})")]
    InvalidStep(f64),
    #[error("invalid motion parameters: {0}")]
    InvalidParams(String),
}

/// Two-component float vector laid out like a shader `vec2<f32>`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(C)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Adds a double-precision displacement, narrowing once at the end.
    pub fn offset_by(self, dx: f64, dy: f64) -> Vec2 {
        Vec2::new(
            (f64::from(self.x) + dx) as f32,
            (f64::from(self.y) + dy) as f32,
        )
    }
}

/// Parameters consumed by the renderer each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    /// Accumulated phase in radians. Never wrapped; the motions are periodic.
    pub phase: f64,
    /// Displacement center in surface pixel coordinates.
    pub offset: Vec2,
    /// Distortion strength.
    pub intensity: f32,
}

pub struct Animator {
    state: AnimationState,
    step: f64,
    motion: Motion,
    ticks: u64,
}

impl Animator {
    /// Builds an animator whose state already reflects `motion(0)`.
    pub fn new(motion: Motion, step: f64) -> Result<Self, AnimatorError> {
        if !step.is_finite() || step <= 0.0 {
            return Err(AnimatorError::InvalidStep(step));
        }
        Ok(Self::at_phase_zero(motion, step))
    }

    fn at_phase_zero(mut motion: Motion, step: f64) -> Self {
        let sample = motion.evaluate(0.0);
        Self {
            state: AnimationState {
                phase: 0.0,
                offset: sample.offset,
                intensity: sample.intensity,
            },
            step,
            motion,
            ticks: 0,
        }
    }

    pub fn from_config(section: &AnimationSection) -> Result<Self, AnimatorError> {
        let motion = Motion::from_config(section)?;
        tracing::debug!(
            motion = %motion.kind(),
            step = section.step,
            seed = section.seed,
            "configured animator"
        );
        Self::new(motion, section.step)
    }

    /// Advances the phase by one step and recomputes offset and intensity.
    pub fn tick(&mut self) -> &AnimationState {
        self.ticks = self.ticks.saturating_add(1);
        self.state.phase += self.step;
        let sample = self.motion.evaluate(self.state.phase);
        self.state.offset = sample.offset;
        self.state.intensity = sample.intensity;
        &self.state
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn motion(&self) -> &Motion {
        &self.motion
    }
}

impl Default for Animator {
    fn default() -> Self {
        Self::at_phase_zero(Motion::default(), DEFAULT_STEP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_tick_matches_reference_values() {
        let mut animator = Animator::default();
        let state = *animator.tick();
        assert_eq!(state.phase, 0.01);
        assert_eq!(state.offset.x, (180.0 + 0.01_f64.cos() * 100.0) as f32);
        assert_eq!(state.offset.y, (180.0 + 0.01_f64.sin() * 100.0) as f32);
        assert!((state.offset.x - 279.995).abs() < 1e-3);
        assert!((state.offset.y - 181.0).abs() < 1e-2);
        assert_eq!(state.intensity, 0.03);
    }

    #[test]
    fn phase_accumulates_linearly_and_monotonically() {
        let mut animator = Animator::default();
        let mut previous = animator.state().phase;
        for n in 1..=10_000u32 {
            let phase = animator.tick().phase;
            assert!(phase > previous);
            previous = phase;
            assert!((phase - 0.01 * f64::from(n)).abs() < 1e-9);
        }
        assert_eq!(animator.ticks(), 10_000);
    }

    #[test]
    fn initial_state_is_derived_from_phase_zero() {
        let animator = Animator::default();
        let state = animator.state();
        assert_eq!(state.phase, 0.0);
        assert_eq!(state.offset, Vec2::new(280.0, 180.0));
        assert_eq!(state.intensity, 0.03);
    }

    #[test]
    fn state_always_equals_motion_of_phase() {
        let section = AnimationSection {
            motion: MotionKind::Combined,
            ..AnimationSection::default()
        };
        let mut animator = Animator::from_config(&section).unwrap();
        let mut reference = Motion::from_config(&section).unwrap();
        for _ in 0..500 {
            let state = *animator.tick();
            let expected = reference.evaluate(state.phase);
            assert_eq!(state.offset, expected.offset);
            assert_eq!(state.intensity, expected.intensity);
        }
    }

    #[test]
    fn constructed_animators_start_at_motion_of_zero() {
        let section = AnimationSection {
            motion: MotionKind::Pulsing,
            ..AnimationSection::default()
        };
        let animator = Animator::from_config(&section).unwrap();
        let expected = Motion::from_config(&section).unwrap().evaluate(0.0);
        assert_eq!(animator.state().phase, 0.0);
        assert_eq!(animator.state().offset, expected.offset);
        assert_eq!(animator.state().intensity, expected.intensity);
        assert_eq!(animator.ticks(), 0);

        let built = Animator::new(Motion::default(), DEFAULT_STEP).unwrap();
        assert_eq!(built.state(), Animator::default().state());
    }

    #[test]
    fn rejects_invalid_step() {
        assert!(matches!(
            Animator::new(Motion::default(), 0.0),
            Err(AnimatorError::InvalidStep(_))
        ));
        assert!(matches!(
            Animator::new(Motion::default(), f64::NAN),
            Err(AnimatorError::InvalidStep(_))
        ));
    }

    #[test]
    fn custom_step_is_respected() {
        let mut animator = Animator::new(Motion::default(), 0.25).unwrap();
        animator.tick();
        animator.tick();
        assert_eq!(animator.state().phase, 0.5);
    }
}

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use warpconfig::{AnimationSection, MotionKind};

use crate::{AnimatorError, Vec2};

const PULSE_BASE: f32 = 0.02;
const PULSE_AMPLITUDE: f32 = 0.01;
const COMBINED_ORBIT: f64 = 50.0;
const COMBINED_WOBBLE: f64 = 25.0;

/// Offset and intensity produced by a motion for one phase value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    pub offset: Vec2,
    pub intensity: f32,
}

/// Geometry shared by every motion variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParams {
    pub center: Vec2,
    pub radius: f32,
    pub intensity: f32,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            center: Vec2::new(180.0, 180.0),
            radius: 100.0,
            intensity: 0.03,
        }
    }
}

/// Phase-to-parameters mapping selected once at configuration time.
///
/// Every variant except [`Motion::Random`] is a pure function of the phase.
/// The random variant owns a seeded generator so runs are reproducible.
#[derive(Debug, Clone)]
pub enum Motion {
    Orbit(MotionParams),
    Wavy(MotionParams),
    Linear(MotionParams),
    Diagonal(MotionParams),
    Spiral {
        params: MotionParams,
        /// Radius growth per radian of phase.
        rate: f32,
    },
    Pulsing(MotionParams),
    Random {
        params: MotionParams,
        /// Offsets are drawn from `0..span` on both axes.
        span: u32,
        rng: StdRng,
    },
    Combined(MotionParams),
}

impl Default for Motion {
    fn default() -> Self {
        Motion::Orbit(MotionParams::default())
    }
}

impl Motion {
    pub fn from_config(section: &AnimationSection) -> Result<Self, AnimatorError> {
        let params = MotionParams {
            center: Vec2::new(section.center[0], section.center[1]),
            radius: section.radius,
            intensity: section.intensity,
        };
        if !params.center.is_finite() || !params.radius.is_finite() {
            return Err(AnimatorError::InvalidParams(
                "center and radius must be finite".into(),
            ));
        }
        if !params.intensity.is_finite() || params.intensity < 0.0 {
            return Err(AnimatorError::InvalidParams(format!(
                "intensity must be a non-negative number (got {})",
                params.intensity
            )));
        }

        let motion = match section.motion {
            MotionKind::Orbit => Motion::Orbit(params),
            MotionKind::Wavy => Motion::Wavy(params),
            MotionKind::Linear => Motion::Linear(params),
            MotionKind::Diagonal => Motion::Diagonal(params),
            MotionKind::Spiral => Motion::Spiral {
                params,
                rate: section.spiral_rate,
            },
            MotionKind::Pulsing => Motion::Pulsing(params),
            MotionKind::Random => {
                if section.random_span == 0 {
                    return Err(AnimatorError::InvalidParams(
                        "random span must be greater than zero".into(),
                    ));
                }
                Motion::random(params, section.random_span, section.seed)
            }
            MotionKind::Combined => Motion::Combined(params),
        };
        Ok(motion)
    }

    pub fn random(params: MotionParams, span: u32, seed: u64) -> Self {
        Motion::Random {
            params,
            span: span.max(1),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn kind(&self) -> MotionKind {
        match self {
            Motion::Orbit(_) => MotionKind::Orbit,
            Motion::Wavy(_) => MotionKind::Wavy,
            Motion::Linear(_) => MotionKind::Linear,
            Motion::Diagonal(_) => MotionKind::Diagonal,
            Motion::Spiral { .. } => MotionKind::Spiral,
            Motion::Pulsing(_) => MotionKind::Pulsing,
            Motion::Random { .. } => MotionKind::Random,
            Motion::Combined(_) => MotionKind::Combined,
        }
    }

    /// Evaluates the motion at `phase` (radians).
    ///
    /// Trigonometry runs in `f64` and is narrowed to `f32` at the end, which
    /// keeps long-running phases accurate.
    pub fn evaluate(&mut self, phase: f64) -> MotionSample {
        match self {
            Motion::Orbit(params) => {
                let radius = f64::from(params.radius);
                MotionSample {
                    offset: params.center.offset_by(phase.cos() * radius, phase.sin() * radius),
                    intensity: params.intensity,
                }
            }
            Motion::Wavy(params) => {
                let radius = f64::from(params.radius);
                MotionSample {
                    offset: params.center.offset_by((phase * 2.0).sin() * radius, 0.0),
                    intensity: params.intensity,
                }
            }
            Motion::Linear(params) => {
                let radius = f64::from(params.radius);
                MotionSample {
                    offset: params.center.offset_by(phase.sin() * radius, 0.0),
                    intensity: params.intensity,
                }
            }
            Motion::Diagonal(params) => {
                let swing = phase.sin() * f64::from(params.radius);
                MotionSample {
                    offset: params.center.offset_by(swing, swing),
                    intensity: params.intensity,
                }
            }
            Motion::Spiral { params, rate } => {
                let radius = phase * f64::from(*rate);
                MotionSample {
                    offset: params.center.offset_by(phase.cos() * radius, phase.sin() * radius),
                    intensity: params.intensity,
                }
            }
            Motion::Pulsing(params) => MotionSample {
                offset: params.center,
                intensity: PULSE_BASE + PULSE_AMPLITUDE * (phase * 4.0).sin() as f32,
            },
            Motion::Random { params, span, rng } => {
                let x = rng.gen_range(0..*span) as f32;
                let y = rng.gen_range(0..*span) as f32;
                MotionSample {
                    offset: Vec2::new(x, y),
                    intensity: params.intensity,
                }
            }
            Motion::Combined(params) => {
                let x = phase.cos() * COMBINED_ORBIT + (phase * 3.0).sin() * COMBINED_WOBBLE;
                let y = phase.sin() * COMBINED_ORBIT;
                MotionSample {
                    offset: params.center.offset_by(x, y),
                    intensity: PULSE_BASE + PULSE_AMPLITUDE * (phase * 2.0).sin() as f32,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(kind: MotionKind) -> AnimationSection {
        AnimationSection {
            motion: kind,
            ..AnimationSection::default()
        }
    }

    #[test]
    fn orbit_matches_reference_formula() {
        let mut motion = Motion::default();
        for step in 0..720 {
            let phase = step as f64 * 0.037;
            let sample = motion.evaluate(phase);
            assert_eq!(sample.offset.x, (180.0 + phase.cos() * 100.0) as f32);
            assert_eq!(sample.offset.y, (180.0 + phase.sin() * 100.0) as f32);
            assert_eq!(sample.intensity, 0.03);
        }
    }

    #[test]
    fn orbit_is_idempotent_for_a_given_phase() {
        let mut motion = Motion::default();
        let first = motion.evaluate(1.234);
        let second = motion.evaluate(1.234);
        assert_eq!(first, second);
    }

    #[test]
    fn wavy_oscillates_horizontally_at_double_rate() {
        let mut motion = Motion::from_config(&section(MotionKind::Wavy)).unwrap();
        let quarter = motion.evaluate(std::f64::consts::FRAC_PI_4);
        assert!((quarter.offset.x - 280.0).abs() < 1e-3);
        assert_eq!(quarter.offset.y, 180.0);
    }

    #[test]
    fn linear_and_diagonal_share_the_swing() {
        let mut linear = Motion::from_config(&section(MotionKind::Linear)).unwrap();
        let mut diagonal = Motion::from_config(&section(MotionKind::Diagonal)).unwrap();
        let phase = std::f64::consts::FRAC_PI_2;
        let a = linear.evaluate(phase);
        let b = diagonal.evaluate(phase);
        assert!((a.offset.x - 280.0).abs() < 1e-3);
        assert_eq!(a.offset.y, 180.0);
        assert_eq!(b.offset.x, a.offset.x);
        assert_eq!(b.offset.y, b.offset.x);
    }

    #[test]
    fn spiral_radius_grows_with_phase() {
        let mut motion = Motion::from_config(&section(MotionKind::Spiral)).unwrap();
        let phase = 3.0_f64;
        let sample = motion.evaluate(phase);
        let radius = phase * 10.0;
        assert_eq!(sample.offset.x, (180.0 + phase.cos() * radius) as f32);
        assert_eq!(sample.offset.y, (180.0 + phase.sin() * radius) as f32);
        assert_eq!(motion.evaluate(0.0).offset, Vec2::new(180.0, 180.0));
    }

    #[test]
    fn pulsing_keeps_center_and_varies_intensity() {
        let mut motion = Motion::from_config(&section(MotionKind::Pulsing)).unwrap();
        let peak = motion.evaluate(std::f64::consts::PI / 8.0);
        let trough = motion.evaluate(3.0 * std::f64::consts::PI / 8.0);
        assert_eq!(peak.offset, Vec2::new(180.0, 180.0));
        assert!((peak.intensity - 0.03).abs() < 1e-6);
        assert!((trough.intensity - 0.01).abs() < 1e-6);
    }

    #[test]
    fn random_is_reproducible_for_a_seed() {
        let mut config = section(MotionKind::Random);
        config.seed = 99;
        let mut first = Motion::from_config(&config).unwrap();
        let mut second = Motion::from_config(&config).unwrap();
        for tick in 0..64 {
            let a = first.evaluate(tick as f64);
            let b = second.evaluate(tick as f64);
            assert_eq!(a, b);
            assert!((0.0..360.0).contains(&a.offset.x));
            assert!((0.0..360.0).contains(&a.offset.y));
            assert_eq!(a.offset.x.fract(), 0.0);
        }
    }

    #[test]
    fn combined_mixes_orbit_wobble_and_pulse() {
        let mut motion = Motion::from_config(&section(MotionKind::Combined)).unwrap();
        let phase = 0.5_f64;
        let sample = motion.evaluate(phase);
        let x = 180.0 + phase.cos() * 50.0 + (phase * 3.0).sin() * 25.0;
        let y = 180.0 + phase.sin() * 50.0;
        assert_eq!(sample.offset.x, x as f32);
        assert_eq!(sample.offset.y, y as f32);
        assert!((sample.intensity - (0.02 + 0.01 * (phase * 2.0).sin() as f32)).abs() < 1e-7);
    }

    #[test]
    fn from_config_preserves_kind() {
        for kind in MotionKind::ALL {
            let motion = Motion::from_config(&section(kind)).unwrap();
            assert_eq!(motion.kind(), kind);
        }
    }

    #[test]
    fn rejects_negative_intensity() {
        let mut config = section(MotionKind::Orbit);
        config.intensity = -1.0;
        assert!(matches!(
            Motion::from_config(&config),
            Err(AnimatorError::InvalidParams(_))
        ));
    }
}

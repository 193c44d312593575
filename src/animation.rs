//! Time-stepped interpolation for animated swaps
//!
//! An [`Animation`] turns elapsed frame time into a progress fraction that
//! starts at 0 and ends at exactly 1. Tweens follow an easing curve over a
//! fixed duration; springs integrate a damped harmonic oscillator and may
//! overshoot 1 before settling.

use std::time::Duration;

use serde::Deserialize;

/// Easing curves for tween animations
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Material standard curve
    #[default]
    FastOutSlowIn,
}

impl Easing {
    /// Map linear progress in `[0, 1]` to eased progress
    pub fn transform(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t * t,
            Easing::EaseOut => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::FastOutSlowIn => cubic_bezier(0.4, 0.0, 0.2, 1.0, t),
        }
    }
}

/// Evaluate a CSS-style cubic bezier easing curve at `x`
fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, x: f64) -> f64 {
    let bezier = |a: f64, b: f64, t: f64| {
        let u = 1.0 - t;
        3.0 * u * u * t * a + 3.0 * u * t * t * b + t * t * t
    };
    // Bisection on the x curve; it is monotonic for valid control points
    let (mut lo, mut hi) = (0.0, 1.0);
    for _ in 0..32 {
        let mid = (lo + hi) / 2.0;
        if bezier(x1, x2, mid) < x {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    bezier(y1, y2, (lo + hi) / 2.0)
}

/// Tween configuration
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TweenSpec {
    pub duration_ms: u64,
    #[serde(default)]
    pub easing: Easing,
}

impl Default for TweenSpec {
    fn default() -> Self {
        Self {
            duration_ms: 300,
            easing: Easing::default(),
        }
    }
}

/// Spring configuration
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpringSpec {
    /// 1.0 = critically damped, < 1.0 = bouncy
    pub damping_ratio: f64,
    /// Higher values settle faster
    pub stiffness: f64,
    /// Velocity (progress per second) below which the spring may stop
    pub velocity_threshold: f64,
    /// Distance from the target below which the spring may stop
    pub position_threshold: f64,
}

impl SpringSpec {
    /// Slightly bouncy, medium stiffness
    pub fn low_bouncy() -> Self {
        Self {
            damping_ratio: 0.75,
            stiffness: 1500.0,
            velocity_threshold: 0.01,
            position_threshold: 0.001,
        }
    }

    /// Critically damped, no overshoot
    pub fn no_bounce() -> Self {
        Self {
            damping_ratio: 1.0,
            ..Self::low_bouncy()
        }
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self::low_bouncy()
    }
}

/// How a placeholder swap moves on screen
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "motion", rename_all = "lowercase")]
pub enum SwapMotion {
    /// Jump straight to the final geometry
    Instant,
    Tween(TweenSpec),
    Spring(SpringSpec),
}

impl Default for SwapMotion {
    fn default() -> Self {
        SwapMotion::Spring(SpringSpec::default())
    }
}

/// Integration sub-step for springs; frames are split into steps this long
const SPRING_STEP_SECS: f64 = 0.001;

/// A spring still moving after this long jumps to its target
pub const MAX_SPRING_DURATION: Duration = Duration::from_secs(3);

/// Progress driver for one animation run
#[derive(Debug, Clone)]
pub struct Animation {
    motion: SwapMotion,
    elapsed: Duration,
    progress: f64,
    velocity: f64,
    finished: bool,
}

impl Animation {
    pub fn new(motion: SwapMotion) -> Self {
        let finished = matches!(motion, SwapMotion::Instant);
        Self {
            motion,
            elapsed: Duration::ZERO,
            progress: if finished { 1.0 } else { 0.0 },
            velocity: 0.0,
            finished,
        }
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance by one frame and return the new progress.
    ///
    /// Once finished the progress is exactly 1.0.
    pub fn advance(&mut self, dt: Duration) -> f64 {
        if self.finished {
            return self.progress;
        }
        self.elapsed += dt;

        match self.motion {
            SwapMotion::Instant => self.settle(),
            SwapMotion::Tween(spec) => {
                let duration = Duration::from_millis(spec.duration_ms.max(1));
                let linear = (self.elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0);
                if linear >= 1.0 {
                    self.settle();
                } else {
                    self.progress = spec.easing.transform(linear);
                }
            }
            SwapMotion::Spring(spec) => {
                let damping = 2.0 * spec.damping_ratio * spec.stiffness.sqrt();
                let mut remaining = dt.as_secs_f64();
                // Semi-implicit Euler in fixed sub-steps for stability
                while remaining > 0.0 {
                    let step = SPRING_STEP_SECS.min(remaining);
                    let displacement = self.progress - 1.0;
                    let force = -spec.stiffness * displacement - damping * self.velocity;
                    self.velocity += force * step;
                    self.progress = (self.progress + self.velocity * step).clamp(0.0, 2.0);
                    remaining -= step;
                }
                let at_rest = self.velocity.abs() < spec.velocity_threshold;
                let near_target = (self.progress - 1.0).abs() < spec.position_threshold;
                if (at_rest && near_target) || self.elapsed >= MAX_SPRING_DURATION {
                    self.settle();
                }
            }
        }
        self.progress
    }

    fn settle(&mut self) {
        self.progress = 1.0;
        self.velocity = 0.0;
        self.finished = true;
    }
}

//! Easing functions for transition timing.
//!
//! `EasingFunction` is both a curve that can be sampled (for renderers that
//! interpolate the scale themselves) and a CSS `<easing-function>` value that
//! is printed into the `transition` shorthand.
//!
//! ```
//! use zoom_transition::easing::EasingFunction;
//!
//! let standard: EasingFunction = "cubic-bezier(0.4, 0, 0.2, 1)".parse().unwrap();
//! assert_eq!(standard.to_string(), "cubic-bezier(0.4, 0, 0.2, 1)");
//! let progress = standard.evaluate(0.5);
//! assert!(progress > 0.5);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TransitionError};

/// Easing function for transition timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,
    /// CSS `ease`, equivalent to `cubic-bezier(0.25, 0.1, 0.25, 1)`.
    Ease,
    /// CSS `ease-in`, equivalent to `cubic-bezier(0.42, 0, 1, 1)`.
    EaseIn,
    /// CSS `ease-out`, equivalent to `cubic-bezier(0, 0, 0.58, 1)`.
    EaseOut,
    /// CSS `ease-in-out`, equivalent to `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,
    /// Custom cubic bezier curve. x values are in [0, 1].
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl Default for EasingFunction {
    fn default() -> Self {
        Self::standard()
    }
}

impl EasingFunction {
    /// The Material "standard" curve, `cubic-bezier(0.4, 0, 0.2, 1)`.
    pub const fn standard() -> Self {
        Self::CubicBezier {
            x1: 0.4,
            y1: 0.0,
            x2: 0.2,
            y2: 1.0,
        }
    }

    /// Create a custom cubic bezier easing function.
    ///
    /// Fails if either x control value lies outside [0, 1] or any value is
    /// not finite.
    pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32) -> Result<Self> {
        let finite = [x1, y1, x2, y2].iter().all(|v| v.is_finite());
        if !finite || !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
            return Err(TransitionError::InvalidEasing(format!(
                "cubic-bezier({x1}, {y1}, {x2}, {y2})"
            )));
        }
        Ok(Self::CubicBezier { x1, y1, x2, y2 })
    }

    /// Evaluate the easing function at progress `t` (clamped to [0, 1]).
    ///
    /// The result may leave [0, 1] for bezier curves with overshooting y
    /// control points.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Self::Linear => t,
            Self::Ease => sample_bezier(0.25, 0.1, 0.25, 1.0, t),
            Self::EaseIn => sample_bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => sample_bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => sample_bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::CubicBezier { x1, y1, x2, y2 } => sample_bezier(x1, y1, x2, y2, t),
        }
    }
}

impl fmt::Display for EasingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("linear"),
            Self::Ease => f.write_str("ease"),
            Self::EaseIn => f.write_str("ease-in"),
            Self::EaseOut => f.write_str("ease-out"),
            Self::EaseInOut => f.write_str("ease-in-out"),
            Self::CubicBezier { x1, y1, x2, y2 } => {
                write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
        }
    }
}

impl FromStr for EasingFunction {
    type Err = TransitionError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "linear" => return Ok(Self::Linear),
            "ease" => return Ok(Self::Ease),
            "ease-in" => return Ok(Self::EaseIn),
            "ease-out" => return Ok(Self::EaseOut),
            "ease-in-out" => return Ok(Self::EaseInOut),
            _ => {}
        }

        let args = normalized
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| TransitionError::InvalidEasing(s.to_string()))?;

        let values = args
            .split(',')
            .map(|part| part.trim().parse::<f32>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| TransitionError::InvalidEasing(s.to_string()))?;

        match values.as_slice() {
            [x1, y1, x2, y2] => Self::cubic_bezier(*x1, *y1, *x2, *y2),
            _ => Err(TransitionError::InvalidEasing(s.to_string())),
        }
    }
}

/// Sample a CSS cubic bezier at input progress `progress`.
///
/// Solves x(t) = progress with Newton-Raphson, then evaluates y(t).
fn sample_bezier(x1: f32, y1: f32, x2: f32, y2: f32, progress: f32) -> f32 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }

    let mut t = progress;
    for _ in 0..8 {
        let err = bezier_component(x1, x2, t) - progress;
        if err.abs() < 1e-6 {
            break;
        }
        let slope = bezier_slope(x1, x2, t);
        if slope.abs() < 1e-6 {
            break;
        }
        t = (t - err / slope).clamp(0.0, 1.0);
    }

    bezier_component(y1, y2, t)
}

/// One axis of a bezier anchored at 0 and 1: 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³
#[inline]
fn bezier_component(p1: f32, p2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t
}

#[inline]
fn bezier_slope(p1: f32, p2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * p1 + 6.0 * mt * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

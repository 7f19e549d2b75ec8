//! Duration and easing resolution.
//!
//! `DurationResolver` maps a direction plus an optional element size hint to
//! a concrete [`TransitionTiming`]. It is pure: the same inputs always produce
//! the same timing, and no input can make it fail.
//!
//! # Size scaling
//!
//! Larger elements travel further when they scale, so under
//! [`DurationOverride::Theme`] the base duration is lengthened for big
//! elements:
//!
//! ```text
//! auto(h) = round((4 + 15 * (h/36)^0.25 + (h/36)/5) * 10)
//! theme   = min(max(base, auto(h)), max_auto_duration_ms)
//! ```
//!
//! Both are monotonic and continuous in `h`. Missing or unusable size hints
//! resolve to the base duration.

use serde::{Deserialize, Serialize};
use zoom_config::{DurationTokens, SpeedClass, ZoomConfig};

use crate::easing::EasingFunction;
use crate::error::{Result, TransitionError};
use crate::types::Direction;

/// Resolved timing for one direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionTiming {
    /// Duration of the transition in milliseconds.
    pub duration_ms: f64,
    /// Delay before the transition starts in milliseconds.
    pub delay_ms: f64,
    /// Timing function.
    pub easing: EasingFunction,
}

impl TransitionTiming {
    pub fn new(duration_ms: f64, easing: EasingFunction) -> Self {
        Self {
            duration_ms,
            delay_ms: 0.0,
            easing,
        }
    }

    /// Time from arming until the transition has visually finished.
    pub fn total_ms(&self) -> f64 {
        self.duration_ms + self.delay_ms
    }
}

/// Timings for both directions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingPair {
    pub enter: TransitionTiming,
    pub exit: TransitionTiming,
}

impl TimingPair {
    pub fn get(&self, direction: Direction) -> &TransitionTiming {
        match direction {
            Direction::Enter => &self.enter,
            Direction::Exit => &self.exit,
        }
    }
}

/// Caller override for transition durations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DurationOverride {
    /// Theme speed classes, lengthened for large elements.
    #[default]
    Theme,
    /// Duration derived from the element size alone.
    Auto,
    /// One duration for both directions.
    Uniform { ms: f64 },
    /// Separate enter and exit durations.
    Split { enter: f64, exit: f64 },
}

impl DurationOverride {
    /// One validated duration for both directions.
    pub fn uniform(ms: f64) -> Result<Self> {
        Ok(Self::Uniform {
            ms: validate_ms(ms)?,
        })
    }

    /// Validated per-direction durations.
    pub fn split(enter: f64, exit: f64) -> Result<Self> {
        Ok(Self::Split {
            enter: validate_ms(enter)?,
            exit: validate_ms(exit)?,
        })
    }
}

/// Caller override for the easing curve.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EasingOverride {
    /// Theme easing for both directions.
    #[default]
    Theme,
    /// One curve for both directions.
    Uniform { easing: EasingFunction },
    /// Separate enter and exit curves.
    Split {
        enter: EasingFunction,
        exit: EasingFunction,
    },
}

impl EasingOverride {
    /// Parse a single CSS timing function used for both directions.
    pub fn parse(css: &str) -> Result<Self> {
        Ok(Self::Uniform {
            easing: css.parse()?,
        })
    }

    /// Parse per-direction CSS timing functions.
    pub fn parse_split(enter: &str, exit: &str) -> Result<Self> {
        Ok(Self::Split {
            enter: enter.parse()?,
            exit: exit.parse()?,
        })
    }
}

fn validate_ms(ms: f64) -> Result<f64> {
    if ms.is_finite() && ms >= 0.0 {
        Ok(ms)
    } else {
        Err(TransitionError::InvalidDuration(ms))
    }
}

fn sanitize_ms(ms: f64) -> f64 {
    if ms.is_finite() { ms.max(0.0) } else { 0.0 }
}

/// Size-derived duration for an element whose largest dimension is `size` px.
///
/// Returns `None` for sizes that cannot drive the formula.
pub fn auto_duration(size: f64) -> Option<f64> {
    if !size.is_finite() || size <= 0.0 {
        return None;
    }
    let constant = size / 36.0;
    Some(((4.0 + 15.0 * constant.powf(0.25) + constant / 5.0) * 10.0).round())
}

/// Pure resolver from direction and size hint to timing.
#[derive(Debug, Clone, PartialEq)]
pub struct DurationResolver {
    tokens: DurationTokens,
    enter_class: SpeedClass,
    exit_class: SpeedClass,
    enter_ms: Option<f64>,
    exit_ms: Option<f64>,
    theme_easing: EasingFunction,
    size_scaling: bool,
    max_auto_ms: f64,
    delay_ms: f64,
    duration: DurationOverride,
    easing: EasingOverride,
}

impl Default for DurationResolver {
    fn default() -> Self {
        Self::from_config(&ZoomConfig::default())
    }
}

impl DurationResolver {
    /// Create a resolver from the default theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver from theme tokens and controller defaults.
    ///
    /// An unparsable theme easing falls back to the standard curve.
    pub fn from_config(config: &ZoomConfig) -> Self {
        let css = config.default_easing_css();
        let theme_easing = css.parse::<EasingFunction>().unwrap_or_else(|err| {
            tracing::warn!("{err} in configuration; using the standard curve");
            EasingFunction::standard()
        });

        Self {
            tokens: config.durations.clone(),
            enter_class: config.zoom.enter,
            exit_class: config.zoom.exit,
            enter_ms: config.zoom.enter_ms,
            exit_ms: config.zoom.exit_ms,
            theme_easing,
            size_scaling: config.zoom.size_scaling,
            max_auto_ms: sanitize_ms(config.zoom.max_auto_duration_ms),
            delay_ms: 0.0,
            duration: DurationOverride::Theme,
            easing: EasingOverride::Theme,
        }
    }

    /// Set the duration override.
    pub fn with_duration(mut self, duration: DurationOverride) -> Self {
        self.duration = duration;
        self
    }

    /// Set the easing override.
    pub fn with_easing(mut self, easing: EasingOverride) -> Self {
        self.easing = easing;
        self
    }

    /// Set a delay applied to both directions.
    pub fn with_delay(mut self, delay_ms: f64) -> Self {
        self.delay_ms = sanitize_ms(delay_ms);
        self
    }

    /// Theme duration for a direction before any size adjustment.
    pub fn base_duration(&self, direction: Direction) -> f64 {
        let (fixed, class) = match direction {
            Direction::Enter => (self.enter_ms, self.enter_class),
            Direction::Exit => (self.exit_ms, self.exit_class),
        };
        sanitize_ms(fixed.unwrap_or_else(|| self.tokens.get(class)))
    }

    /// Easing for a direction after overrides.
    pub fn easing(&self, direction: Direction) -> EasingFunction {
        match (self.easing, direction) {
            (EasingOverride::Theme, _) => self.theme_easing,
            (EasingOverride::Uniform { easing }, _) => easing,
            (EasingOverride::Split { enter, .. }, Direction::Enter) => enter,
            (EasingOverride::Split { exit, .. }, Direction::Exit) => exit,
        }
    }

    /// Resolve the timing for one direction.
    pub fn resolve(&self, direction: Direction, size_hint: Option<f64>) -> TransitionTiming {
        let duration_ms = match (self.duration, direction) {
            (DurationOverride::Uniform { ms }, _) => sanitize_ms(ms),
            (DurationOverride::Split { enter, .. }, Direction::Enter) => sanitize_ms(enter),
            (DurationOverride::Split { exit, .. }, Direction::Exit) => sanitize_ms(exit),
            (DurationOverride::Theme, _) => {
                let base = self.base_duration(direction);
                match self.usable_auto(size_hint) {
                    Some(auto) => base.max(auto).min(self.max_auto_ms.max(base)),
                    None => base,
                }
            }
            (DurationOverride::Auto, _) => match size_hint.and_then(auto_duration) {
                Some(auto) => auto.min(self.max_auto_ms),
                None => self.base_duration(direction),
            },
        };

        TransitionTiming {
            duration_ms,
            delay_ms: self.delay_ms,
            easing: self.easing(direction),
        }
    }

    /// Resolve both directions at once.
    pub fn resolve_pair(&self, size_hint: Option<f64>) -> TimingPair {
        TimingPair {
            enter: self.resolve(Direction::Enter, size_hint),
            exit: self.resolve(Direction::Exit, size_hint),
        }
    }

    fn usable_auto(&self, size_hint: Option<f64>) -> Option<f64> {
        if !self.size_scaling {
            return None;
        }
        size_hint.and_then(auto_duration)
    }
}

static_assertions::assert_impl_all!(DurationResolver: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_defaults_without_size() {
        let resolver = DurationResolver::new();

        let enter = resolver.resolve(Direction::Enter, None);
        assert_eq!(enter.duration_ms, 225.0);
        assert_eq!(enter.delay_ms, 0.0);
        assert_eq!(enter.easing, EasingFunction::standard());

        let exit = resolver.resolve(Direction::Exit, None);
        assert_eq!(exit.duration_ms, 195.0);
        assert_eq!(exit.easing, EasingFunction::standard());
    }

    #[test]
    fn test_small_elements_keep_base_duration() {
        let resolver = DurationResolver::new();
        // auto(36) = 192ms, below both bases
        assert_eq!(auto_duration(36.0), Some(192.0));
        assert_eq!(resolver.resolve(Direction::Enter, Some(36.0)).duration_ms, 225.0);
        assert_eq!(resolver.resolve(Direction::Exit, Some(36.0)).duration_ms, 195.0);
    }

    #[test]
    fn test_large_elements_lengthen_and_clamp() {
        let resolver = DurationResolver::new();

        let medium = resolver.resolve(Direction::Enter, Some(400.0)).duration_ms;
        let large = resolver.resolve(Direction::Enter, Some(1000.0)).duration_ms;
        let huge = resolver.resolve(Direction::Enter, Some(100_000.0)).duration_ms;

        assert!(medium > 225.0);
        assert!(large > medium);
        assert_eq!(huge, 500.0);
    }

    #[test]
    fn test_auto_duration_is_monotonic() {
        let mut last = 0.0;
        for size in [1.0, 10.0, 50.0, 100.0, 500.0, 2000.0] {
            let value = auto_duration(size).unwrap();
            assert!(value >= last, "auto({size}) = {value} < {last}");
            last = value;
        }
    }

    #[test]
    fn test_unusable_size_hints_fall_back() {
        let resolver = DurationResolver::new().with_duration(DurationOverride::Auto);
        assert_eq!(resolver.resolve(Direction::Enter, None).duration_ms, 225.0);
        assert_eq!(resolver.resolve(Direction::Enter, Some(0.0)).duration_ms, 225.0);
        assert_eq!(resolver.resolve(Direction::Exit, Some(f64::NAN)).duration_ms, 195.0);
        assert_eq!(resolver.resolve(Direction::Exit, Some(36.0)).duration_ms, 192.0);
    }

    #[test]
    fn test_size_scaling_disabled() {
        let mut config = ZoomConfig::default();
        config.zoom.size_scaling = false;
        let resolver = DurationResolver::from_config(&config);
        assert_eq!(resolver.resolve(Direction::Enter, Some(5000.0)).duration_ms, 225.0);
    }

    #[test]
    fn test_uniform_override() {
        let resolver =
            DurationResolver::new().with_duration(DurationOverride::uniform(500.0).unwrap());
        assert_eq!(resolver.resolve(Direction::Enter, Some(1000.0)).duration_ms, 500.0);
        assert_eq!(resolver.resolve(Direction::Exit, None).duration_ms, 500.0);
    }

    #[test]
    fn test_split_override() {
        let pair = DurationResolver::new()
            .with_duration(DurationOverride::split(100.0, 50.0).unwrap())
            .resolve_pair(None);
        assert_eq!(pair.get(Direction::Enter).duration_ms, 100.0);
        assert_eq!(pair.get(Direction::Exit).duration_ms, 50.0);
    }

    #[test]
    fn test_invalid_overrides() {
        assert_eq!(
            DurationOverride::uniform(-1.0),
            Err(TransitionError::InvalidDuration(-1.0))
        );
        assert!(DurationOverride::split(10.0, f64::INFINITY).is_err());

        // Constructed directly, bad values are sanitised instead
        let resolver =
            DurationResolver::new().with_duration(DurationOverride::Uniform { ms: -20.0 });
        assert_eq!(resolver.resolve(Direction::Enter, None).duration_ms, 0.0);
    }

    #[test]
    fn test_easing_overrides() {
        let uniform = DurationResolver::new().with_easing(EasingOverride::parse("linear").unwrap());
        assert_eq!(uniform.easing(Direction::Enter), EasingFunction::Linear);
        assert_eq!(uniform.easing(Direction::Exit), EasingFunction::Linear);

        let split = DurationResolver::new()
            .with_easing(EasingOverride::parse_split("ease-out", "ease-in").unwrap());
        assert_eq!(split.resolve(Direction::Enter, None).easing, EasingFunction::EaseOut);
        assert_eq!(split.resolve(Direction::Exit, None).easing, EasingFunction::EaseIn);

        assert!(EasingOverride::parse("wobble").is_err());
    }

    #[test]
    fn test_config_tokens_and_fixed_values() {
        let mut config = ZoomConfig::default();
        config.zoom.enter = SpeedClass::Complex;
        config.zoom.exit_ms = Some(90.0);
        config.zoom.easing_css = Some("not-a-curve".to_string());

        let resolver = DurationResolver::from_config(&config);
        assert_eq!(resolver.base_duration(Direction::Enter), 375.0);
        assert_eq!(resolver.base_duration(Direction::Exit), 90.0);
        assert_eq!(resolver.easing(Direction::Enter), EasingFunction::standard());
    }

    #[test]
    fn test_delay_is_carried() {
        let timing = DurationResolver::new().with_delay(40.0).resolve(Direction::Enter, None);
        assert_eq!(timing.delay_ms, 40.0);
        assert_eq!(timing.total_ms(), 265.0);
    }

    #[test]
    fn test_timing_serialization() {
        let timing = DurationResolver::new().resolve(Direction::Exit, None);
        let json = serde_json::to_string(&timing).unwrap();
        let parsed: TransitionTiming = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, timing);
    }
}

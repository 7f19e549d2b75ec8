//! Inline style patches for each lifecycle phase.
//!
//! [`StylePatch::for_phase`] is a total function of the phase and the timing
//! in effect: every phase produces a complete patch, so there is no partial
//! state to accumulate on the element.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::duration::TransitionTiming;
use crate::types::Phase;

/// CSS `visibility` values written by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Hidden => "hidden",
        }
    }
}

/// Style to assign to the controlled element at a phase boundary.
///
/// `None` fields mean "remove the property" rather than "leave it alone".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StylePatch {
    /// Uniform scale factor, written as `transform: scale(n)`.
    pub scale: f32,
    /// `visibility`; `None` unsets it.
    pub visibility: Option<Visibility>,
    /// Timing for the `transition` shorthand; `None` unsets it.
    pub transition: Option<TransitionTiming>,
}

impl StylePatch {
    /// Patch for a phase.
    ///
    /// Pass `timing = None` for an instant snap (initial mount), which writes
    /// no `transition` at all.
    pub fn for_phase(phase: Phase, timing: Option<&TransitionTiming>) -> Self {
        let transition = timing.copied();
        match phase {
            Phase::Entering | Phase::Entered => Self {
                scale: 1.0,
                visibility: None,
                transition,
            },
            // Stay visible while shrinking so the exit animation can be seen
            Phase::Exiting => Self {
                scale: 0.0,
                visibility: None,
                transition,
            },
            Phase::Exited => Self {
                scale: 0.0,
                visibility: Some(Visibility::Hidden),
                transition,
            },
        }
    }

    /// `transform` value, e.g. `scale(0)`.
    pub fn transform_css(&self) -> String {
        format!("scale({})", self.scale)
    }

    /// `transition` shorthand, e.g. `transform 225ms cubic-bezier(0.4, 0, 0.2, 1) 0ms`.
    pub fn transition_css(&self) -> Option<String> {
        self.transition.map(|timing| {
            format!(
                "transform {}ms {} {}ms",
                timing.duration_ms, timing.easing, timing.delay_ms
            )
        })
    }

    /// Property writes in application order. `None` values remove the property.
    pub fn declarations(&self) -> [(&'static str, Option<String>); 3] {
        [
            ("transform", Some(self.transform_css())),
            ("visibility", self.visibility.map(|v| v.as_css().to_string())),
            ("transition", self.transition_css()),
        ]
    }
}

impl fmt::Display for StylePatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (property, value) in self.declarations() {
            if let Some(value) = value {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{property}: {value}")?;
                first = false;
            }
        }
        Ok(())
    }
}

static_assertions::assert_impl_all!(StylePatch: Send, Sync, Copy);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::EasingFunction;

    fn enter_timing() -> TransitionTiming {
        TransitionTiming::new(225.0, EasingFunction::standard())
    }

    #[test]
    fn test_entering_and_entered_are_full_scale() {
        let timing = enter_timing();
        for phase in [Phase::Entering, Phase::Entered] {
            let patch = StylePatch::for_phase(phase, Some(&timing));
            assert_eq!(patch.transform_css(), "scale(1)");
            assert_eq!(patch.visibility, None);
            assert_eq!(
                patch.transition_css().as_deref(),
                Some("transform 225ms cubic-bezier(0.4, 0, 0.2, 1) 0ms")
            );
        }
    }

    #[test]
    fn test_exiting_stays_visible() {
        let timing = TransitionTiming::new(195.0, EasingFunction::standard());
        let patch = StylePatch::for_phase(Phase::Exiting, Some(&timing));
        assert_eq!(patch.transform_css(), "scale(0)");
        assert_eq!(patch.visibility, None);
        assert_eq!(
            patch.transition_css().as_deref(),
            Some("transform 195ms cubic-bezier(0.4, 0, 0.2, 1) 0ms")
        );
    }

    #[test]
    fn test_exited_is_hidden() {
        let timing = TransitionTiming::new(195.0, EasingFunction::standard());
        let patch = StylePatch::for_phase(Phase::Exited, Some(&timing));
        assert_eq!(patch.transform_css(), "scale(0)");
        assert_eq!(patch.visibility, Some(Visibility::Hidden));
    }

    #[test]
    fn test_instant_snap_has_no_transition() {
        let patch = StylePatch::for_phase(Phase::Exited, None);
        assert_eq!(patch.transition_css(), None);
        assert_eq!(patch.to_string(), "transform: scale(0); visibility: hidden");

        let patch = StylePatch::for_phase(Phase::Entered, None);
        assert_eq!(patch.to_string(), "transform: scale(1)");
    }

    #[test]
    fn test_delay_in_shorthand() {
        let timing = TransitionTiming {
            duration_ms: 100.0,
            delay_ms: 12.5,
            easing: EasingFunction::Linear,
        };
        let patch = StylePatch::for_phase(Phase::Entering, Some(&timing));
        assert_eq!(
            patch.transition_css().as_deref(),
            Some("transform 100ms linear 12.5ms")
        );
    }
}

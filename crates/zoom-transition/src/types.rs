//! Core lifecycle types.
//!
//! - `Phase`: the four states a controlled element moves through
//! - `Direction`: which way a transition runs
//! - `LifecycleEvent`: the phase-boundary notifications emitted to callers

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle phase of a controlled element.
///
/// `Entering` and `Exiting` are transient: each entry into them is followed
/// exactly once by `Entered`/`Exited`, or by the opposite transient phase when
/// the intent is reversed mid-flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Hidden and at rest.
    #[default]
    Exited,
    /// Scaling up towards `Entered`.
    Entering,
    /// Visible and at rest.
    Entered,
    /// Scaling down towards `Exited`.
    Exiting,
}

impl Phase {
    /// Whether this phase is waiting on a completion signal.
    pub fn is_transient(self) -> bool {
        matches!(self, Self::Entering | Self::Exiting)
    }

    /// The direction this phase belongs to.
    pub fn direction(self) -> Direction {
        match self {
            Self::Entering | Self::Entered => Direction::Enter,
            Self::Exiting | Self::Exited => Direction::Exit,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Exited => "exited",
            Self::Entering => "entering",
            Self::Entered => "entered",
            Self::Exiting => "exiting",
        })
    }
}

/// Direction of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Enter,
    Exit,
}

impl Direction {
    /// The transient phase a transition in this direction starts in.
    pub fn transient_phase(self) -> Phase {
        match self {
            Self::Enter => Phase::Entering,
            Self::Exit => Phase::Exiting,
        }
    }

    /// The resting phase a transition in this direction completes in.
    pub fn terminal_phase(self) -> Phase {
        match self {
            Self::Enter => Phase::Entered,
            Self::Exit => Phase::Exited,
        }
    }
}

/// Phase-boundary notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// Enter style applied, before the completion signal is armed.
    Enter,
    /// Enter completion signal armed.
    Entering,
    /// Enter transition completed.
    Entered,
    /// Exit style applied, before the completion signal is armed.
    Exit,
    /// Exit completion signal armed.
    Exiting,
    /// Exit transition completed.
    Exited,
}

impl LifecycleEvent {
    /// Get the direction for this event.
    pub fn direction(self) -> Direction {
        match self {
            Self::Enter | Self::Entering | Self::Entered => Direction::Enter,
            Self::Exit | Self::Exiting | Self::Exited => Direction::Exit,
        }
    }

    /// Check if this event closes a transition.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Entered | Self::Exited)
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Enter => "enter",
            Self::Entering => "entering",
            Self::Entered => "entered",
            Self::Exit => "exit",
            Self::Exiting => "exiting",
            Self::Exited => "exited",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_phases() {
        assert_eq!(Direction::Enter.transient_phase(), Phase::Entering);
        assert_eq!(Direction::Exit.terminal_phase(), Phase::Exited);
        assert!(Phase::Exiting.is_transient());
        assert!(!Phase::default().is_transient());
    }

    #[test]
    fn test_event_names_match_serde() {
        for event in [LifecycleEvent::Enter, LifecycleEvent::Exiting, LifecycleEvent::Entered] {
            let json = serde_json::to_string(&event).unwrap();
            assert_eq!(json, format!("\"{event}\""));
        }
        assert_eq!(LifecycleEvent::Exited.direction(), Direction::Exit);
        assert!(LifecycleEvent::Exited.is_terminal());
    }
}

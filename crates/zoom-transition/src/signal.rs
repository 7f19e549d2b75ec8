//! Completion signal adapter.
//!
//! A transient phase ends when its completion signal fires. There are two
//! sources, and exactly one is armed per phase entry:
//!
//! - **Timer**: a deadline `duration + delay` after arming, checked against
//!   the controller's clock on every poll.
//! - **Manual**: a caller-supplied registrar receives the element and a
//!   [`CompletionHandle`], and calls [`CompletionHandle::fire`] when it has
//!   observed the animation end (for example from a `transitionend` event).
//!   Optionally bounded by a fallback deadline.
//!
//! # Cancellation
//!
//! ```text
//! arm ──► Armed ──fire──► Fired ──poll──► delivered
//!           │
//!           └──cancel──► Cancelled (fire / poll are no-ops)
//! ```
//!
//! Handles only hold a weak reference to their slot, so firing a handle after
//! its signal was cancelled, superseded or torn down does nothing.

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::types::Direction;

/// Caller hook that takes over completion detection.
pub type CompletionRegistrar<E> = Box<dyn FnMut(&E, CompletionHandle)>;

/// Identifier of one armed signal. Unique per adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignalId(pub u64);

/// Whether caller-driven completion is bounded by a timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManualFallback {
    /// Trust the caller's signal; wait for it indefinitely.
    Disabled,
    /// Also complete once the resolved duration has elapsed, whichever comes first.
    #[default]
    AfterDuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    Armed,
    Fired,
    Cancelled,
}

#[derive(Debug)]
struct SignalSlot {
    id: SignalId,
    state: Cell<SlotState>,
}

/// Handle given to a [`CompletionRegistrar`]; call [`fire`](Self::fire) once
/// the externally observed animation has ended.
#[derive(Debug, Clone)]
pub struct CompletionHandle {
    slot: Weak<SignalSlot>,
}

impl CompletionHandle {
    /// Report completion. The phase advances on the controller's next poll.
    ///
    /// Returns `false` if the signal was already fired, cancelled, or torn
    /// down, in which case nothing happens.
    pub fn fire(&self) -> bool {
        let Some(slot) = self.slot.upgrade() else {
            tracing::trace!("completion fired after teardown; ignored");
            return false;
        };
        match slot.state.get() {
            SlotState::Armed => {
                slot.state.set(SlotState::Fired);
                true
            }
            state => {
                tracing::trace!(signal = slot.id.0, ?state, "late completion ignored");
                false
            }
        }
    }

    /// Whether a fire would still be accepted.
    pub fn is_pending(&self) -> bool {
        self.slot
            .upgrade()
            .is_some_and(|slot| slot.state.get() == SlotState::Armed)
    }

    /// Id of the signal this handle belongs to, while it is alive.
    pub fn signal_id(&self) -> Option<SignalId> {
        self.slot.upgrade().map(|slot| slot.id)
    }
}

#[derive(Debug)]
enum SignalSource {
    Timer {
        deadline_ms: f64,
    },
    Manual {
        slot: Rc<SignalSlot>,
        fallback_deadline_ms: Option<f64>,
    },
}

/// The signal currently armed for a transient phase.
#[derive(Debug)]
pub struct ActiveSignal {
    id: SignalId,
    direction: Direction,
    armed_at_ms: f64,
    source: SignalSource,
}

impl ActiveSignal {
    pub fn armed_at_ms(&self) -> f64 {
        self.armed_at_ms
    }

    /// Time at which the signal completes on its own, if any.
    pub fn deadline_ms(&self) -> Option<f64> {
        match &self.source {
            SignalSource::Timer { deadline_ms } => Some(*deadline_ms),
            SignalSource::Manual {
                fallback_deadline_ms,
                ..
            } => *fallback_deadline_ms,
        }
    }

    fn has_completed(&self, now_ms: f64) -> bool {
        match &self.source {
            SignalSource::Timer { deadline_ms } => now_ms >= *deadline_ms,
            SignalSource::Manual {
                slot,
                fallback_deadline_ms,
            } => {
                slot.state.get() == SlotState::Fired
                    || fallback_deadline_ms.is_some_and(|deadline| now_ms >= deadline)
            }
        }
    }

    fn cancel(&self) {
        if let SignalSource::Manual { slot, .. } = &self.source {
            slot.state.set(SlotState::Cancelled);
        }
    }
}

/// Arms, cancels and polls the completion signal of one controller.
pub struct CompletionAdapter<E> {
    registrar: Option<CompletionRegistrar<E>>,
    fallback: ManualFallback,
    active: Option<ActiveSignal>,
    next_id: u64,
}

impl<E> fmt::Debug for CompletionAdapter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionAdapter")
            .field("manual", &self.registrar.is_some())
            .field("fallback", &self.fallback)
            .field("active", &self.active)
            .finish()
    }
}

impl<E> Default for CompletionAdapter<E> {
    fn default() -> Self {
        Self::new(None, ManualFallback::default())
    }
}

impl<E> CompletionAdapter<E> {
    pub fn new(registrar: Option<CompletionRegistrar<E>>, fallback: ManualFallback) -> Self {
        Self {
            registrar,
            fallback,
            active: None,
            next_id: 1,
        }
    }

    /// Whether completion is caller-driven.
    pub fn is_manual(&self) -> bool {
        self.registrar.is_some()
    }

    pub fn active(&self) -> Option<&ActiveSignal> {
        self.active.as_ref()
    }

    /// Deadline of the armed signal, if it has one.
    pub fn next_deadline(&self) -> Option<f64> {
        self.active.as_ref().and_then(ActiveSignal::deadline_ms)
    }

    /// Arm a signal for a transition that takes `duration_ms` from `now_ms`.
    ///
    /// The previous signal must have been cancelled or delivered first.
    pub fn arm(
        &mut self,
        direction: Direction,
        element: &E,
        duration_ms: f64,
        now_ms: f64,
    ) -> SignalId {
        debug_assert!(
            self.active.is_none(),
            "completion signal armed while another is still active"
        );
        if let Some(stale) = self.active.take() {
            tracing::error!(
                signal = stale.id.0,
                "completion signal armed while another is still active; cancelling the stale one"
            );
            stale.cancel();
        }

        let id = SignalId(self.next_id);
        self.next_id += 1;
        let deadline_ms = now_ms + duration_ms;

        let source = match self.registrar.as_mut() {
            Some(registrar) => {
                let slot = Rc::new(SignalSlot {
                    id,
                    state: Cell::new(SlotState::Armed),
                });
                let handle = CompletionHandle {
                    slot: Rc::downgrade(&slot),
                };
                let fallback_deadline_ms = match self.fallback {
                    ManualFallback::Disabled => None,
                    ManualFallback::AfterDuration => Some(deadline_ms),
                };
                registrar(element, handle);
                SignalSource::Manual {
                    slot,
                    fallback_deadline_ms,
                }
            }
            None => SignalSource::Timer { deadline_ms },
        };

        tracing::trace!(signal = id.0, ?direction, duration_ms, "completion signal armed");
        self.active = Some(ActiveSignal {
            id,
            direction,
            armed_at_ms: now_ms,
            source,
        });
        id
    }

    /// Cancel the armed signal. Returns whether one was active.
    ///
    /// Safe to call any number of times.
    pub fn cancel(&mut self) -> bool {
        match self.active.take() {
            Some(signal) => {
                signal.cancel();
                tracing::trace!(signal = signal.id.0, "completion signal cancelled");
                true
            }
            None => false,
        }
    }

    /// Deliver the armed signal if it has completed by `now_ms`.
    ///
    /// Returns the direction of the completed transition. A delivered signal
    /// is consumed; later fires of its handle are ignored.
    pub fn poll(&mut self, now_ms: f64) -> Option<Direction> {
        let completed = self
            .active
            .as_ref()
            .is_some_and(|signal| signal.has_completed(now_ms));
        if !completed {
            return None;
        }

        let signal = self.active.take()?;
        // Close the slot so a manual fire racing the fallback is dropped
        signal.cancel();
        Some(signal.direction)
    }
}

//! Lifecycle state machine.
//!
//! `TransitionMachine` owns the controlled element, the current [`Phase`] and
//! the one armed completion signal. Intent changes drive it synchronously;
//! completions are delivered when the host calls [`poll`](TransitionMachine::poll).
//!
//! ```text
//!   Exited ──in──► Entering ──signal──► Entered
//!     ▲               │ ▲                  │
//!     │             out in                out
//!     │               ▼ │                  │
//!     └──signal─── Exiting ◄───────────────┘
//! ```
//!
//! Every transition into a transient phase runs the same sequence: cancel
//! the previous signal, apply the phase's style patch, emit `enter`/`exit`,
//! arm the new signal, emit `entering`/`exiting`.

use crate::clock::Clock;
use crate::duration::{DurationResolver, TimingPair, TransitionTiming};
use crate::element::TransitionElement;
use crate::events::{EventQueue, LifecycleHooks, RecordedEvent};
use crate::signal::CompletionAdapter;
use crate::style::StylePatch;
use crate::types::{Direction, LifecycleEvent, Phase};

/// Everything a machine needs besides its element.
pub struct MachineInit<E> {
    /// Initial intent.
    pub intent: bool,
    /// Animate the first enter when `intent` starts true.
    pub appear: bool,
    pub resolver: DurationResolver,
    pub adapter: CompletionAdapter<E>,
    pub hooks: LifecycleHooks<E>,
    pub clock: Box<dyn Clock>,
    /// Size change below which cached timings are reused.
    pub size_epsilon_px: f64,
}

/// Timings cached against the element size they were resolved for.
#[derive(Debug, Clone)]
struct TimingCache {
    size: Option<f64>,
    pair: TimingPair,
    epsilon: f64,
}

impl TimingCache {
    fn new(resolver: &DurationResolver, size: Option<f64>, epsilon: f64) -> Self {
        Self {
            size,
            pair: resolver.resolve_pair(size),
            epsilon: if epsilon.is_finite() { epsilon.max(0.0) } else { 0.0 },
        }
    }

    fn refresh(&mut self, resolver: &DurationResolver, size: Option<f64>) -> &TimingPair {
        let changed = match (self.size, size) {
            (Some(old), Some(new)) => (old - new).abs() >= self.epsilon.max(f64::EPSILON),
            (None, None) => false,
            _ => true,
        };
        if changed {
            self.size = size;
            self.pair = resolver.resolve_pair(size);
            tracing::debug!(
                ?size,
                enter_ms = self.pair.enter.duration_ms,
                exit_ms = self.pair.exit.duration_ms,
                "transition timings recomputed"
            );
        }
        &self.pair
    }

    fn reset(&mut self, resolver: &DurationResolver) {
        self.pair = resolver.resolve_pair(self.size);
    }
}

/// Phase lifecycle of one controlled element.
pub struct TransitionMachine<E> {
    element: E,
    phase: Phase,
    intent: bool,
    resolver: DurationResolver,
    timings: TimingCache,
    adapter: CompletionAdapter<E>,
    hooks: LifecycleHooks<E>,
    clock: Box<dyn Clock>,
    events: EventQueue,
    style: StylePatch,
    /// Timing of the transition in flight, or of the last one that completed.
    timing: Option<TransitionTiming>,
    /// Scale the transition in flight started from.
    from_scale: f32,
    halted: bool,
}

impl<E: TransitionElement> TransitionMachine<E> {
    /// Mount a machine on `element` and apply its initial style synchronously.
    ///
    /// - `intent = false`: snaps to `Exited`, no callbacks.
    /// - `intent = true, appear = false`: snaps to `Entered`, no callbacks.
    /// - `intent = true, appear = true`: snaps to `Exited`, then runs the enter
    ///   sequence immediately.
    pub fn mount(element: E, init: MachineInit<E>) -> Self {
        let MachineInit {
            intent,
            appear,
            resolver,
            adapter,
            hooks,
            clock,
            size_epsilon_px,
        } = init;

        let timings = TimingCache::new(&resolver, element.measure(), size_epsilon_px);
        let snap_phase = if intent && !appear {
            Phase::Entered
        } else {
            Phase::Exited
        };

        let mut machine = Self {
            element,
            phase: snap_phase,
            intent: snap_phase == Phase::Entered,
            resolver,
            timings,
            adapter,
            hooks,
            clock,
            events: EventQueue::new(),
            style: StylePatch::for_phase(snap_phase, None),
            timing: None,
            from_scale: 0.0,
            halted: false,
        };
        machine.apply(StylePatch::for_phase(snap_phase, None));
        tracing::debug!(phase = %snap_phase, intent, appear, "transition mounted");

        if intent && appear {
            machine.set_intent(true);
        }
        machine
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn intent(&self) -> bool {
        self.intent
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    /// Mutable access for the host, e.g. to update layout or detach.
    pub fn element_mut(&mut self) -> &mut E {
        &mut self.element
    }

    /// Last style patch written to the element.
    pub fn style(&self) -> &StylePatch {
        &self.style
    }

    /// Whether the machine stopped after losing its element.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn resolver(&self) -> &DurationResolver {
        &self.resolver
    }

    /// Replace the duration resolver. Applies from the next transition on.
    pub fn set_resolver(&mut self, resolver: DurationResolver) {
        self.resolver = resolver;
        self.timings.reset(&self.resolver);
    }

    /// Timings the next transition would use, given the current element size.
    pub fn timings(&mut self) -> TimingPair {
        let size = self.element.measure();
        *self.timings.refresh(&self.resolver, size)
    }

    /// Change the target visibility.
    ///
    /// A change while `Entering`/`Exiting` reverses the transition: the
    /// in-flight signal is cancelled and its terminal callback never fires.
    /// Setting the current intent again does nothing. If the element has
    /// been detached, a transition in flight is completed on the spot and the
    /// machine halts instead.
    pub fn set_intent(&mut self, intent: bool) {
        if self.halted || intent == self.intent {
            return;
        }
        self.intent = intent;

        if !self.element.is_attached() {
            // Settle the in-flight transition before stopping
            if self.phase.is_transient() {
                self.adapter.cancel();
                self.complete(self.phase.direction());
            } else {
                self.halt();
            }
            return;
        }

        if self.phase.is_transient() {
            tracing::debug!(phase = %self.phase, intent, "transition reversed");
        }
        let direction = if intent {
            Direction::Enter
        } else {
            Direction::Exit
        };
        self.begin(direction);
    }

    /// Deliver a completed signal, if any. Returns whether the phase advanced.
    pub fn poll(&mut self) -> bool {
        if self.halted {
            return false;
        }
        let now = self.clock.now_ms();
        match self.adapter.poll(now) {
            Some(direction) => {
                self.complete(direction);
                true
            }
            None => false,
        }
    }

    /// Clock time at which the armed signal completes on its own.
    ///
    /// `None` at rest, or while waiting on a caller-driven signal without a
    /// fallback.
    pub fn next_deadline(&self) -> Option<f64> {
        if self.halted {
            return None;
        }
        self.adapter.next_deadline()
    }

    /// Progress of the transition in flight, in [0, 1], before easing.
    pub fn progress(&self) -> Option<f32> {
        let signal = self.adapter.active()?;
        let timing = self.timing?;
        if timing.duration_ms <= 0.0 {
            return Some(1.0);
        }
        let elapsed = self.clock.now_ms() - signal.armed_at_ms() - timing.delay_ms;
        Some((elapsed / timing.duration_ms).clamp(0.0, 1.0) as f32)
    }

    /// Eased scale factor at the current clock time.
    ///
    /// For hosts that draw the scale themselves instead of handing the
    /// `transition` shorthand to a style engine.
    pub fn current_scale(&self) -> f32 {
        let target = match self.phase {
            Phase::Entered => return 1.0,
            Phase::Exited => return 0.0,
            Phase::Entering => 1.0,
            Phase::Exiting => 0.0,
        };
        match (self.progress(), self.timing) {
            (Some(progress), Some(timing)) => {
                let eased = timing.easing.evaluate(progress);
                self.from_scale + (target - self.from_scale) * eased
            }
            _ => target,
        }
    }

    /// Drain lifecycle events recorded since the last drain.
    pub fn drain_events(&mut self) -> impl Iterator<Item = RecordedEvent> + '_ {
        self.events.drain()
    }

    /// Cancel any pending signal and hand the element back.
    ///
    /// Handles held by a completion registrar become inert.
    pub fn unmount(mut self) -> E {
        self.adapter.cancel();
        self.hooks.clear();
        tracing::debug!(phase = %self.phase, "transition unmounted");
        self.element
    }

    fn begin(&mut self, direction: Direction) {
        self.from_scale = self.current_scale();
        self.adapter.cancel();

        let size = self.element.measure();
        let timing = *self.timings.refresh(&self.resolver, size).get(direction);
        let phase = direction.transient_phase();
        self.enter_phase(phase);
        self.timing = Some(timing);
        self.apply(StylePatch::for_phase(phase, Some(&timing)));

        let (start, armed) = match direction {
            Direction::Enter => (LifecycleEvent::Enter, LifecycleEvent::Entering),
            Direction::Exit => (LifecycleEvent::Exit, LifecycleEvent::Exiting),
        };
        self.emit(start);
        let now = self.clock.now_ms();
        self.adapter.arm(direction, &self.element, timing.total_ms(), now);
        self.emit(armed);
    }

    fn complete(&mut self, direction: Direction) {
        debug_assert_eq!(self.phase, direction.transient_phase());
        let phase = direction.terminal_phase();
        self.enter_phase(phase);

        let attached = self.element.is_attached();
        if attached {
            self.apply(StylePatch::for_phase(phase, self.timing.as_ref()));
        }

        let event = match direction {
            Direction::Enter => LifecycleEvent::Entered,
            Direction::Exit => LifecycleEvent::Exited,
        };
        self.emit(event);

        if !attached {
            self.halt();
        }
    }

    fn enter_phase(&mut self, phase: Phase) {
        tracing::debug!(from = %self.phase, to = %phase, "phase transition");
        self.phase = phase;
    }

    fn apply(&mut self, patch: StylePatch) {
        self.element.apply_style(&patch);
        self.style = patch;
    }

    fn emit(&mut self, event: LifecycleEvent) {
        self.events.push(event, self.clock.now_ms());
        self.hooks.dispatch(event, &self.element);
    }

    fn halt(&mut self) {
        tracing::warn!(phase = %self.phase, "controlled element detached; transition halted");
        self.adapter.cancel();
        self.halted = true;
    }
}

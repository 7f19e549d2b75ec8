//! Component-style entry point.
//!
//! [`ZoomProps`] collects what a caller passes to a zoom transition: target
//! visibility, timing overrides and lifecycle handlers. [`Zoom`] turns them
//! into a [`TransitionMachine`] and forwards to it; it keeps no state of its
//! own.

use std::fmt;

use zoom_config::ZoomConfig;

use crate::clock::{Clock, SystemClock};
use crate::duration::{DurationOverride, DurationResolver, EasingOverride, TimingPair};
use crate::element::TransitionElement;
use crate::events::{LifecycleHooks, RecordedEvent};
use crate::machine::{MachineInit, TransitionMachine};
use crate::signal::{CompletionAdapter, CompletionHandle, CompletionRegistrar, ManualFallback};
use crate::style::StylePatch;
use crate::types::{LifecycleEvent, Phase};

/// Properties of a zoom transition.
pub struct ZoomProps<E> {
    /// Target visibility.
    pub in_: bool,
    /// Animate the first enter. `None` uses the configured default.
    pub appear: Option<bool>,
    pub timeout: DurationOverride,
    pub easing: EasingOverride,
    pub delay_ms: f64,
    /// Bound caller-driven completion by a timeout. `None` uses the configured default.
    pub manual_fallback: Option<ManualFallback>,
    hooks: LifecycleHooks<E>,
    end_listener: Option<CompletionRegistrar<E>>,
}

impl<E> Default for ZoomProps<E> {
    fn default() -> Self {
        Self {
            in_: false,
            appear: None,
            timeout: DurationOverride::Theme,
            easing: EasingOverride::Theme,
            delay_ms: 0.0,
            manual_fallback: None,
            hooks: LifecycleHooks::new(),
            end_listener: None,
        }
    }
}

impl<E> fmt::Debug for ZoomProps<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZoomProps")
            .field("in_", &self.in_)
            .field("appear", &self.appear)
            .field("timeout", &self.timeout)
            .field("easing", &self.easing)
            .field("delay_ms", &self.delay_ms)
            .field("manual_fallback", &self.manual_fallback)
            .field("hooks", &self.hooks)
            .field("add_end_listener", &self.end_listener.is_some())
            .finish()
    }
}

impl<E> ZoomProps<E> {
    pub fn new(in_: bool) -> Self {
        Self {
            in_,
            ..Self::default()
        }
    }

    pub fn appear(mut self, appear: bool) -> Self {
        self.appear = Some(appear);
        self
    }

    pub fn timeout(mut self, timeout: DurationOverride) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn easing(mut self, easing: EasingOverride) -> Self {
        self.easing = easing;
        self
    }

    pub fn delay(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn manual_fallback(mut self, fallback: ManualFallback) -> Self {
        self.manual_fallback = Some(fallback);
        self
    }

    pub fn on_enter(mut self, hook: impl FnMut(&E) + 'static) -> Self {
        self.hooks.on_enter = Some(Box::new(hook));
        self
    }

    pub fn on_entering(mut self, hook: impl FnMut(&E) + 'static) -> Self {
        self.hooks.on_entering = Some(Box::new(hook));
        self
    }

    pub fn on_entered(mut self, hook: impl FnMut(&E) + 'static) -> Self {
        self.hooks.on_entered = Some(Box::new(hook));
        self
    }

    pub fn on_exit(mut self, hook: impl FnMut(&E) + 'static) -> Self {
        self.hooks.on_exit = Some(Box::new(hook));
        self
    }

    pub fn on_exiting(mut self, hook: impl FnMut(&E) + 'static) -> Self {
        self.hooks.on_exiting = Some(Box::new(hook));
        self
    }

    pub fn on_exited(mut self, hook: impl FnMut(&E) + 'static) -> Self {
        self.hooks.on_exited = Some(Box::new(hook));
        self
    }

    /// Take over completion detection.
    ///
    /// Called once per transition with the element and a handle to fire when
    /// the animation has ended. The resolved duration still bounds the wait
    /// unless [`ManualFallback::Disabled`] is set, in which case only the
    /// handle completes the transition.
    pub fn add_end_listener(
        mut self,
        listener: impl FnMut(&E, CompletionHandle) + 'static,
    ) -> Self {
        self.end_listener = Some(Box::new(listener));
        self
    }

    /// Receive every lifecycle event.
    pub fn subscribe(mut self, subscriber: impl FnMut(LifecycleEvent, &E) + 'static) -> Self {
        self.hooks.subscribe(Box::new(subscriber));
        self
    }
}

/// A zoom transition mounted on one element.
pub struct Zoom<E> {
    machine: TransitionMachine<E>,
}

impl<E: TransitionElement> Zoom<E> {
    /// Mount with the default theme and the wall clock.
    pub fn mount(element: E, props: ZoomProps<E>) -> Self {
        Self::mount_with(element, props, SystemClock::new(), &ZoomConfig::default())
    }

    /// Mount with an explicit clock and theme configuration.
    pub fn mount_with(
        element: E,
        props: ZoomProps<E>,
        clock: impl Clock + 'static,
        config: &ZoomConfig,
    ) -> Self {
        let ZoomProps {
            in_,
            appear,
            timeout,
            easing,
            delay_ms,
            manual_fallback,
            hooks,
            end_listener,
        } = props;

        let fallback = manual_fallback.unwrap_or(if config.zoom.manual_fallback {
            ManualFallback::AfterDuration
        } else {
            ManualFallback::Disabled
        });
        let resolver = DurationResolver::from_config(config)
            .with_duration(timeout)
            .with_easing(easing)
            .with_delay(delay_ms);

        let machine = TransitionMachine::mount(
            element,
            MachineInit {
                intent: in_,
                appear: appear.unwrap_or(config.zoom.appear),
                resolver,
                adapter: CompletionAdapter::new(end_listener, fallback),
                hooks,
                clock: Box::new(clock),
                size_epsilon_px: config.zoom.size_epsilon_px,
            },
        );
        Self { machine }
    }

    /// Set the target visibility.
    pub fn set_in(&mut self, in_: bool) {
        self.machine.set_intent(in_);
    }

    pub fn is_in(&self) -> bool {
        self.machine.intent()
    }

    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    /// Deliver due completions. Call from the host loop.
    pub fn poll(&mut self) -> bool {
        self.machine.poll()
    }

    pub fn next_deadline(&self) -> Option<f64> {
        self.machine.next_deadline()
    }

    pub fn current_scale(&self) -> f32 {
        self.machine.current_scale()
    }

    pub fn style(&self) -> &StylePatch {
        self.machine.style()
    }

    pub fn timings(&mut self) -> TimingPair {
        self.machine.timings()
    }

    /// Change the duration override. Takes effect on the next transition.
    pub fn set_timeout(&mut self, timeout: DurationOverride) {
        let resolver = self.machine.resolver().clone().with_duration(timeout);
        self.machine.set_resolver(resolver);
    }

    /// Change the easing override. Takes effect on the next transition.
    pub fn set_easing(&mut self, easing: EasingOverride) {
        let resolver = self.machine.resolver().clone().with_easing(easing);
        self.machine.set_resolver(resolver);
    }

    pub fn element(&self) -> &E {
        self.machine.element()
    }

    pub fn element_mut(&mut self) -> &mut E {
        self.machine.element_mut()
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = RecordedEvent> + '_ {
        self.machine.drain_events()
    }

    /// Tear down, cancelling any pending completion, and return the element.
    pub fn unmount(self) -> E {
        self.machine.unmount()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::element::StyledElement;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn test_props_builder() {
        let props: ZoomProps<StyledElement> = ZoomProps::new(true)
            .appear(false)
            .delay(20.0)
            .manual_fallback(ManualFallback::AfterDuration)
            .on_exited(|_| {});

        assert!(props.in_);
        assert_eq!(props.appear, Some(false));
        assert_eq!(props.delay_ms, 20.0);
        assert!(props.hooks.on_exited.is_some());
        assert!(props.hooks.on_enter.is_none());
        assert!(format!("{props:?}").contains("add_end_listener: false"));
    }

    #[test]
    fn test_config_supplies_appear_default() {
        let mut config = ZoomConfig::default();
        config.zoom.appear = false;

        let zoom = Zoom::mount_with(
            StyledElement::new("a"),
            ZoomProps::new(true),
            ManualClock::new(),
            &config,
        );
        assert_eq!(zoom.phase(), Phase::Entered);

        let zoom = Zoom::mount_with(
            StyledElement::new("a"),
            ZoomProps::new(true).appear(true),
            ManualClock::new(),
            &config,
        );
        assert_eq!(zoom.phase(), Phase::Entering);
    }

    #[test]
    fn test_end_listener_is_bounded_by_default() {
        let clock = ManualClock::new();
        let mut zoom = Zoom::mount_with(
            StyledElement::new("a"),
            ZoomProps::new(false).add_end_listener(|_, _| {}),
            clock.clone(),
            &ZoomConfig::default(),
        );
        zoom.set_in(true);
        assert!(zoom.is_in());
        assert_eq!(zoom.next_deadline(), Some(225.0));

        clock.advance(225.0);
        assert!(zoom.poll());
        assert_eq!(zoom.phase(), Phase::Entered);
    }

    #[test]
    fn test_config_disables_manual_fallback() {
        let mut config = ZoomConfig::default();
        config.zoom.manual_fallback = false;
        let clock = ManualClock::new();

        let mut zoom = Zoom::mount_with(
            StyledElement::new("a"),
            ZoomProps::new(false).add_end_listener(|_, _| {}),
            clock.clone(),
            &config,
        );
        zoom.set_in(true);
        assert_eq!(zoom.next_deadline(), None);

        clock.advance(10_000.0);
        assert!(!zoom.poll());
        assert_eq!(zoom.phase(), Phase::Entering);
    }

    #[test]
    fn test_overrides_change_next_transition() {
        let clock = ManualClock::new();
        let mut zoom = Zoom::mount_with(
            StyledElement::new("a"),
            ZoomProps::new(false),
            clock.clone(),
            &ZoomConfig::default(),
        );

        zoom.set_timeout(DurationOverride::split(80.0, 40.0).unwrap());
        zoom.set_easing(EasingOverride::parse("linear").unwrap());
        zoom.set_in(true);
        assert_eq!(zoom.next_deadline(), Some(80.0));
        assert_eq!(
            zoom.element().style().get("transition"),
            Some("transform 80ms linear 0ms")
        );

        clock.advance(40.0);
        assert_eq!(zoom.current_scale(), 0.5);
    }

    #[test]
    fn test_unmount_silences_callbacks() {
        let clock = ManualClock::new();
        let entered = Rc::new(Cell::new(0));
        let handles: Rc<RefCell<Vec<CompletionHandle>>> = Rc::default();

        let counter = entered.clone();
        let store = handles.clone();
        let mut zoom = Zoom::mount_with(
            StyledElement::new("a"),
            ZoomProps::new(false)
                .on_entered(move |_| counter.set(counter.get() + 1))
                .add_end_listener(move |_, handle| store.borrow_mut().push(handle)),
            clock.clone(),
            &ZoomConfig::default(),
        );
        zoom.set_in(true);
        let element = zoom.unmount();

        assert!(!handles.borrow()[0].fire());
        assert_eq!(entered.get(), 0);
        assert_eq!(element.id(), "a");
    }
}

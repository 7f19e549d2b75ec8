//! Scale-in/scale-out visibility controller.
//!
//! Drives one element between hidden and shown with a `transform: scale()`
//! transition, exposing the lifecycle as an explicit phase machine:
//!
//! - **Intent**: the caller's target visibility (`set_in` / `set_intent`)
//! - **Phases**: `Exited`, `Entering`, `Entered`, `Exiting`
//! - **Completion signals**: a clock deadline or a caller-fired handle
//! - **Style patches**: a pure function of phase and resolved timing
//!
//! # Architecture
//!
//! ```text
//! Zoom (props adapter)
//!   └── TransitionMachine
//!         ├── DurationResolver   (theme tokens, size scaling, overrides)
//!         ├── CompletionAdapter  (timer or caller-driven signal)
//!         ├── LifecycleHooks     (callbacks and subscribers)
//!         └── TransitionElement  (receives StylePatch writes)
//! ```
//!
//! Nothing runs in the background. The host calls `poll()` from its loop and
//! may sleep until `next_deadline()`.

pub mod clock;
pub mod duration;
pub mod easing;
pub mod element;
pub mod error;
pub mod events;
pub mod machine;
pub mod signal;
pub mod style;
pub mod types;
pub mod zoom;

pub use clock::{Clock, ManualClock, SystemClock};
pub use duration::{
    DurationOverride, DurationResolver, EasingOverride, TimingPair, TransitionTiming, auto_duration,
};
pub use easing::EasingFunction;
pub use element::{InlineStyle, StyledElement, TransitionElement};
pub use error::{Result, TransitionError};
pub use events::{EventQueue, LifecycleHooks, RecordedEvent};
pub use machine::{MachineInit, TransitionMachine};
pub use signal::{
    CompletionAdapter, CompletionHandle, CompletionRegistrar, ManualFallback, SignalId,
};
pub use style::{StylePatch, Visibility};
pub use types::{Direction, LifecycleEvent, Phase};
pub use zoom::{Zoom, ZoomProps};
pub use zoom_config::ZoomConfig;

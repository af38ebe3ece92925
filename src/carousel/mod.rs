//! Showcase carousel subsystem
//!
//! Splits the carousel into small single-purpose parts that meet in one actor:
//!
//! 1. [`transition`] - the transition controller, sole owner of the position
//! 2. [`scheduler`] - auto-advance ticks
//! 3. [`pause`] - hover/focus tracking that suspends auto-advance
//! 4. [`input`] - keyboard and click routing
//! 5. [`announcer`] - live-region text
//! 6. [`handle`] - the tokio task tying them together
//!
//! # Architecture
//!
//! ```text
//! Input Router ──┐
//!                ├─► CarouselActor (TransitionController) ──► CarouselSnapshot ──► UI
//! AutoAdvance  ──┘          ▲                                     (announcement)
//!                     PauseTracker
//! ```
//!
//! Only the actor writes carousel state. Everybody else submits
//! [`CarouselCommand`]s or reads committed [`CarouselSnapshot`]s.

pub mod announcer;
pub mod handle;
pub mod input;
pub mod pause;
pub mod scheduler;
pub mod transition;

pub use handle::{
    CarouselCommand, CarouselError, CarouselHandle, CarouselSettings, CarouselSnapshot,
    SlideAnimation,
};
pub use input::{route, InputEvent, NavigationKey, NavigationRequest, RoutedInput};
pub use pause::{InteractionSignal, PauseTracker};
pub use scheduler::AutoAdvance;
pub use transition::{
    Direction, IgnoreReason, LockPolicy, RequestOutcome, StageKind, TransitionController,
    TransitionTimings,
};

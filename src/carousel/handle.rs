//! Carousel Handle - mount/unmount API for the carousel actor
//!
//! Spawning a [`CarouselHandle`] mounts the carousel: a tokio task takes
//! ownership of the transition controller, the auto-advance scheduler and the
//! pause tracker. The render layer talks to it through two channels:
//!
//! ```text
//! UI ─[CarouselCommand]→ CarouselActor ─[CarouselSnapshot]→ UI / announcer
//!     (mpsc::channel(64))                (watch::channel)
//! ```
//!
//! The actor sleeps until the earliest pending deadline (phase completion or
//! auto-advance tick), a command, or cancellation. Unmounting cancels the
//! token; the task drops every pending deadline and publishes nothing more.

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::announcer;
use super::input::NavigationRequest;
use super::pause::{InteractionSignal, PauseTracker};
use super::scheduler::AutoAdvance;
use super::transition::{
    Direction, LockPolicy, RequestOutcome, StageKind, TransitionController, TransitionTimings,
};
use crate::deck::CardDeck;

const COMMAND_BUFFER: usize = 64;

/// Configuration settings for a mounted carousel.
///
/// These values are fixed for the lifetime of the carousel task. To change
/// them, unmount the carousel and spawn a new one.
///
/// The defaults (250ms exit, 50ms settle, 4500ms auto-advance) give a card
/// swap that finishes well before the next tick. An auto-advance interval
/// shorter than a full transition still works; each tick then supersedes the
/// transition in flight.
#[derive(Clone, Debug)]
pub struct CarouselSettings {
    /// Exit and settle durations of a single transition
    pub timings: TransitionTimings,

    /// Interval between auto-advance ticks.
    ///
    /// The interval restarts from a full period whenever a navigation
    /// request is accepted and whenever the carousel resumes from a pause.
    pub auto_advance: Duration,

    /// Start the auto-advance scheduler on mount.
    ///
    /// When false the carousel only moves on user input, and resuming from a
    /// pause does not arm the scheduler either.
    pub autoplay: bool,

    /// How next/previous requests treat a transition that is in flight
    pub lock_policy: LockPolicy,
}

impl Default for CarouselSettings {
    fn default() -> Self {
        Self {
            timings: TransitionTimings::default(),
            auto_advance: Duration::from_millis(4500),
            autoplay: true,
            lock_policy: LockPolicy::Reference,
        }
    }
}

/// Errors that can occur when talking to a mounted carousel.
///
/// Navigation requests that the controller refuses (already active, out of
/// range, in flight) are not errors; they are reported as
/// [`RequestOutcome::Ignored`] in the actor's debug log.
#[derive(Debug, thiserror::Error)]
pub enum CarouselError {
    /// The carousel task is gone and commands have nothing to act on.
    ///
    /// Typically indicates that [`CarouselHandle::unmount`] was called, or
    /// that the task stopped after its command channel closed.
    #[error("Carousel is unmounted")]
    Unmounted,

    /// A command could not be queued.
    ///
    /// Typically indicates that the UI produced more than the buffered
    /// number of commands before the actor could drain them. The command is
    /// dropped.
    #[error("Channel error: {0}")]
    ChannelError(String),

    /// The carousel task did not finish cleanly.
    ///
    /// Typically indicates a panic inside the actor, surfaced when awaiting
    /// the task during unmount.
    #[error("Task error: {0}")]
    TaskError(String),
}

/// Commands accepted by the carousel actor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselCommand {
    Navigate(NavigationRequest),
    Interaction(InteractionSignal),
}

/// Animation variant the render layer should play for the displayed card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideAnimation {
    /// Current card sliding out
    SlideOut(Direction),
    /// Card swapped while hidden, waiting for the settle delay
    Hidden(Direction),
    /// Displayed card sliding in / resting
    SlideIn(Direction),
}

/// Committed carousel state, published after every change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselSnapshot {
    pub active_index: usize,
    pub display_index: usize,
    pub direction: Direction,
    pub stage: StageKind,
    pub paused: bool,
    pub card_count: usize,
    /// Live-region text for `active_index`
    pub announcement: String,
}

impl CarouselSnapshot {
    pub fn animation(&self) -> SlideAnimation {
        match self.stage {
            StageKind::Exiting => SlideAnimation::SlideOut(self.direction),
            StageKind::Entering => SlideAnimation::Hidden(self.direction),
            StageKind::Idle => SlideAnimation::SlideIn(self.direction),
        }
    }
}

fn build_snapshot(
    deck: &CardDeck,
    controller: &TransitionController,
    pause: &PauseTracker,
) -> CarouselSnapshot {
    let active_index = controller.active_index();
    CarouselSnapshot {
        active_index,
        display_index: controller.display_index(),
        direction: controller.direction(),
        stage: controller.stage(),
        paused: pause.is_paused(),
        card_count: deck.len(),
        announcement: announcer::announcement(deck, active_index),
    }
}

struct CarouselActor {
    deck: CardDeck,
    controller: TransitionController,
    scheduler: AutoAdvance,
    pause: PauseTracker,
    autoplay: bool,
    snapshot_sender: watch::Sender<CarouselSnapshot>,
    cancel: CancellationToken,
}

impl CarouselActor {
    fn snapshot(&self) -> CarouselSnapshot {
        build_snapshot(&self.deck, &self.controller, &self.pause)
    }

    fn publish(&self) {
        // Nothing becomes visible once unmount has been requested
        if self.cancel.is_cancelled() {
            return;
        }
        let next = self.snapshot();
        self.snapshot_sender.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                debug!(
                    "Publishing snapshot: active={} display={} stage={:?} paused={}",
                    next.active_index, next.display_index, next.stage, next.paused
                );
                *current = next;
                true
            }
        });
    }

    fn wake_at(&self) -> Option<Instant> {
        match (self.controller.deadline(), self.scheduler.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn handle_command(&mut self, command: CarouselCommand, now: Instant) {
        match command {
            CarouselCommand::Navigate(request) => {
                let outcome = self.navigate(request, now);
                debug!("{:?} -> {:?}", request, outcome);
                // A committed move restarts the countdown to the next tick
                if outcome.is_accepted() && self.autoplay && !self.pause.is_paused() {
                    self.scheduler.start(now);
                }
            }
            CarouselCommand::Interaction(signal) => {
                if let Some(paused) = self.pause.apply(signal) {
                    if paused {
                        info!("Carousel paused");
                        self.scheduler.stop();
                    } else {
                        info!("Carousel resumed");
                        if self.autoplay {
                            self.scheduler.start(now);
                        }
                    }
                }
            }
        }
    }

    fn navigate(&mut self, request: NavigationRequest, now: Instant) -> RequestOutcome {
        match request {
            NavigationRequest::Next => self.controller.request_next(now),
            NavigationRequest::Previous => self.controller.request_previous(now),
            NavigationRequest::GoTo(index) => self.controller.request_go_to(index, now),
        }
    }

    fn on_deadline(&mut self, now: Instant) {
        self.controller.advance(now);
        if self.scheduler.poll(now) {
            let outcome = self.controller.request_next(now);
            debug!("Auto-advance tick -> {:?}", outcome);
        }
    }

    async fn run(mut self, mut commands: mpsc::Receiver<CarouselCommand>) {
        info!("Carousel mounted with {} cards", self.deck.len());
        self.publish();

        let cancel = self.cancel.clone();
        loop {
            let wake_at = self.wake_at();
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    info!("Carousel unmounted, dropping pending deadlines");
                    break;
                }

                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command, Instant::now()),
                    None => {
                        info!("Command channel closed, stopping carousel");
                        break;
                    }
                },

                _ = sleep_until_some(wake_at) => self.on_deadline(Instant::now()),
            }
            self.publish();
        }

        self.controller.cancel();
        self.scheduler.stop();
    }
}

async fn sleep_until_some(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

/// Handle to a mounted carousel.
///
/// Dropping the handle unmounts the carousel as well; [`CarouselHandle::unmount`]
/// additionally waits for the task to finish.
#[derive(Debug)]
pub struct CarouselHandle {
    command_sender: mpsc::Sender<CarouselCommand>,
    snapshot_receiver: watch::Receiver<CarouselSnapshot>,
    cancel: CancellationToken,
    task_handle: Option<JoinHandle<()>>,
}

impl CarouselHandle {
    /// Mounts a carousel over `deck`. Must be called inside a tokio runtime.
    pub fn spawn(deck: CardDeck, settings: Option<CarouselSettings>) -> Self {
        let settings = settings.unwrap_or_default();
        info!("Spawning carousel with settings: {:?}", settings);

        let controller =
            TransitionController::new(deck.len(), settings.timings, settings.lock_policy);
        let mut scheduler = AutoAdvance::new(settings.auto_advance);
        if settings.autoplay {
            scheduler.start(Instant::now());
        }

        let (command_sender, command_receiver) = mpsc::channel(COMMAND_BUFFER);
        let cancel = CancellationToken::new();

        let pause = PauseTracker::default();
        let (snapshot_sender, snapshot_receiver) =
            watch::channel(build_snapshot(&deck, &controller, &pause));

        let actor = CarouselActor {
            deck,
            controller,
            scheduler,
            pause,
            autoplay: settings.autoplay,
            snapshot_sender,
            cancel: cancel.clone(),
        };

        let task_handle = tokio::spawn(actor.run(command_receiver));
        debug!("Carousel task spawned: {:?}", task_handle);

        Self {
            command_sender,
            snapshot_receiver,
            cancel,
            task_handle: Some(task_handle),
        }
    }

    /// Sends a command, waiting for buffer space
    pub async fn send(&self, command: CarouselCommand) -> Result<(), CarouselError> {
        self.command_sender
            .send(command)
            .await
            .map_err(|_| CarouselError::Unmounted)
    }

    /// Sends a command without waiting; used from the UI thread
    pub fn try_send(&self, command: CarouselCommand) -> Result<(), CarouselError> {
        self.command_sender.try_send(command).map_err(|e| match e {
            mpsc::error::TrySendError::Closed(_) => CarouselError::Unmounted,
            mpsc::error::TrySendError::Full(command) => {
                CarouselError::ChannelError(format!("Command buffer full, dropped {:?}", command))
            }
        })
    }

    /// Receiver for committed snapshots
    pub fn subscribe(&self) -> watch::Receiver<CarouselSnapshot> {
        self.snapshot_receiver.clone()
    }

    /// Latest committed snapshot
    pub fn snapshot(&self) -> CarouselSnapshot {
        self.snapshot_receiver.borrow().clone()
    }

    pub fn is_mounted(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Cancels the carousel task and waits for it to finish
    pub async fn unmount(&mut self) -> Result<(), CarouselError> {
        debug!("Sending unmount signal to carousel");
        self.cancel.cancel();

        match self.task_handle.take() {
            Some(handle) => handle.await.map_err(|e| {
                error!("Carousel task panicked: {}", e);
                CarouselError::TaskError(format!("Carousel task panicked: {}", e))
            }),
            None => {
                warn!("Carousel already unmounted");
                Ok(())
            }
        }
    }
}

impl Drop for CarouselHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(stage: StageKind, direction: Direction) -> CarouselSnapshot {
        CarouselSnapshot {
            active_index: 1,
            display_index: 0,
            direction,
            stage,
            paused: false,
            card_count: 7,
            announcement: String::new(),
        }
    }

    #[test]
    fn animation_follows_stage() {
        assert_eq!(
            snapshot(StageKind::Exiting, Direction::Forward).animation(),
            SlideAnimation::SlideOut(Direction::Forward)
        );
        assert_eq!(
            snapshot(StageKind::Entering, Direction::Backward).animation(),
            SlideAnimation::Hidden(Direction::Backward)
        );
        assert_eq!(
            snapshot(StageKind::Idle, Direction::Backward).animation(),
            SlideAnimation::SlideIn(Direction::Backward)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn initial_snapshot_is_published_on_spawn() {
        let deck = CardDeck::builtin().unwrap();
        let handle = CarouselHandle::spawn(deck, None);
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.active_index, 0);
        assert_eq!(snapshot.card_count, 7);
        assert_eq!(snapshot.announcement, "Slide 1 of 7: Fact grain by HealthPulse");
        assert!(handle.is_mounted());
    }
}

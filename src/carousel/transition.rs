//! Transition controller with a statum typestate for the animation phases
//!
//! Owns the logical position of the carousel (`active`), the rendered card
//! (`display`), the slide direction and the transition lock. Time is passed
//! in explicitly so the controller can be driven by the carousel actor or by
//! a test without any timers of its own.
//!
//! # State Machine
//!
//! ```text
//!          request            exit due             settle due
//! Idle ───────────► Exiting ───────────► Entering ───────────► Idle
//!                  (active=target)   (display=active)      (lock released)
//! ```
//!
//! A transition carries a single deadline at a time; completing the exit phase
//! re-arms it for the settle phase, so cancelling a transition is one drop.

use serde::{Deserialize, Serialize};
use statum::{machine, state};
use tokio::time::{Duration, Instant};
use tracing::{debug, warn};

/// Slide direction, selects the enter/exit animation variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// How step requests (next/previous) interact with an in-flight transition.
///
/// Go-to requests are always dropped while a transition is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockPolicy {
    /// Step requests bypass the lock and supersede the in-flight transition
    #[default]
    Reference,
    /// Every request respects the lock
    Uniform,
}

/// Phase durations of a single transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTimings {
    /// Time from request until the visible card swaps
    pub exit: Duration,
    /// Time from the swap until the lock is released
    pub settle: Duration,
}

impl Default for TransitionTimings {
    fn default() -> Self {
        Self {
            exit: Duration::from_millis(250),
            settle: Duration::from_millis(50),
        }
    }
}

impl TransitionTimings {
    pub fn total(&self) -> Duration {
        self.exit + self.settle
    }
}

/// Observable stage of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Idle,
    Exiting,
    Entering,
}

/// Why a request did not start a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Target is already the active card
    AlreadyActive,
    /// A transition is in flight and the policy drops this request
    InFlight,
    /// Target index is outside the deck
    OutOfRange,
    /// Deck has a single card, nothing to navigate to
    SingleCard,
}

/// Result of a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// A transition started from Idle
    Started { target: usize, direction: Direction },
    /// A transition replaced the one in flight
    Superseded { target: usize, direction: Direction },
    Ignored(IgnoreReason),
}

impl RequestOutcome {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, RequestOutcome::Ignored(_))
    }
}

#[state]
#[derive(Debug, Clone)]
pub enum TransitionPhase {
    Exiting,
    Entering,
}

/// One in-flight transition; `due` is the deadline of its current phase
#[machine]
#[derive(Debug)]
pub struct Transition<S: TransitionPhase> {
    target: usize,
    direction: Direction,
    due: Instant,
}

impl<S: TransitionPhase> Transition<S> {
    pub fn target(&self) -> usize {
        self.target
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn due(&self) -> Instant {
        self.due
    }
}

impl Transition<Exiting> {
    fn begin(target: usize, direction: Direction, now: Instant, exit: Duration) -> Self {
        Self::new(target, direction, now + exit)
    }

    /// Points the transition at a new card without moving its deadline
    fn retarget(&mut self, target: usize, direction: Direction) {
        self.target = target;
        self.direction = direction;
    }

    // Settle deadline counts from the exit deadline, not from when it was observed
    fn finish_exit(self, settle: Duration) -> Transition<Entering> {
        let due = self.due + settle;
        let mut entering: Transition<Entering> = self.transition();
        entering.due = due;
        entering
    }
}

#[derive(Debug)]
enum Stage {
    Idle,
    Exiting(Transition<Exiting>),
    Entering(Transition<Entering>),
}

/// Single authority over carousel position.
///
/// The controller is the only place where `active`, `display` and the
/// transition lock change. It owns no timers: callers pass `now` into every
/// request and call [`TransitionController::advance`] once the deadline
/// reported by [`TransitionController::deadline`] has passed.
///
/// # Invariants
///
/// - `active` always names the card the carousel is heading to and is the
///   base for next/previous arithmetic, even mid-transition.
/// - `display` only changes when an exit phase completes, and then always
///   becomes the latest `active`.
/// - At most one phase deadline is pending at any time.
///
/// # Lock Policy
///
/// With [`LockPolicy::Reference`] a step request during the exit phase
/// retargets the running transition and keeps its deadline; during the
/// settle phase it starts a new exit. With [`LockPolicy::Uniform`] step
/// requests are dropped while in flight. Go-to requests are dropped while in
/// flight under both policies.
#[derive(Debug)]
pub struct TransitionController {
    len: usize,
    active: usize,
    display: usize,
    direction: Direction,
    stage: Stage,
    timings: TransitionTimings,
    policy: LockPolicy,
}

impl TransitionController {
    /// Creates an idle controller showing card 0 of a deck with `len` cards
    pub fn new(len: usize, timings: TransitionTimings, policy: LockPolicy) -> Self {
        if len == 0 {
            warn!("Transition controller created for an empty deck, treating it as one card");
        }
        Self {
            len: len.max(1),
            active: 0,
            display: 0,
            direction: Direction::Forward,
            stage: Stage::Idle,
            timings,
            policy,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn display_index(&self) -> usize {
        self.display
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn policy(&self) -> LockPolicy {
        self.policy
    }

    pub fn stage(&self) -> StageKind {
        match self.stage {
            Stage::Idle => StageKind::Idle,
            Stage::Exiting(_) => StageKind::Exiting,
            Stage::Entering(_) => StageKind::Entering,
        }
    }

    /// True while the transition lock is held
    pub fn is_in_flight(&self) -> bool {
        !matches!(self.stage, Stage::Idle)
    }

    /// Deadline of the pending phase, if any
    pub fn deadline(&self) -> Option<Instant> {
        match &self.stage {
            Stage::Idle => None,
            Stage::Exiting(t) => Some(t.due()),
            Stage::Entering(t) => Some(t.due()),
        }
    }

    /// Jumps directly to `target`. Dropped while a transition is in flight.
    pub fn request_go_to(&mut self, target: usize, now: Instant) -> RequestOutcome {
        if target >= self.len {
            warn!(
                "Ignoring go-to for index {} outside deck of {} cards",
                target, self.len
            );
            return RequestOutcome::Ignored(IgnoreReason::OutOfRange);
        }
        if target == self.active {
            debug!("Go-to {} is already active", target);
            return RequestOutcome::Ignored(IgnoreReason::AlreadyActive);
        }
        if self.is_in_flight() {
            debug!("Go-to {} dropped, transition in flight", target);
            return RequestOutcome::Ignored(IgnoreReason::InFlight);
        }

        // Plain index comparison, not shortest cyclic distance
        let direction = if target > self.active {
            Direction::Forward
        } else {
            Direction::Backward
        };
        self.begin(target, direction, now);
        RequestOutcome::Started { target, direction }
    }

    pub fn request_next(&mut self, now: Instant) -> RequestOutcome {
        self.step(Direction::Forward, now)
    }

    pub fn request_previous(&mut self, now: Instant) -> RequestOutcome {
        self.step(Direction::Backward, now)
    }

    fn step(&mut self, direction: Direction, now: Instant) -> RequestOutcome {
        if self.len == 1 {
            return RequestOutcome::Ignored(IgnoreReason::SingleCard);
        }

        // Always from the latest active index, never from the displayed one
        let target = match direction {
            Direction::Forward => (self.active + 1) % self.len,
            Direction::Backward => (self.active + self.len - 1) % self.len,
        };

        if !self.is_in_flight() {
            self.begin(target, direction, now);
            return RequestOutcome::Started { target, direction };
        }

        match self.policy {
            LockPolicy::Uniform => {
                debug!("Step to {} dropped, transition in flight", target);
                RequestOutcome::Ignored(IgnoreReason::InFlight)
            }
            LockPolicy::Reference => {
                debug!(
                    "Step to {} supersedes in-flight transition to {}",
                    target, self.active
                );
                self.supersede(target, direction, now);
                RequestOutcome::Superseded { target, direction }
            }
        }
    }

    fn begin(&mut self, target: usize, direction: Direction, now: Instant) {
        self.direction = direction;
        self.active = target;
        self.stage = Stage::Exiting(Transition::<Exiting>::begin(
            target,
            direction,
            now,
            self.timings.exit,
        ));
        debug!(
            "Transition to {} ({:?}) started, display still {}",
            target, direction, self.display
        );
    }

    // An exit already under way keeps its deadline so repeated steps cannot
    // hold the displayed card; during settle the swap has happened and a new
    // exit starts.
    fn supersede(&mut self, target: usize, direction: Direction, now: Instant) {
        match &mut self.stage {
            Stage::Exiting(transition) => {
                transition.retarget(target, direction);
                self.direction = direction;
                self.active = target;
            }
            Stage::Entering(_) | Stage::Idle => self.begin(target, direction, now),
        }
    }

    /// Completes every phase whose deadline is at or before `now`.
    ///
    /// Returns true if the committed state changed.
    pub fn advance(&mut self, now: Instant) -> bool {
        let mut changed = false;
        loop {
            match std::mem::replace(&mut self.stage, Stage::Idle) {
                Stage::Exiting(transition) if transition.due() <= now => {
                    self.stage = self.on_exit_complete(transition);
                    changed = true;
                }
                Stage::Entering(transition) if transition.due() <= now => {
                    self.on_entry_complete(transition);
                    changed = true;
                }
                pending => {
                    self.stage = pending;
                    return changed;
                }
            }
        }
    }

    fn on_exit_complete(&mut self, transition: Transition<Exiting>) -> Stage {
        debug_assert_eq!(transition.target(), self.active);
        self.display = self.active;
        debug!("Exit phase complete, displaying card {}", self.display);
        Stage::Entering(transition.finish_exit(self.timings.settle))
    }

    fn on_entry_complete(&mut self, transition: Transition<Entering>) {
        debug!(
            "Entry phase complete for card {}, lock released",
            transition.target()
        );
    }

    /// Drops the pending phase without committing it
    pub fn cancel(&mut self) {
        if self.is_in_flight() {
            debug!("Cancelling in-flight transition to {}", self.active);
        }
        self.stage = Stage::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXIT: Duration = Duration::from_millis(250);
    const SETTLE: Duration = Duration::from_millis(50);

    fn controller(len: usize) -> TransitionController {
        TransitionController::new(len, TransitionTimings::default(), LockPolicy::Reference)
    }

    fn observable(c: &TransitionController) -> (usize, usize, Direction, StageKind, Option<Instant>) {
        (
            c.active_index(),
            c.display_index(),
            c.direction(),
            c.stage(),
            c.deadline(),
        )
    }

    #[test]
    fn go_to_converges_for_every_index() {
        let t0 = Instant::now();
        for target in 1..7 {
            let mut c = controller(7);
            let outcome = c.request_go_to(target, t0);
            assert!(outcome.is_accepted());
            assert_eq!(c.active_index(), target);
            assert_eq!(c.display_index(), 0);

            c.advance(t0 + EXIT + SETTLE);
            assert_eq!(c.active_index(), target);
            assert_eq!(c.display_index(), target);
            assert_eq!(c.stage(), StageKind::Idle);
        }
    }

    #[test]
    fn go_to_active_index_is_a_no_op() {
        let t0 = Instant::now();
        let mut c = controller(7);
        let before = observable(&c);
        assert_eq!(
            c.request_go_to(0, t0),
            RequestOutcome::Ignored(IgnoreReason::AlreadyActive)
        );
        assert_eq!(observable(&c), before);

        // Also while in flight
        c.request_go_to(3, t0);
        let before = observable(&c);
        assert_eq!(
            c.request_go_to(3, t0 + Duration::from_millis(10)),
            RequestOutcome::Ignored(IgnoreReason::AlreadyActive)
        );
        assert_eq!(observable(&c), before);
    }

    #[test]
    fn go_to_is_dropped_while_in_flight() {
        let t0 = Instant::now();
        let mut c = controller(7);
        c.request_next(t0);
        assert_eq!(
            c.request_go_to(5, t0 + Duration::from_millis(100)),
            RequestOutcome::Ignored(IgnoreReason::InFlight)
        );
        assert_eq!(c.active_index(), 1);

        c.advance(t0 + EXIT + SETTLE);
        assert!(c.request_go_to(5, t0 + EXIT + SETTLE).is_accepted());
    }

    #[test]
    fn step_arithmetic_wraps_in_both_directions() {
        let mut now = Instant::now();
        let mut c = controller(7);

        c.request_previous(now);
        assert_eq!(c.active_index(), 6);
        now += EXIT + SETTLE;
        c.advance(now);

        c.request_next(now);
        assert_eq!(c.active_index(), 0);
        now += EXIT + SETTLE;
        c.advance(now);

        for _ in 0..7 {
            c.request_next(now);
            now += EXIT + SETTLE;
            c.advance(now);
        }
        assert_eq!(c.active_index(), 0);
        assert_eq!(c.display_index(), 0);
    }

    #[test]
    fn rapid_steps_accumulate_from_active_index() {
        let t0 = Instant::now();
        let mut c = controller(7);

        assert!(matches!(c.request_next(t0), RequestOutcome::Started { target: 1, .. }));
        assert!(matches!(c.request_next(t0), RequestOutcome::Superseded { target: 2, .. }));
        assert!(matches!(c.request_next(t0), RequestOutcome::Superseded { target: 3, .. }));
        assert_eq!(c.active_index(), 3);
        assert_eq!(c.display_index(), 0);

        c.advance(t0 + EXIT + SETTLE);
        assert_eq!(c.active_index(), 3);
        assert_eq!(c.display_index(), 3);
        assert!(!c.is_in_flight());
    }

    #[test]
    fn superseding_step_keeps_exit_deadline() {
        let t0 = Instant::now();
        let mut c = controller(7);
        c.request_next(t0);

        let t1 = t0 + Duration::from_millis(200);
        assert!(matches!(c.request_next(t1), RequestOutcome::Superseded { target: 2, .. }));
        assert_eq!(c.deadline(), Some(t0 + EXIT));

        c.advance(t0 + EXIT);
        assert_eq!(c.display_index(), 2);
        assert_eq!(c.stage(), StageKind::Entering);
    }

    #[test]
    fn steady_steps_keep_display_moving() {
        let t0 = Instant::now();
        let mut c = controller(7);
        let mut displayed = vec![c.display_index()];

        for i in 0..10u32 {
            let now = t0 + Duration::from_millis(200) * i;
            c.advance(now);
            c.request_next(now);
            displayed.push(c.display_index());
        }
        c.advance(t0 + Duration::from_millis(2000));
        displayed.push(c.display_index());

        assert_eq!(c.active_index(), 10 % 7);
        assert!(displayed.iter().filter(|&&d| d != 0).count() >= 4);
        assert_eq!(c.display_index(), c.active_index());
    }

    #[test]
    fn step_during_settle_restarts_exit_phase() {
        let t0 = Instant::now();
        let mut c = controller(7);
        c.request_next(t0);
        c.advance(t0 + EXIT);
        assert_eq!(c.stage(), StageKind::Entering);
        assert_eq!(c.display_index(), 1);

        let t1 = t0 + EXIT + Duration::from_millis(10);
        c.request_previous(t1);
        assert_eq!(c.stage(), StageKind::Exiting);
        assert_eq!(c.active_index(), 0);
        assert_eq!(c.direction(), Direction::Backward);
        assert_eq!(c.deadline(), Some(t1 + EXIT));

        c.advance(t1 + EXIT + SETTLE);
        assert_eq!(c.display_index(), 0);
    }

    #[test]
    fn uniform_policy_drops_steps_while_in_flight() {
        let t0 = Instant::now();
        let mut c = TransitionController::new(7, TransitionTimings::default(), LockPolicy::Uniform);
        c.request_next(t0);
        assert_eq!(
            c.request_next(t0),
            RequestOutcome::Ignored(IgnoreReason::InFlight)
        );
        assert_eq!(
            c.request_previous(t0),
            RequestOutcome::Ignored(IgnoreReason::InFlight)
        );
        assert_eq!(c.active_index(), 1);
    }

    #[test]
    fn direction_follows_plain_index_comparison() {
        let mut now = Instant::now();
        let mut c = controller(7);
        c.request_go_to(1, now);
        now += EXIT + SETTLE;
        c.advance(now);

        assert_eq!(
            c.request_go_to(4, now),
            RequestOutcome::Started {
                target: 4,
                direction: Direction::Forward
            }
        );
        now += EXIT + SETTLE;
        c.advance(now);

        // 4 -> 0 is one step forward cyclically, still reported as backward
        assert_eq!(
            c.request_go_to(0, now),
            RequestOutcome::Started {
                target: 0,
                direction: Direction::Backward
            }
        );
        assert_eq!(c.direction(), Direction::Backward);
    }

    #[test]
    fn display_swaps_exactly_at_exit_deadline() {
        let t0 = Instant::now();
        let mut c = controller(7);
        c.request_next(t0);

        assert!(!c.advance(t0 + EXIT - Duration::from_millis(1)));
        assert_eq!(c.display_index(), 0);
        assert_eq!(c.stage(), StageKind::Exiting);

        assert!(c.advance(t0 + EXIT));
        assert_eq!(c.display_index(), 1);
        assert_eq!(c.stage(), StageKind::Entering);
        assert_eq!(c.deadline(), Some(t0 + EXIT + SETTLE));

        assert!(!c.advance(t0 + EXIT + SETTLE - Duration::from_millis(1)));
        assert!(c.advance(t0 + EXIT + SETTLE));
        assert_eq!(c.stage(), StageKind::Idle);
        assert_eq!(c.deadline(), None);
    }

    #[test]
    fn late_advance_runs_both_phases() {
        let t0 = Instant::now();
        let mut c = controller(3);
        c.request_go_to(2, t0);
        assert!(c.advance(t0 + Duration::from_secs(5)));
        assert_eq!(c.display_index(), 2);
        assert_eq!(c.stage(), StageKind::Idle);
    }

    #[test]
    fn single_card_deck_never_moves() {
        let t0 = Instant::now();
        let mut c = controller(1);
        assert_eq!(
            c.request_next(t0),
            RequestOutcome::Ignored(IgnoreReason::SingleCard)
        );
        assert_eq!(
            c.request_previous(t0),
            RequestOutcome::Ignored(IgnoreReason::SingleCard)
        );
        assert_eq!(
            c.request_go_to(0, t0),
            RequestOutcome::Ignored(IgnoreReason::AlreadyActive)
        );
        assert!(!c.is_in_flight());
    }

    #[test]
    fn out_of_range_go_to_is_guarded() {
        let t0 = Instant::now();
        let mut c = controller(7);
        assert_eq!(
            c.request_go_to(7, t0),
            RequestOutcome::Ignored(IgnoreReason::OutOfRange)
        );
        assert_eq!(c.active_index(), 0);
        assert!(!c.is_in_flight());
    }

    #[test]
    fn cancel_drops_pending_phase() {
        let t0 = Instant::now();
        let mut c = controller(7);
        c.request_next(t0);
        c.cancel();
        assert!(!c.advance(t0 + Duration::from_secs(1)));
        assert_eq!(c.display_index(), 0);
        assert_eq!(c.deadline(), None);
    }
}

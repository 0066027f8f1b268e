mod clock;

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::Mutex;

use crate::action::Action;
use crate::state::{Continuous, Discrete, HeightMap};

pub use clock::{Clock, ManualClock, SystemClock};

struct Inner {
    pending: VecDeque<Action>,
    state: Discrete,
    target_state: Discrete,
    in_progress: bool,
    started_at: SystemTime,
    progress: f32,
}

impl Inner {
    /// Commits every expired action at the head of the queue, stopping at
    /// the first live one.
    fn drain_expired(&mut self, now: SystemTime) -> usize {
        let mut skipped = 0;
        while let Some(head) = self.pending.pop_front() {
            if !head.is_expired(now) {
                self.pending.push_front(head);
                break;
            }
            self.state = head.transfer(self.state);
            skipped += 1;
        }
        skipped
    }
}

/// Per-entity FIFO of timed actions.
///
/// `state` only changes when the head action finishes or expires, and
/// `target_state` is where the entity ends up once everything queued has
/// played out. The network side enqueues while the render loop calls
/// [`ActionQueue::update`], so everything goes through one lock.
pub struct ActionQueue {
    name: String,
    clock: Arc<dyn Clock>,
    heights: Arc<dyn HeightMap>,
    inner: Mutex<Inner>,
}

impl ActionQueue {
    pub fn new(name: impl Into<String>, clock: Arc<dyn Clock>, heights: Arc<dyn HeightMap>) -> Self {
        Self::with_state(name, clock, heights, Discrete::default())
    }

    pub fn with_state(
        name: impl Into<String>,
        clock: Arc<dyn Clock>,
        heights: Arc<dyn HeightMap>,
        state: Discrete,
    ) -> Self {
        let started_at = clock.now();
        Self {
            name: name.into(),
            clock,
            heights,
            inner: Mutex::new(Inner {
                pending: VecDeque::new(),
                state,
                target_state: state,
                in_progress: false,
                started_at,
                progress: 0.0,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Queues an action behind everything already pending. `None` is ignored
    /// so decoder output can be passed straight through.
    pub fn add_action(&self, action: impl Into<Option<Action>>) {
        let Some(action) = action.into() else {
            return;
        };
        let mut inner = self.inner.lock();
        inner.target_state = action.transfer(inner.target_state);
        log::debug!(
            "{} enqueued {:?} ({}s)",
            self.name,
            action.action_type(),
            action.duration_s(),
        );
        inner.pending.push_back(action);
    }

    /// True while the head action is animating. A freshly queued action does
    /// not count until the next [`update`](Self::update) starts it.
    pub fn is_busy(&self) -> bool {
        self.inner.lock().in_progress
    }

    pub fn pending_actions(&self) -> usize {
        self.inner.lock().pending.len()
    }

    pub fn state(&self) -> Discrete {
        self.inner.lock().state
    }

    pub fn target_state(&self) -> Discrete {
        self.inner.lock().target_state
    }

    pub fn progress(&self) -> f32 {
        self.inner.lock().progress
    }

    pub fn continuous_state(&self) -> Continuous {
        let inner = self.inner.lock();
        match inner.pending.front() {
            Some(head) if inner.in_progress => {
                head.interpolate(&inner.state, inner.progress, self.heights.as_ref())
            }
            _ => inner.state.continuous(self.heights.as_ref()),
        }
    }

    /// Drops every pending action, including the one in flight, and snaps
    /// the target back to the settled state.
    pub fn flush(&self) {
        let mut inner = self.inner.lock();
        if !inner.pending.is_empty() {
            log::debug!("{} flushed {} actions", self.name, inner.pending.len());
        }
        inner.pending.clear();
        inner.in_progress = false;
        inner.progress = 0.0;
        inner.target_state = inner.state;
    }

    /// Advances the scheduler one tick. Call once per frame.
    pub fn update(&self) {
        let now = self.clock.now();
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        if !inner.in_progress {
            // Heads that expired while waiting are committed without animating.
            let skipped = inner.drain_expired(now);
            if skipped > 0 {
                log::debug!("{} fast-forwarded {skipped} expired actions", self.name);
            }
            if let Some(head) = inner.pending.front() {
                log::debug!("{} started {:?}", self.name, head.action_type());
                inner.progress = 0.0;
                inner.started_at = now;
                inner.in_progress = true;
            }
            return;
        }

        let elapsed = now.duration_since(inner.started_at).unwrap_or_default();

        if inner.pending.front().is_some_and(|head| head.is_expired(now)) {
            let skipped = inner.drain_expired(now);
            log::debug!(
                "{} fast-forwarded {skipped} expired actions after {:.3}s",
                self.name,
                elapsed.as_secs_f32(),
            );
            inner.in_progress = false;
            inner.progress = 0.0;
            return;
        }

        let Some(duration_ms) = inner.pending.front().map(|head| head.duration_s() * 1000.0) else {
            inner.in_progress = false;
            return;
        };
        let elapsed_ms = elapsed.as_secs_f64() as f32 * 1000.0;
        inner.progress = (elapsed_ms / duration_ms).min(1.0);
        log::trace!("{} progress {:.3}", self.name, inner.progress);

        if elapsed_ms >= duration_ms {
            if let Some(head) = inner.pending.pop_front() {
                log::debug!("{} finished {:?}", self.name, head.action_type());
                inner.state = head.transfer(inner.state);
            }
            inner.in_progress = false;
        }
    }
}

impl std::fmt::Debug for ActionQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("ActionQueue")
            .field("name", &self.name)
            .field("pending", &inner.pending.len())
            .field("in_progress", &inner.in_progress)
            .field("progress", &inner.progress)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use super::*;
    use crate::hex::HecsCoord;
    use crate::state::FlatGround;

    fn queue() -> (ActionQueue, ManualClock) {
        let clock = ManualClock::new(UNIX_EPOCH + Duration::from_secs(1_000));
        let queue = ActionQueue::new("test", Arc::new(clock.clone()), Arc::new(FlatGround));
        (queue, clock)
    }

    fn far_future(clock: &ManualClock) -> SystemTime {
        clock.now() + Duration::from_secs(60)
    }

    #[test]
    fn none_is_ignored() {
        let (queue, _) = queue();
        queue.add_action(None::<Action>);
        assert_eq!(queue.pending_actions(), 0);
        assert_eq!(queue.target_state(), queue.state());
    }

    #[test]
    fn head_starts_on_first_update() {
        let (queue, clock) = queue();
        queue.add_action(Action::turn(60.0, 1.0, far_future(&clock)));
        assert!(!queue.is_busy());
        assert_eq!(queue.target_state().heading_degrees, 60.0);

        queue.update();
        assert!(queue.is_busy());
        assert_eq!(queue.progress(), 0.0);
        assert_eq!(queue.state().heading_degrees, 0.0);
    }

    #[test]
    fn progress_tracks_elapsed_time() {
        let (queue, clock) = queue();
        queue.add_action(Action::turn(60.0, 2.0, far_future(&clock)));
        queue.update();
        clock.advance(Duration::from_millis(500));
        queue.update();
        assert!((queue.progress() - 0.25).abs() < 1e-4);
        assert!((queue.continuous_state().heading_degrees - 15.0).abs() < 1e-3);
        assert!(queue.is_busy());
    }

    #[test]
    fn completes_exactly_at_duration() {
        let (queue, clock) = queue();
        queue.add_action(Action::walk(HecsCoord::ORIGIN.right(), 1.0, far_future(&clock)));
        queue.update();
        clock.advance(Duration::from_secs(1));
        queue.update();
        assert!(!queue.is_busy());
        assert_eq!(queue.state().coord, HecsCoord::ORIGIN.right());
        assert_eq!(queue.pending_actions(), 0);
    }

    #[test]
    fn clock_going_backwards_does_not_panic() {
        let (queue, clock) = queue();
        queue.add_action(Action::walk(HecsCoord::ORIGIN.right(), 1.0, far_future(&clock)));
        queue.update();
        clock.set(UNIX_EPOCH);
        queue.update();
        assert!(queue.is_busy());
        assert_eq!(queue.progress(), 0.0);
    }

    #[test]
    fn expired_heads_are_committed_before_starting() {
        let (queue, clock) = queue();
        let soon = clock.now() + Duration::from_millis(100);
        queue.add_action(Action::walk(HecsCoord::ORIGIN.right(), 5.0, soon));
        queue.add_action(Action::turn(60.0, 5.0, soon));
        queue.add_action(Action::turn(60.0, 1.0, far_future(&clock)));

        clock.advance(Duration::from_millis(200));
        queue.update();
        assert_eq!(queue.state().coord, HecsCoord::ORIGIN.right());
        assert_eq!(queue.state().heading_degrees, 60.0);
        assert_eq!(queue.pending_actions(), 1);
        // The live tail is armed in the same tick.
        assert!(queue.is_busy());
        assert_eq!(queue.progress(), 0.0);
    }

    #[test]
    fn idle_continuous_state_is_settled_state() {
        let (queue, _) = queue();
        let continuous = queue.continuous_state();
        assert_eq!(continuous, queue.state().continuous(&FlatGround));
    }
}

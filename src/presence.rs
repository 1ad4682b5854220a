use std::time::Instant;

use log::{debug, info};

use crate::clock::Clock;
use crate::relay::Relay;
use crate::session::{PresenceState, SessionRecord};

/// Owns the singleton presence state and the relay output. One call to
/// [`PresenceTracker::observe`] per scan cycle; at most one session closes
/// per cycle.
pub struct PresenceTracker {
    state: PresenceState,
    relay: Box<dyn Relay>,
    clock: Box<dyn Clock>,
    relay_level: bool,
}

impl PresenceTracker {
    pub fn new(mut relay: Box<dyn Relay>, clock: Box<dyn Clock>) -> Self {
        // Known starting level before the first scan cycle runs.
        relay.set(false);
        PresenceTracker {
            state: PresenceState::Absent,
            relay,
            clock,
            relay_level: false,
        }
    }

    pub fn state(&self) -> &PresenceState {
        &self.state
    }

    /// Advance one scan cycle. `user` is the cycle's winning known user, if
    /// any; unmatched advertisements never reach this point. Returns the
    /// completed record when a session ends this cycle.
    ///
    /// Re-detecting the user already present is a no-op: no relay write, no
    /// record, the session keeps its original start. A different known user
    /// closes the current session and opens a new one in the same cycle; the
    /// relay stays high across the switch.
    pub fn observe(&mut self, user: Option<&str>) -> Option<SessionRecord> {
        let now = self.clock.monotonic();

        match user {
            Some(seen) => {
                if self.current_user() == Some(seen) {
                    debug!("{seen} still present");
                    return None;
                }
                let closed = self.close(now);
                self.open(seen, now);
                closed
            }
            None => {
                let closed = self.close(now);
                self.set_relay(false);
                closed
            }
        }
    }

    fn current_user(&self) -> Option<&str> {
        match &self.state {
            PresenceState::Present { user, .. } => Some(user),
            PresenceState::Absent => None,
        }
    }

    fn open(&mut self, user: &str, now: Instant) {
        let started = self.clock.wall_stamp().unwrap_or_default();
        info!("{user} present, session started");
        self.state = PresenceState::Present {
            user: user.to_string(),
            since: now,
            started,
        };
        self.set_relay(true);
    }

    /// Take the active session, if any, and turn it into a record. Leaves the
    /// state `Absent`; the relay is the caller's business.
    fn close(&mut self, now: Instant) -> Option<SessionRecord> {
        match std::mem::replace(&mut self.state, PresenceState::Absent) {
            PresenceState::Absent => None,
            PresenceState::Present {
                user,
                since,
                started,
            } => {
                let end = self.clock.wall_stamp().unwrap_or_default();
                let duration_seconds = now.duration_since(since).as_secs();
                info!("{user} gone, session ended after {duration_seconds}s");
                Some(SessionRecord {
                    user,
                    start: started,
                    end,
                    duration_seconds,
                })
            }
        }
    }

    fn set_relay(&mut self, on: bool) {
        if self.relay_level == on {
            return;
        }
        self.relay.set(on);
        self.relay_level = on;
    }
}

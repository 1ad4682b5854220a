use std::time::Instant;

#[derive(Clone, Debug, PartialEq)]
pub enum PresenceState {
    Absent,
    Present {
        user: String,
        since: Instant,
        /// Wall-clock stamp at session start; empty if the clock was not
        /// synchronized at the time.
        started: String,
    },
}

/// A completed session, ready for dispatch to the report sink.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionRecord {
    pub user: String,
    pub start: String,
    pub end: String,
    pub duration_seconds: u64,
}

//! Stage-2 scheduling atom (spec.md §3 "Session").

/// A single scheduling atom: one course-batch, one group, one start hour,
/// one venue, one trainer, contiguous within a day. Identity is
/// `(course_batch_identity, session_index)`; the one-session-per-batch
/// mode (spec.md §9) fixes `session_index` at 0 unless session splitting
/// (SPEC_FULL.md §3) produces more than one.
#[derive(Debug, Clone)]
pub struct Session {
    /// Identity of the course-batch this session realizes.
    pub course_batch_identity: String,
    /// Index among sibling sessions of the same course-batch (0 unless
    /// split).
    pub session_index: u32,
    /// Owning group id.
    pub group_id: String,
    /// Absolute start hour within the horizon.
    pub start_hour: u32,
    /// Absolute end hour within the horizon (`start_hour + duration`).
    pub end_hour: u32,
    /// Calendar day index the session falls on.
    pub day: u32,
    /// Assigned venue name.
    pub venue: String,
    /// Assigned trainer id.
    pub trainer: String,
    /// Whether this session is active, i.e. at least one group assigns to
    /// it (spec.md §4.5 state machine).
    pub active: bool,
}

impl Session {
    /// Duration in hours.
    pub fn duration(&self) -> u32 {
        self.end_hour - self.start_hour
    }

    /// The `(course_batch_identity, start_hour, venue)` signature used to
    /// decide whether two sessions may legally overlap because they are a
    /// shared session (spec.md §4.4).
    pub fn signature(&self) -> (String, u32, String) {
        (self.course_batch_identity.clone(), self.start_hour, self.venue.clone())
    }
}

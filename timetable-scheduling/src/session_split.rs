//! Splits an over-long course-batch duration into same-day sub-sessions,
//! per SPEC_FULL.md §3 ("Session splitting by max session length"), a
//! feature the distillation dropped but `solver_rollback.py`'s `sessions`
//! loop has. Off by default (§9's chosen single mode is one session per
//! `(group, course-batch)`); enabling `SchedulingConfig::split_long_sessions`
//! produces multiple sessions sharing a `session_index`.

/// Lengths of the consecutive same-day sub-sessions `duration` hours of a
/// course-batch is split into. Mirrors `solver_rollback.py`'s `max_session`
/// selection: when shift-awareness is on, no sub-session may exceed half a
/// working day (so it always fits within one shift window); otherwise the
/// cap is `max_session_length`. Returns a single-element vector (no split)
/// when splitting is disabled or `duration` already fits under the cap.
pub fn session_lengths(duration: u32, hours_per_day: u32, max_session_length: u32, is_considering_shift: bool, split_long_sessions: bool) -> Vec<u32> {
    if !split_long_sessions {
        return vec![duration];
    }

    let cap = if is_considering_shift { (hours_per_day / 2).max(1) } else { max_session_length.max(1) };
    if duration <= cap {
        return vec![duration];
    }

    let mut lengths = Vec::new();
    let mut remaining = duration;
    while remaining > 0 {
        let chunk = remaining.min(cap);
        lengths.push(chunk);
        remaining -= chunk;
    }
    lengths
}

#[cfg(test)]
#[path = "../tests/unit/session_split_test.rs"]
mod session_split_test;

use super::*;

#[test]
fn leaves_duration_whole_when_splitting_is_disabled() {
    assert_eq!(session_lengths(10, 8, 4, false, false), vec![10]);
}

#[test]
fn leaves_duration_whole_when_it_already_fits_the_cap() {
    assert_eq!(session_lengths(4, 8, 4, false, true), vec![4]);
}

#[test]
fn splits_on_max_session_length_when_not_considering_shift() {
    assert_eq!(session_lengths(10, 8, 4, false, true), vec![4, 4, 2]);
}

#[test]
fn splits_on_half_a_working_day_when_considering_shift() {
    assert_eq!(session_lengths(10, 8, 6, true, true), vec![4, 4, 2]);
}

use super::*;

#[test]
fn maps_week_codes_to_canonical_shifts() {
    assert_eq!(Shift::from_week_code(0), Some(Shift::NonShift));
    assert_eq!(Shift::from_week_code(1), Some(Shift::S1));
    assert_eq!(Shift::from_week_code(2), Some(Shift::S2));
    assert_eq!(Shift::from_week_code(3), Some(Shift::Unavailable));
    assert_eq!(Shift::from_week_code(4), None);
}

#[test]
fn round_trips_through_week_codes() {
    for shift in [Shift::NonShift, Shift::S1, Shift::S2, Shift::Unavailable] {
        assert_eq!(Shift::from_week_code(shift.to_week_code()), Some(shift));
    }
}

#[test]
fn maps_free_form_labels_to_canonical_shifts() {
    assert_eq!(Shift::from_label("Shift 1"), Shift::S1);
    assert_eq!(Shift::from_label("shift 2"), Shift::S2);
    assert_eq!(Shift::from_label("Non Shift"), Shift::NonShift);
    assert_eq!(Shift::from_label("anything else"), Shift::NonShift);
}

#[test]
fn s1_is_the_second_half_of_the_day() {
    assert_eq!(Shift::S1.window(8), (4, 8));
}

#[test]
fn s2_is_the_first_half_of_the_day() {
    assert_eq!(Shift::S2.window(8), (0, 4));
}

#[test]
fn non_shift_spans_the_whole_day() {
    assert_eq!(Shift::NonShift.window(8), (0, 8));
}

#[test]
fn trainee_falls_back_to_standing_shift_for_unset_weeks() {
    let trainee = Trainee {
        company: "acme".into(),
        id: "e1".into(),
        shift: Shift::S1,
        cycle: Cycle::WDays,
        courses: vec![],
        weekly_shift: [None, Some(Shift::S2), None, None],
    };

    assert_eq!(trainee.shift_for_week(1), Shift::S1);
    assert_eq!(trainee.shift_for_week(2), Shift::S2);
    assert_eq!(trainee.shift_for_week(3), Shift::S1);
}

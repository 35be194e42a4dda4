use super::*;

#[test]
fn ten_pages_start() {
    assert_eq!(page_window(10, 1), [1, 2, 3, 4, 5]);
    assert_eq!(page_window(10, 3), [1, 2, 3, 4, 5]);
}

#[test]
fn ten_pages_middle() {
    assert_eq!(page_window(10, 5), [3, 4, 5, 6, 7]);
    assert_eq!(page_window(10, 4), [2, 3, 4, 5, 6]);
    assert_eq!(page_window(10, 7), [5, 6, 7, 8, 9]);
}

#[test]
fn ten_pages_end() {
    assert_eq!(page_window(10, 10), [6, 7, 8, 9, 10]);
    assert_eq!(page_window(10, 8), [6, 7, 8, 9, 10]);
}

#[test]
fn small_totals_show_everything() {
    for current in 1..=3 {
        assert_eq!(page_window(3, current), [1, 2, 3]);
    }
    assert_eq!(page_window(5, 4), [1, 2, 3, 4, 5]);
}

#[test]
fn no_pages_no_buttons() {
    assert!(page_window(0, 1).is_empty());
}

#[test]
fn six_pages_tie_break() {
    // current == 3 hits the "start" branch before the "end" branch.
    assert_eq!(page_window(6, 3), [1, 2, 3, 4, 5]);
    assert_eq!(page_window(6, 4), [2, 3, 4, 5, 6]);
}

#[test]
fn step_controls() {
    assert_eq!(can_step(3, 1), (false, true));
    assert_eq!(can_step(3, 2), (true, true));
    assert_eq!(can_step(3, 3), (true, false));
    assert_eq!(can_step(0, 1), (false, false));
}

#[test]
fn huge_server_totals_do_not_overflow() {
    let max = u32::MAX;
    assert_eq!(page_window(max, max), [max - 4, max - 3, max - 2, max - 1, max]);
    assert_eq!(page_window(max, max - 10), [max - 12, max - 11, max - 10, max - 9, max - 8]);
}

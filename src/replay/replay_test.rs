use super::*;

#[test]
fn test_in_order_sequence_accepted() {
    let mut window = ReplayWindow::new();
    window.accept(0);
    for _ in 0..100 {
        assert_eq!(window.check(1), Ok(()));
        window.accept(1);
    }
}

#[test]
fn test_duplicate_detected() {
    let mut window = ReplayWindow::new();
    window.accept(0);
    for _ in 0..5 {
        window.accept(1);
    }
    assert_eq!(window.check(0), Err(Error::ReplayDup));
    assert_eq!(window.check(-3), Err(Error::ReplayDup));
}

#[test]
fn test_late_packet_within_window_accepted_once() {
    let mut window = ReplayWindow::new();
    window.accept(0);
    window.accept(2); // leaves a hole one behind
    assert_eq!(window.check(-1), Ok(()));
    window.accept(-1);
    assert_eq!(window.check(-1), Err(Error::ReplayDup));
}

#[test]
fn test_window_edge() {
    let mut window = ReplayWindow::new();
    window.accept(0);
    window.accept(REPLAY_WINDOW_SIZE);

    // Exactly window-deep is still tracked; one further is too old.
    assert_eq!(window.check(-REPLAY_WINDOW_SIZE), Err(Error::ReplayDup));
    assert_eq!(window.check(-(REPLAY_WINDOW_SIZE + 1)), Err(Error::ReplayOld));
}

#[test]
fn test_large_jump_clears_history() {
    let mut window = ReplayWindow::new();
    window.accept(0);
    window.accept(1000);
    assert_eq!(window.check(0), Err(Error::ReplayDup));
    assert_eq!(window.check(-1), Ok(()));
    assert_eq!(window.check(-REPLAY_WINDOW_SIZE), Ok(()));
}

use crate::{Countdown, CountdownTick};

use std::time::Duration;

/// WHAT: Expiry fires exactly once, then the countdown stays spent
/// WHY: Double-firing would run the timeout policy twice on one question
#[test]
fn given_armed_countdown_when_ticked_past_zero_then_expired_fires_once() {
    // Given: A running 3-second countdown
    let mut countdown = Countdown::new(Duration::from_secs(3));
    countdown.start();

    // When: Ticking down to zero and beyond
    assert_eq!(countdown.tick(), CountdownTick::Running { remaining_secs: 2 });
    assert_eq!(countdown.tick(), CountdownTick::Running { remaining_secs: 1 });
    let at_zero = countdown.tick();
    let past_zero = countdown.tick();

    // Then: Expired exactly once, Idle afterwards
    assert_eq!(at_zero, CountdownTick::Expired);
    assert_eq!(past_zero, CountdownTick::Idle);
    assert!(countdown.has_expired());
}

/// WHAT: A stopped countdown does not advance
/// WHY: A manual recording stop freezes the question clock
#[test]
fn given_stopped_countdown_when_ticked_then_remaining_unchanged() {
    // Given: A countdown stopped after two ticks
    let mut countdown = Countdown::new(Duration::from_secs(5));
    countdown.start();
    let _ = countdown.tick();
    let _ = countdown.tick();
    countdown.stop();

    // When: Ticking while stopped
    let tick = countdown.tick();

    // Then: No progress is made
    assert_eq!(tick, CountdownTick::Idle);
    assert_eq!(countdown.remaining_secs(), 3);
}

/// WHAT: Reset rearms a spent countdown
/// WHY: The question clock restarts with each question transition
#[test]
fn given_spent_countdown_when_reset_then_it_can_expire_again() {
    // Given: A countdown that already expired
    let mut countdown = Countdown::new(Duration::from_secs(1));
    countdown.start();
    assert_eq!(countdown.tick(), CountdownTick::Expired);

    // When: Rearming with a fresh limit
    countdown.reset(Duration::from_secs(2));
    countdown.start();

    // Then: It runs and expires exactly once more
    assert_eq!(countdown.tick(), CountdownTick::Running { remaining_secs: 1 });
    assert_eq!(countdown.tick(), CountdownTick::Expired);
    assert_eq!(countdown.tick(), CountdownTick::Idle);
}

/// WHAT: Final stretch holds only in (0, 30] seconds remaining
/// WHY: The overtime warning is presentation-only and must not fire early
#[test]
fn given_countdown_when_crossing_thirty_seconds_then_final_stretch_flips() {
    // Given: A countdown one second above the warning threshold
    let mut countdown = Countdown::new(Duration::from_secs(31));
    countdown.start();
    assert!(!countdown.in_final_stretch());

    // When: Ticking into the threshold
    let _ = countdown.tick();

    // Then: Final stretch is on at 30s, off once spent
    assert_eq!(countdown.remaining_secs(), 30);
    assert!(countdown.in_final_stretch());

    for _ in 0..30 {
        let _ = countdown.tick();
    }
    assert_eq!(countdown.remaining_secs(), 0);
    assert!(!countdown.in_final_stretch());
}

/// WHAT: A zero-length countdown expires on its first tick
/// WHY: A malformed question limit must not disable the timeout policy
#[test]
fn given_zero_limit_when_started_then_first_tick_expires() {
    // Given: A countdown armed with zero seconds
    let mut countdown = Countdown::new(Duration::ZERO);
    countdown.start();

    // When/Then: The first tick fires the expiry
    assert_eq!(countdown.tick(), CountdownTick::Expired);
}

/// WHAT: A countdown never started stays idle
/// WHY: The exam clock must not move before start()
#[test]
fn given_unstarted_countdown_when_ticked_then_idle() {
    let mut countdown = Countdown::new(Duration::from_secs(10));

    assert_eq!(countdown.tick(), CountdownTick::Idle);
    assert_eq!(countdown.remaining_secs(), 10);
}

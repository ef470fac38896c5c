// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;

#[test]
fn system_clock_is_monotonic_enough() {
    let clock = SystemClock;
    let t1 = clock.now();
    std::thread::sleep(Duration::from_millis(2));
    let t2 = clock.now();
    assert!(t2 >= t1);
}

#[test]
fn fake_clock_starts_at_fixed_instant() {
    let clock = FakeClock::new();
    assert_eq!(clock.now().to_rfc3339(), "2026-01-15T09:30:00+00:00");
}

#[test]
fn fake_clock_can_be_advanced() {
    let clock = FakeClock::new();
    let t1 = clock.now();
    clock.advance(Duration::from_secs(60));
    assert_eq!((clock.now() - t1).num_seconds(), 60);
}

#[test]
fn fake_clock_is_cloneable_and_shared() {
    let clock1 = FakeClock::new();
    let clock2 = clock1.clone();
    let t1 = clock1.now();
    clock2.advance(Duration::from_secs(30));
    assert_eq!((clock1.now() - t1).num_seconds(), 30);
}

#[test]
fn fake_clock_set() {
    let clock = FakeClock::default();
    let later = clock.now() + chrono::Duration::hours(1);
    clock.set(later);
    assert_eq!(clock.now(), later);
}

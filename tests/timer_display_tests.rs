//! Tests for the textual description of a timer

use std::time::Duration;
use ticktimer::{TimeUnit, Timer};

#[test]
fn test_display_default_unit() {
    let timer = Timer::new(|| {}, Duration::from_millis(500));
    let text = timer.to_string();

    assert!(text.starts_with("Timer\n"));
    assert!(text.contains("interval:    500ms"));
    assert!(text.contains("delay:       0ms"));
    assert!(text.ends_with("single shot: false"));
}

#[test]
fn test_display_named_timer_in_seconds() {
    let timer = Timer::builder(|| {})
        .name("backup")
        .unit(TimeUnit::Seconds)
        .interval(Duration::from_millis(1500))
        .delay(Duration::from_secs(10))
        .single_shot(true)
        .build();

    let text = timer.to_string();
    assert!(text.starts_with("Timer \"backup\""));
    assert!(text.contains("interval:    1.500s"));
    assert!(text.contains("delay:       10s"));
    assert!(text.contains("single shot: true"));
}

#[test]
fn test_display_every_unit_suffix() {
    let cases = [
        (TimeUnit::Nanoseconds, Duration::from_nanos(7), "7ns"),
        (TimeUnit::Microseconds, Duration::from_micros(7), "7us"),
        (TimeUnit::Milliseconds, Duration::from_millis(7), "7ms"),
        (TimeUnit::Seconds, Duration::from_secs(7), "7s"),
        (TimeUnit::Minutes, Duration::from_secs(7 * 60), "7min"),
        (TimeUnit::Hours, Duration::from_secs(7 * 3600), "7h"),
        (TimeUnit::Custom { nanos: 100 }, Duration::from_nanos(700), "7?"),
    ];

    for (unit, interval, expected) in cases {
        let timer = Timer::builder(|| {}).unit(unit).interval(interval).build();
        assert!(
            timer.to_string().contains(&format!("interval:    {expected}")),
            "{unit:?}: {timer}"
        );
        assert_eq!(timer.interval_count(), 7);
    }
}

#[test]
fn test_display_reflects_runtime_changes() {
    let timer = Timer::new(|| {}, Duration::from_millis(100));
    timer
        .set_interval(Duration::from_millis(250))
        .set_delay(Duration::from_millis(40))
        .set_single_shot(true);

    let text = timer.to_string();
    assert!(text.contains("interval:    250ms"));
    assert!(text.contains("delay:       40ms"));
    assert!(text.contains("single shot: true"));
}

#[test]
fn test_debug_includes_state() {
    let timer = Timer::builder(|| {})
        .name("dbg")
        .interval(Duration::from_millis(10))
        .build();
    let debug = format!("{:?}", timer);
    assert!(debug.contains("Timer"));
    assert!(debug.contains("dbg"));
    assert!(debug.contains("running: false"));
}

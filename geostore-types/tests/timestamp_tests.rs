use geostore_types::Timestamp;
use proptest::prelude::*;

// ── Construction ─────────────────────────────────────────────────

#[test]
fn now_is_after_epoch() {
    let ts = Timestamp::now();
    assert!(ts.as_millis() > 0);
}

#[test]
fn from_millis_roundtrip() {
    let ts = Timestamp::from_millis(1_700_000_000_123).unwrap();
    assert_eq!(ts.as_millis(), 1_700_000_000_123);
}

#[test]
fn from_millis_out_of_range() {
    let err = Timestamp::from_millis(i64::MAX).unwrap_err();
    assert!(format!("{err}").contains("invalid timestamp"));
}

#[test]
fn default_is_now() {
    let before = Timestamp::now();
    let ts = Timestamp::default();
    assert!(ts >= before);
}

// ── Formatting ───────────────────────────────────────────────────

#[test]
fn rfc3339_has_millis_and_z() {
    let ts = Timestamp::from_millis(0).unwrap();
    assert_eq!(ts.to_rfc3339(), "1970-01-01T00:00:00.000Z");
    assert_eq!(ts.to_string(), "1970-01-01T00:00:00.000Z");
}

#[test]
fn parse_rfc3339_roundtrip() {
    let ts = Timestamp::from_millis(1_715_000_000_456).unwrap();
    let parsed = Timestamp::parse_rfc3339(&ts.to_rfc3339()).unwrap();
    assert_eq!(parsed, ts);
}

#[test]
fn parse_rfc3339_with_offset() {
    let ts = Timestamp::parse_rfc3339("2024-05-01T14:00:00.000+02:00").unwrap();
    assert_eq!(ts.to_rfc3339(), "2024-05-01T12:00:00.000Z");
}

#[test]
fn parse_rfc3339_invalid() {
    assert!(Timestamp::parse_rfc3339("yesterday").is_err());
}

#[test]
fn serde_uses_rfc3339_string() {
    let ts = Timestamp::from_millis(0).unwrap();
    let json = serde_json::to_string(&ts).unwrap();
    assert!(json.starts_with("\"1970-01-01T00:00:00"));
    let parsed: Timestamp = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, ts);
}

// ── tick ─────────────────────────────────────────────────────────

#[test]
fn tick_from_past_uses_wall_clock() {
    let old = Timestamp::from_millis(1_000).unwrap();
    let next = old.tick();
    assert!(next > old);
    assert!(next.as_millis() > 1_000_000);
}

#[test]
fn tick_from_future_adds_one_milli() {
    let future = Timestamp::from_millis(Timestamp::now().as_millis() + 60_000).unwrap();
    let next = future.tick();
    assert_eq!(next.as_millis(), future.as_millis() + 1);
}

#[test]
fn repeated_ticks_are_strictly_increasing() {
    let mut ts = Timestamp::now();
    for _ in 0..1000 {
        let next = ts.tick();
        assert!(next > ts);
        ts = next;
    }
}

proptest! {
    #[test]
    fn tick_is_always_later(millis in 0i64..4_000_000_000_000) {
        let ts = Timestamp::from_millis(millis).unwrap();
        prop_assert!(ts.tick() > ts);
    }
}

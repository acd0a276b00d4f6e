//! Freshness Timer
//!
//! Helpers for the companion `timer:<key>` entry that records the instant a
//! cached value stays fresh until.

/// Prefix of the companion timer key
pub const TIMER_PREFIX: &str = "timer:";

/// Derives the timer key for `key`.
pub fn timer_key(key: &str) -> String {
    format!("{TIMER_PREFIX}{key}")
}

/// Encodes a unix timestamp as decimal ASCII.
pub fn encode_timer(valid_until: i64) -> Vec<u8> {
    valid_until.to_string().into_bytes()
}

/// Decodes a stored timer; absent or unparseable timers read as 0 (stale).
pub fn decode_timer(bytes: Option<&[u8]>) -> i64 {
    bytes
        .and_then(|raw| std::str::from_utf8(raw).ok())
        .and_then(|text| text.trim().parse().ok())
        .unwrap_or(0)
}

/// `now + secs`, saturating instead of overflowing.
pub fn offset_from(now: i64, secs: u64) -> i64 {
    now.saturating_add(i64::try_from(secs).unwrap_or(i64::MAX))
}

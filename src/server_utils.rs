use std::time::{SystemTime, UNIX_EPOCH};

use crate::constants::{MAX_DIMENSION, MIN_DIMENSION, NAME_MAX_LEN, TIME_STEP};

pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Quantizes a wall-clock timestamp into the tick counter used by movement
/// arbitration: `floor(seconds * TIME_STEP)`.
pub fn current_tick(now_ms: u64) -> u64 {
    ((now_ms as f64 / 1000.0) * TIME_STEP).floor() as u64
}

pub fn sanitize_name(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return "Player".to_string();
    }
    trimmed.chars().take(NAME_MAX_LEN).collect()
}

/// Parses a maze dimension from the environment, clamped to the supported
/// range and forced odd so the carving lattice lines up with the boundary
/// walls.
pub fn parse_dimension(raw: Option<&str>, default: i32) -> i32 {
    let value = raw
        .and_then(|text| text.trim().parse::<i32>().ok())
        .unwrap_or(default)
        .clamp(MIN_DIMENSION, MAX_DIMENSION);
    value | 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_tick_quantizes_at_time_step_boundaries() {
        // TIME_STEP = 4 ticks per second: 250 ms per tick.
        assert_eq!(current_tick(0), 0);
        assert_eq!(current_tick(249), 0);
        assert_eq!(current_tick(250), 1);
        assert_eq!(current_tick(1_000), 4);
        assert_eq!(current_tick(1_249), 4);
    }

    #[test]
    fn current_tick_is_monotonic() {
        let mut previous = 0;
        for ms in (0..10_000).step_by(37) {
            let tick = current_tick(ms);
            assert!(tick >= previous);
            previous = tick;
        }
    }

    #[test]
    fn sanitize_name_applies_trim_empty_and_max_len() {
        assert_eq!(sanitize_name(""), "Player");
        assert_eq!(sanitize_name("   "), "Player");
        assert_eq!(sanitize_name(" Alice "), "Alice");
        assert_eq!(sanitize_name("12345678901234567890"), "1234567890123456");
    }

    #[test]
    fn parse_dimension_clamps_and_forces_odd() {
        assert_eq!(parse_dimension(None, 15), 15);
        assert_eq!(parse_dimension(Some("20"), 15), 21);
        assert_eq!(parse_dimension(Some("2"), 15), 5);
        assert_eq!(parse_dimension(Some("9999"), 15), 101);
        assert_eq!(parse_dimension(Some("abc"), 15), 15);
    }
}

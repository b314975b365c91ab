use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ON_SHORT_MS: u64 = 200;
pub const DEFAULT_ON_LONG_MS: u64 = 400;
pub const DEFAULT_OFF_SHORT_MS: u64 = 200;
pub const DEFAULT_OFF_MEDIUM_MS: u64 = 500;
pub const DEFAULT_OFF_LONG_MS: u64 = 1500;

/// Longest accepted duration: one hour.
pub const MAX_DURATION_MS: u64 = 3_600_000;

/// Pulse and gap durations in milliseconds. Every field is within
/// `1..=MAX_DURATION_MS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    pub on_short: u64,
    pub on_long: u64,
    pub off_short: u64,
    pub off_medium: u64,
    pub off_long: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            on_short: DEFAULT_ON_SHORT_MS,
            on_long: DEFAULT_ON_LONG_MS,
            off_short: DEFAULT_OFF_SHORT_MS,
            off_medium: DEFAULT_OFF_MEDIUM_MS,
            off_long: DEFAULT_OFF_LONG_MS,
        }
    }
}

impl TimingConfig {
    /// Clamps every field into `1..=MAX_DURATION_MS`.
    pub fn sanitized(self) -> Self {
        TimingConfig {
            on_short: clamp_ms(self.on_short),
            on_long: clamp_ms(self.on_long),
            off_short: clamp_ms(self.off_short),
            off_medium: clamp_ms(self.off_medium),
            off_long: clamp_ms(self.off_long),
        }
    }

    pub fn pulse_width_label(&self) -> String {
        format!("{} / {} ms", self.on_short, self.on_long)
    }

    pub fn loop_pause(&self) -> Duration {
        Duration::from_millis(self.off_long)
    }
}

/// The five duration fields exactly as the user typed them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingInputs {
    pub on_short: String,
    pub on_long: String,
    pub off_short: String,
    pub off_medium: String,
    pub off_long: String,
}

impl Default for TimingInputs {
    fn default() -> Self {
        TimingInputs::from(TimingConfig::default())
    }
}

impl From<TimingConfig> for TimingInputs {
    fn from(timing: TimingConfig) -> Self {
        TimingInputs {
            on_short: timing.on_short.to_string(),
            on_long: timing.on_long.to_string(),
            off_short: timing.off_short.to_string(),
            off_medium: timing.off_medium.to_string(),
            off_long: timing.off_long.to_string(),
        }
    }
}

impl TimingInputs {
    pub fn resolve(&self) -> TimingConfig {
        TimingConfig {
            on_short: parse_duration_field(&self.on_short, DEFAULT_ON_SHORT_MS),
            on_long: parse_duration_field(&self.on_long, DEFAULT_ON_LONG_MS),
            off_short: parse_duration_field(&self.off_short, DEFAULT_OFF_SHORT_MS),
            off_medium: parse_duration_field(&self.off_medium, DEFAULT_OFF_MEDIUM_MS),
            off_long: parse_duration_field(&self.off_long, DEFAULT_OFF_LONG_MS),
        }
    }
}

fn clamp_ms(ms: u64) -> u64 {
    ms.clamp(1, MAX_DURATION_MS)
}

/// Reads a millisecond value the way a form field would be read.
///
/// Leading whitespace and an optional sign are accepted, then the leading run
/// of digits is taken (`"250ms"` reads as 250). Text without a leading
/// integer falls back to `default`. Results are clamped into
/// `1..=MAX_DURATION_MS`, so oversized numbers read as the ceiling.
pub fn parse_duration_field(raw: &str, default: u64) -> u64 {
    let t = raw.trim();
    let (negative, rest) = match t.as_bytes().first() {
        Some(b'-') => (true, &t[1..]),
        Some(b'+') => (false, &t[1..]),
        _ => (false, t),
    };
    let digits_len = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits_len == 0 {
        return clamp_ms(default);
    }
    if negative {
        return 1;
    }
    // all digits, so the only parse failure is overflow
    rest[..digits_len]
        .parse::<u64>()
        .map_or(MAX_DURATION_MS, clamp_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let t = TimingConfig::default();
        assert_eq!(t.on_short, 200);
        assert_eq!(t.on_long, 400);
        assert_eq!(t.off_short, 200);
        assert_eq!(t.off_medium, 500);
        assert_eq!(t.off_long, 1500);
        assert_eq!(t.pulse_width_label(), "200 / 400 ms");
    }

    #[test]
    fn missing_or_garbage_fields_fall_back_to_defaults() {
        assert_eq!(parse_duration_field("", 200), 200);
        assert_eq!(parse_duration_field("   ", 500), 500);
        assert_eq!(parse_duration_field("abc", 1500), 1500);
        assert_eq!(parse_duration_field("-", 400), 400);
    }

    #[test]
    fn numeric_fields_are_clamped_to_one() {
        assert_eq!(parse_duration_field("0", 200), 1);
        assert_eq!(parse_duration_field("-40", 200), 1);
        assert_eq!(parse_duration_field(" 75 ", 200), 75);
        assert_eq!(parse_duration_field("+30", 200), 30);
    }

    #[test]
    fn oversized_fields_clamp_to_ceiling() {
        assert_eq!(parse_duration_field("99999999999999999999", 200), MAX_DURATION_MS);
        assert_eq!(parse_duration_field("3600001", 200), MAX_DURATION_MS);
        assert_eq!(parse_duration_field("3600000", 200), 3_600_000);
        let t = TimingConfig {
            on_short: u64::MAX,
            ..TimingConfig::default()
        }
        .sanitized();
        assert_eq!(t.on_short, MAX_DURATION_MS);
    }

    #[test]
    fn leading_integer_is_taken_from_mixed_text() {
        assert_eq!(parse_duration_field("250ms", 200), 250);
        assert_eq!(parse_duration_field("4.7", 200), 4);
    }

    #[test]
    fn resolve_coerces_each_field_independently() {
        let inputs = TimingInputs {
            on_short: "100".to_string(),
            on_long: "".to_string(),
            off_short: "x".to_string(),
            off_medium: "0".to_string(),
            off_long: "3000".to_string(),
        };
        let t = inputs.resolve();
        assert_eq!(
            t,
            TimingConfig {
                on_short: 100,
                on_long: 400,
                off_short: 200,
                off_medium: 1,
                off_long: 3000,
            }
        );
    }

    #[test]
    fn default_inputs_resolve_to_default_timing() {
        assert_eq!(TimingInputs::default().resolve(), TimingConfig::default());
    }

    #[test]
    fn sanitized_raises_zero_fields() {
        let t = TimingConfig {
            on_short: 0,
            on_long: 0,
            off_short: 5,
            off_medium: 0,
            off_long: 0,
        }
        .sanitized();
        assert_eq!(t.on_short, 1);
        assert_eq!(t.off_short, 5);
        assert_eq!(t.off_long, 1);
    }

    #[test]
    fn timing_round_trips_through_json() {
        let json = serde_json::to_string(&TimingConfig::default()).unwrap();
        assert!(json.contains("\"off_medium\":500"));
        let back: TimingConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TimingConfig::default());
    }
}

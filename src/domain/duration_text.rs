use std::fmt;
use std::time::Duration;

const UNITS: [(u64, &str); 4] = [
    (24 * 60 * 60, "day"),
    (60 * 60, "hour"),
    (60, "minute"),
    (1, "second"),
];

/// Human description of a remaining duration, e.g. `1 minute, and 5 seconds`.
///
/// Any sub-second remainder counts as a whole second, and units with a zero
/// amount are left out. A zero duration reads `0 seconds`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DurationText(pub Duration);

impl fmt::Display for DurationText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut seconds = self.0.as_secs();
        if self.0.subsec_nanos() > 0 {
            seconds += 1;
        }
        if seconds == 0 {
            return f.write_str("0 seconds");
        }

        let mut parts = Vec::with_capacity(UNITS.len());
        for (unit_seconds, name) in UNITS {
            if seconds < unit_seconds {
                continue;
            }
            let amount = seconds / unit_seconds;
            seconds %= unit_seconds;
            let plural = if amount == 1 { "" } else { "s" };
            parts.push(format!("{amount} {name}{plural}"));
        }

        if parts.len() > 1 {
            let last = parts.len() - 1;
            parts[last] = format!("and {}", parts[last]);
        }
        f.write_str(&parts.join(", "))
    }
}

use crate::error::ChunkError;

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// Fixed chunk width, parsed from a short duration code such as `1D` or `6H`.
///
/// Only fixed-length units are accepted: seconds (`S`), minutes (`T`/`min`),
/// hours (`H`) and days (`D`). The count defaults to 1 when omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowWidth {
    seconds: i64,
    code: String,
}

impl WindowWidth {
    pub fn seconds(&self) -> i64 {
        self.seconds
    }
}

impl std::fmt::Display for WindowWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}s)", self.code, self.seconds)
    }
}

impl std::str::FromStr for WindowWidth {
    type Err = ChunkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        let invalid = |reason: &str| {
            ChunkError::Configuration(format!("invalid window width '{}': {}", s, reason))
        };

        let split = code
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| invalid("missing unit (expected S, T/min, H or D)"))?;
        let (count, unit) = code.split_at(split);

        let count: i64 = if count.is_empty() {
            1
        } else {
            count.parse().map_err(|_| invalid("count is too large"))?
        };
        if count == 0 {
            return Err(invalid("count must be positive"));
        }

        let unit_seconds = match unit.to_ascii_lowercase().as_str() {
            "s" => 1,
            "t" | "min" => SECONDS_PER_MINUTE,
            "h" => SECONDS_PER_HOUR,
            "d" => SECONDS_PER_DAY,
            _ => return Err(invalid("unknown unit (expected S, T/min, H or D)")),
        };

        let seconds = count
            .checked_mul(unit_seconds)
            .ok_or_else(|| invalid("duration overflows"))?;

        Ok(WindowWidth {
            seconds,
            code: code.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_day_and_hour_codes() {
        assert_eq!("1D".parse::<WindowWidth>().unwrap().seconds(), 86_400);
        assert_eq!("d".parse::<WindowWidth>().unwrap().seconds(), 86_400);
        assert_eq!("1H".parse::<WindowWidth>().unwrap().seconds(), 3_600);
        assert_eq!("12h".parse::<WindowWidth>().unwrap().seconds(), 43_200);
    }

    #[test]
    fn parses_minute_and_second_codes() {
        assert_eq!("30min".parse::<WindowWidth>().unwrap().seconds(), 1_800);
        assert_eq!("15T".parse::<WindowWidth>().unwrap().seconds(), 900);
        assert_eq!("45S".parse::<WindowWidth>().unwrap().seconds(), 45);
    }

    #[test]
    fn keeps_original_code() {
        let width: WindowWidth = " 7D ".parse().unwrap();
        assert_eq!(width.to_string(), "7D (604800s)");
        assert_eq!(width.seconds(), 7 * 86_400);
    }

    #[test]
    fn rejects_bad_codes() {
        for code in ["", "1", "0D", "1W", "1M", "D1", "-1D", "1.5H", "99999999999999999999D"] {
            let err = code.parse::<WindowWidth>().unwrap_err();
            assert!(
                matches!(err, ChunkError::Configuration(_)),
                "code {:?} gave {:?}",
                code,
                err
            );
        }
    }
}

//! Refresh interval expressions.
//!
//! Two forms are understood:
//!
//! - five-field cron with a minute step and wildcards elsewhere
//!   (`*/30 * * * *`, or `* * * * *` for every minute)
//! - a duration literal: `90s`, `15m`, `2h` (bare digits are seconds)
//!
//! A cron step that does not divide the hour is treated as a fixed period.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Default refresh expression: every 30 minutes.
pub const DEFAULT_UPDATE_INTERVAL: &str = "*/30 * * * *";

/// Error parsing a refresh interval.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid refresh interval '{expression}': {reason}")]
pub struct IntervalParseError {
    pub expression: String,
    pub reason: String,
}

/// A parsed refresh interval, keeping the original expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshInterval {
    expression: String,
    period: Duration,
}

impl RefreshInterval {
    /// Time between scheduled syncs.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// The expression this interval was parsed from.
    pub fn expression(&self) -> &str {
        &self.expression
    }
}

impl Default for RefreshInterval {
    fn default() -> Self {
        Self {
            expression: DEFAULT_UPDATE_INTERVAL.to_string(),
            period: Duration::from_secs(30 * 60),
        }
    }
}

impl FromStr for RefreshInterval {
    type Err = IntervalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let expression = s.trim();
        let fail = |reason: &str| IntervalParseError {
            expression: expression.to_string(),
            reason: reason.to_string(),
        };

        let fields: Vec<&str> = expression.split_whitespace().collect();
        let period = match fields.as_slice() {
            [] => return Err(fail("empty expression")),
            [minute, rest @ ..] if rest.len() == 4 => {
                if rest.iter().any(|f| *f != "*") {
                    return Err(fail("only minute steps like '*/15 * * * *' are supported"));
                }
                let step = match *minute {
                    "*" => 1,
                    m => m
                        .strip_prefix("*/")
                        .and_then(|n| n.parse::<u64>().ok())
                        .ok_or_else(|| fail("minute field must be '*' or '*/N'"))?,
                };
                step.checked_mul(60)
                    .map(Duration::from_secs)
                    .ok_or_else(|| fail("interval too large"))?
            }
            [literal] => parse_duration(literal).ok_or_else(|| {
                fail("expected a cron expression or a duration like '90s', '15m', '2h'")
            })?,
            _ => return Err(fail("cron expressions need exactly five fields")),
        };

        if period.is_zero() {
            return Err(fail("interval must be greater than zero"));
        }

        Ok(Self {
            expression: expression.to_string(),
            period,
        })
    }
}

impl fmt::Display for RefreshInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

fn parse_duration(literal: &str) -> Option<Duration> {
    let (digits, multiplier) = match literal.char_indices().last()? {
        (i, 's') => (&literal[..i], 1),
        (i, 'm') => (&literal[..i], 60),
        (i, 'h') => (&literal[..i], 3600),
        _ => (literal, 1),
    };
    let value: u64 = digits.parse().ok()?;
    value.checked_mul(multiplier).map(Duration::from_secs)
}

use std::time::Duration;

use anyhow::{bail, Context, Result};
use regex::Regex;

/// Extensions to `Duration`
pub trait DurationExt
where
    Self: Sized,
{
    /// Parse a duration from a compact human string, for example "1s", "500ms" or "1m30s".
    fn from_human(s: &str) -> Result<Self>;

    /// Formats the duration in a humanized way, for example 1m30s.
    fn to_human(&self) -> String;
}

impl DurationExt for Duration {
    fn from_human(s: &str) -> Result<Self> {
        let re = Regex::new(r"^(?:(\d+)h)?(?:(\d+)m)?(?:(\d+)s)?(?:(\d+)ms)?$")
            .with_context(|| "Failed to compile duration regex")?;

        let caps = re
            .captures(s.trim())
            .with_context(|| format!("Invalid duration {:?}, expected something like 1s or 500ms", s))?;

        let field = |i: usize| -> Result<u64> {
            match caps.get(i) {
                Some(m) => m
                    .as_str()
                    .parse()
                    .with_context(|| format!("{} is not an integer", m.as_str())),
                None => Ok(0),
            }
        };

        let millis = [(1, 3_600_000), (2, 60_000), (3, 1000), (4, 1)]
            .into_iter()
            .try_fold(0u64, |acc, (i, scale)| -> Result<u64> {
                field(i)?
                    .checked_mul(scale)
                    .and_then(|ms| acc.checked_add(ms))
                    .with_context(|| format!("Duration {:?} is too long", s))
            })?;

        if millis == 0 {
            bail!("Duration {:?} must be longer than zero", s);
        }

        Ok(Duration::from_millis(millis))
    }

    fn to_human(&self) -> String {
        use std::fmt::Write;

        if self.is_zero() {
            return "0s".to_string();
        }

        let total = self.as_secs();
        let hours = total / 3600;
        let minutes = (total % 3600) / 60;
        let seconds = total % 60;
        let millis = self.subsec_millis();

        let mut acc = String::new();

        if hours > 0 {
            let _ = write!(acc, "{}h", hours);
        }

        if minutes > 0 {
            let _ = write!(acc, "{}m", minutes);
        }

        if seconds > 0 {
            let _ = write!(acc, "{}s", seconds);
        }

        if millis > 0 {
            let _ = write!(acc, "{}ms", millis);
        }

        acc
    }
}

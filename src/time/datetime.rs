use anyhow::{Context, Result};
use chrono::prelude::*;

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse a launch instant
///
/// Accepts RFC 3339 (`2024-10-31T23:59:59-05:00`) or a zoneless
/// `2024-10-31T23:59:59`, which is read as local time.
pub fn parse_target(s: &str) -> Result<DateTime<Local>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Local));
    }

    let naive = NaiveDateTime::parse_from_str(s, NAIVE_FORMAT)
        .with_context(|| format!("Invalid target {:?}, expected RFC 3339 or YYYY-MM-DDTHH:MM:SS", s))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .with_context(|| format!("Target {} does not exist in the local time zone", s))
}

pub mod local {
    use chrono::prelude::*;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Local>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;

        super::parse_target(&s).map_err(|e| D::Error::custom(format!("{:#}", e)))
    }

    pub fn serialize<S>(dt: &DateTime<Local>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&dt.to_rfc3339())
    }
}

#[cfg(test)]
mod test {
    use super::parse_target;

    #[test]
    fn parses_rfc3339() {
        let dt = parse_target("2024-10-31T23:59:59-05:00").unwrap();

        assert_eq!(dt.timestamp(), 1730437199);
    }

    #[test]
    fn parses_naive_as_local_time() {
        let dt = parse_target("2024-10-31T23:59:59").unwrap();

        assert_eq!(dt.naive_local().to_string(), "2024-10-31 23:59:59");
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_target("next tuesday").unwrap_err();

        assert!(err.to_string().contains("Invalid target"));
    }
}

use chrono::{DateTime, NaiveDateTime, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn to_rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

pub fn from_rfc3339(s: &str) -> anyhow::Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc))
}

/// Parses an interview schedule timestamp. Accepts full RFC 3339, and the
/// offset-less `datetime-local` form browsers submit ("2026-03-05T09:30" or
/// with seconds), which is interpreted as UTC.
pub fn parse_schedule_date(s: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }
    anyhow::bail!("unrecognized datetime: {s}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn rfc3339_round_trip() {
        let dt = from_rfc3339("2026-03-05T09:30:00+07:00").unwrap();
        assert_eq!(dt.hour(), 2);
        assert_eq!(to_rfc3339(dt), "2026-03-05T02:30:00+00:00");
    }

    #[test]
    fn datetime_local_is_read_as_utc() {
        let dt = parse_schedule_date("2026-03-05T09:30").unwrap();
        assert_eq!(to_rfc3339(dt), "2026-03-05T09:30:00+00:00");
        let dt = parse_schedule_date("2026-03-05T09:30:15").unwrap();
        assert_eq!(dt.second(), 15);
    }

    #[test]
    fn rfc3339_offset_still_wins() {
        let dt = parse_schedule_date("2026-03-05T09:30:00Z").unwrap();
        assert_eq!(dt.hour(), 9);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_schedule_date("tomorrow at nine").is_err());
        assert!(parse_schedule_date("2026-13-99T09:30").is_err());
    }
}

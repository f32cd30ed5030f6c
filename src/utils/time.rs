use anyhow::{anyhow, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};

/// Returns the first and the last second of `year` in UTC. This is the window the contribution
/// calendar is requested for.
pub fn year_bounds(year: i32) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let first = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| anyhow!("Invalid year {year}"))?;
    let last = NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(|| anyhow!("Invalid year {year}"))?;
    let end_of_day = last
        .and_hms_opt(23, 59, 59)
        .ok_or_else(|| anyhow!("Invalid year {year}"))?;
    Ok((
        Utc.from_utc_datetime(&first.and_time(NaiveTime::MIN)),
        Utc.from_utc_datetime(&end_of_day),
    ))
}

/// GraphQL `DateTime` scalars are ISO-8601 with a trailing `Z`.
pub fn to_graphql_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

pub fn current_year() -> i32 {
    Utc::now().year()
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use super::{to_graphql_datetime, year_bounds};

    #[test]
    fn year_bounds_cover_whole_year() -> Result<()> {
        let (from, to) = year_bounds(2025)?;
        assert_eq!(to_graphql_datetime(from), "2025-01-01T00:00:00Z");
        assert_eq!(to_graphql_datetime(to), "2025-12-31T23:59:59Z");
        Ok(())
    }

    #[test]
    fn year_bounds_rejects_unrepresentable_year() {
        assert!(year_bounds(i32::MAX).is_err());
    }
}

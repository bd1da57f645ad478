use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Synthetic match duration; the source never publishes a real end time.
const MATCH_DURATION_MINS: i64 = 105;

/// Converts a `"dd.MM. HH:mm"` kickoff token into UTC start and end instants.
///
/// The token carries no year, so `reference_year` (the current calendar year
/// at scrape time) is assumed. Tokens parsed in December for a January
/// fixture therefore land in the wrong year; known limitation, kept as-is.
///
/// Callers must have already length-checked the token (exactly 12 chars);
/// this function only rejects tokens that fail to parse.
pub fn normalize(raw: &str, zone: Tz, reference_year: i32) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let naive = NaiveDateTime::parse_from_str(
        &format!("{} {}", raw, reference_year),
        "%d.%m. %H:%M %Y",
    )
    .with_context(|| format!("Failed to parse kickoff token {:?}", raw))?;

    // Ambiguous wall times (DST fold) take the earliest offset; nonexistent
    // times (DST gap) have no UTC equivalent and fail normalization.
    let local = zone
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| anyhow!("Kickoff {:?} does not exist in zone {}", raw, zone))?;

    let start = local.with_timezone(&Utc);
    let end = start + Duration::minutes(MATCH_DURATION_MINS);
    Ok((start, end))
}

/// Fixed-width UTC timestamp as used in the calendar output.
pub fn format_ics(instant: &DateTime<Utc>) -> String {
    instant.format("%Y%m%dT%H%M%SZ").to_string()
}

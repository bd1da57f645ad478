use sha2::{Digest, Sha256};
use std::io::{self, Write};
use uuid::Uuid;

use crate::{kickoff, types::MatchRecord};

/// Namespace for deriving per-event UUIDs. Changing it changes every UID, so
/// it is fixed for the life of the project.
const CALENDAR_NAMESPACE: Uuid = Uuid::from_bytes([
    0xd2, 0x17, 0x8b, 0x5e, 0x15, 0x6c, 0x4a, 0xa6, 0xbf, 0xa4, 0x8d, 0xc5, 0x01, 0xcf, 0x33, 0x0c,
]);

const PRODID: &str = "-//flashscore-calendar-scraper//EN";

/// Deterministic event identifier: sha256 over the identifying fields, fed
/// into a namespaced v5 UUID. Regenerating the same match always yields the
/// same UID; changing any field yields a different one.
pub fn event_uid(record: &MatchRecord) -> Uuid {
    let mut hasher = Sha256::new();
    hasher.update(record.home_team.as_bytes());
    hasher.update(b"-");
    hasher.update(record.away_team.as_bytes());
    hasher.update(b"-");
    hasher.update(kickoff::format_ics(&record.start).as_bytes());
    hasher.update(b"-");
    hasher.update(kickoff::format_ics(&record.end).as_bytes());
    hasher.update(b"-");
    hasher.update(record.description.as_bytes());
    let digest = format!("{:x}", hasher.finalize());

    Uuid::new_v5(&CALENDAR_NAMESPACE, digest.as_bytes())
}

/// Streams a complete VCALENDAR document for one team. Events appear in
/// input order; the caller supplies results first, fixtures after.
pub fn write_calendar<W: Write>(
    team_name: &str,
    matches: &[MatchRecord],
    sink: &mut W,
) -> io::Result<()> {
    write!(
        sink,
        "BEGIN:VCALENDAR\n\
         X-WR-CALNAME: {}\n\
         PRODID:{}\n\
         VERSION:2.0\n\
         CALSCALE:GREGORIAN\n\
         METHOD:PUBLISH\n",
        team_name, PRODID
    )?;

    for record in matches {
        write_event(record, sink)?;
    }

    write!(sink, "END:VCALENDAR")?;
    Ok(())
}

fn write_event<W: Write>(record: &MatchRecord, sink: &mut W) -> io::Result<()> {
    let start = kickoff::format_ics(&record.start);
    let end = kickoff::format_ics(&record.end);

    write!(
        sink,
        "BEGIN:VEVENT\n\
         DTSTART:{start}\n\
         DTEND:{end}\n\
         DTSTAMP:{start}\n\
         UID: {uid}\n\
         SEQUENCE:0\n\
         SUMMARY:{championship} {home} - {away}\n\
         DESCRIPTION:{description}\n\
         END:VEVENT\n",
        start = start,
        end = end,
        uid = event_uid(record),
        championship = record.championship,
        home = record.home_team,
        away = record.away_team,
        description = record.description,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn record() -> MatchRecord {
        let start = Utc.with_ymd_and_hms(2024, 3, 5, 17, 30, 0).unwrap();
        MatchRecord {
            championship: "Serie A".to_string(),
            home_team: "Santos".to_string(),
            away_team: "Corinthians".to_string(),
            start,
            end: start + Duration::minutes(105),
            description: String::new(),
        }
    }

    fn emit(team: &str, matches: &[MatchRecord]) -> String {
        let mut buf = Vec::new();
        write_calendar(team, matches, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn document_matches_expected_layout() {
        let doc = emit("Santos", &[record()]);
        let uid = event_uid(&record());
        let expected = format!(
            "BEGIN:VCALENDAR\n\
             X-WR-CALNAME: Santos\n\
             PRODID:-//flashscore-calendar-scraper//EN\n\
             VERSION:2.0\n\
             CALSCALE:GREGORIAN\n\
             METHOD:PUBLISH\n\
             BEGIN:VEVENT\n\
             DTSTART:20240305T173000Z\n\
             DTEND:20240305T191500Z\n\
             DTSTAMP:20240305T173000Z\n\
             UID: {}\n\
             SEQUENCE:0\n\
             SUMMARY:Serie A Santos - Corinthians\n\
             DESCRIPTION:\n\
             END:VEVENT\n\
             END:VCALENDAR",
            uid
        );
        assert_eq!(doc, expected);
    }

    #[test]
    fn emission_is_idempotent() {
        let matches = [record()];
        assert_eq!(emit("Santos", &matches), emit("Santos", &matches));
    }

    #[test]
    fn uid_is_stable_across_calls() {
        assert_eq!(event_uid(&record()), event_uid(&record()));
    }

    #[test]
    fn uid_changes_when_any_identifying_field_changes() {
        let base = record();
        let base_uid = event_uid(&base);

        let mut m = base.clone();
        m.home_team = "Palmeiras".to_string();
        assert_ne!(event_uid(&m), base_uid);

        let mut m = base.clone();
        m.away_team = "Flamengo".to_string();
        assert_ne!(event_uid(&m), base_uid);

        let mut m = base.clone();
        m.start = m.start + Duration::hours(1);
        assert_ne!(event_uid(&m), base_uid);

        let mut m = base.clone();
        m.end = m.end + Duration::minutes(1);
        assert_ne!(event_uid(&m), base_uid);

        let mut m = base.clone();
        m.description = "Santos 2 - 1 Corinthians".to_string();
        assert_ne!(event_uid(&m), base_uid);
    }

    #[test]
    fn uid_ignores_championship() {
        // The section heading is presentation, not identity; a match moved
        // between listing groups keeps its UID.
        let mut m = record();
        m.championship = "Copa do Brasil".to_string();
        assert_eq!(event_uid(&m), event_uid(&record()));
    }

    #[test]
    fn events_keep_input_order() {
        let first = record();
        let mut second = record();
        second.home_team = "Palmeiras".to_string();
        second.start = second.start + Duration::days(7);
        second.end = second.end + Duration::days(7);

        let doc = emit("Santos", &[first, second]);
        let santos_pos = doc.find("SUMMARY:Serie A Santos - Corinthians").unwrap();
        let palmeiras_pos = doc.find("SUMMARY:Serie A Palmeiras - Corinthians").unwrap();
        assert!(santos_pos < palmeiras_pos);
    }
}

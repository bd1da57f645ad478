use chrono_tz::Tz;
use scraper::{ElementRef, Html, Selector};

use crate::{kickoff, types::MatchRecord};

/// Marker the source appends to kickoff tokens of penalty-decided matches.
const SHOOTOUT_MARKER: &str = "Pen";

/// Length of a well-formed `"dd.MM. HH:mm"` kickoff token.
const TIME_TOKEN_LEN: usize = 12;

/// Extracts match records from a fully expanded listing page.
///
/// Rows that are missing a participant or carry a malformed kickoff token are
/// placeholder/ad noise and are dropped without comment; extraction itself
/// never fails.
pub struct ListingParser {
    zone: Tz,
    reference_year: i32,
}

impl ListingParser {
    pub fn new(zone: Tz, reference_year: i32) -> Self {
        Self {
            zone,
            reference_year,
        }
    }

    pub fn parse(&self, html: &str, include_result: bool) -> Vec<MatchRecord> {
        let document = Html::parse_document(html);
        let section_selector = Selector::parse(".sportName.soccer").unwrap();
        let match_selector = Selector::parse(".event__match").unwrap();

        let Some(section) = document.select(&section_selector).next() else {
            return Vec::new();
        };

        let mut matches = Vec::new();
        for entry in section.select(&match_selector) {
            if let Some(record) = self.parse_entry(entry, include_result) {
                matches.push(record);
            }
        }
        matches
    }

    fn parse_entry(&self, entry: ElementRef, include_result: bool) -> Option<MatchRecord> {
        let championship = championship_for(entry);

        let home_team = participant_name(entry, ".event__homeParticipant")?;
        let away_team = participant_name(entry, ".event__awayParticipant")?;

        let time_selector = Selector::parse(".event__time").unwrap();
        let raw_time = entry
            .select(&time_selector)
            .next()
            .map(|el| el.text().collect::<String>())?;
        let token = raw_time.trim().replace(SHOOTOUT_MARKER, "");
        if token.chars().count() != TIME_TOKEN_LEN {
            return None;
        }

        let (start, end) = kickoff::normalize(&token, self.zone, self.reference_year).ok()?;

        let description = if include_result {
            let (home_score, away_score) = self.scores(entry);
            format!("{} {} - {} {}", home_team, home_score, away_score, away_team)
        } else {
            String::new()
        };

        Some(MatchRecord {
            championship,
            home_team,
            away_team,
            start,
            end,
            description,
        })
    }

    /// Regular-time score fields, unless the stage label says the match was
    /// decided on penalties, in which case the shootout fields hold the
    /// deciding score pair. Rows without score nodes (postponed, awarded)
    /// yield empty score text rather than being discarded.
    fn scores(&self, entry: ElementRef) -> (String, String) {
        let stage_selector = Selector::parse(".event__stage").unwrap();
        let went_to_shootout = entry
            .select(&stage_selector)
            .next()
            .map(|el| el.text().collect::<String>().trim() == SHOOTOUT_MARKER)
            .unwrap_or(false);

        let (home_sel, away_sel) = if went_to_shootout {
            (".event__part--home", ".event__part--away")
        } else {
            (".event__score--home", ".event__score--away")
        };

        let home = trimmed_text(entry, home_sel).unwrap_or_default();
        let away = trimmed_text(entry, away_sel).unwrap_or_default();
        (home, away)
    }
}

/// Title of the nearest league header preceding the entry, scanning siblings
/// backward. Listings group matches under header rows rather than nesting
/// them, so the first header hit is the entry's championship.
fn championship_for(entry: ElementRef) -> String {
    let title_selector = Selector::parse(".event__titleBox a").unwrap();

    let header = entry
        .prev_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| {
            el.value()
                .attr("class")
                .map(|class| class.contains("wclLeagueHeader"))
                .unwrap_or(false)
        });

    header
        .and_then(|el| el.select(&title_selector).next())
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Participant name from the short slot (`span`), falling back to the long
/// slot (`strong`). None when both are empty, which marks the row for
/// discard.
fn participant_name(entry: ElementRef, side: &str) -> Option<String> {
    let side_selector = Selector::parse(side).unwrap();
    let span_selector = Selector::parse("span").unwrap();
    let strong_selector = Selector::parse("strong").unwrap();

    let node = entry.select(&side_selector).next()?;

    let short = node
        .select(&span_selector)
        .flat_map(|el| el.text())
        .collect::<String>()
        .trim()
        .to_string();
    if !short.is_empty() {
        return Some(short);
    }

    let long = node
        .select(&strong_selector)
        .flat_map(|el| el.text())
        .collect::<String>()
        .trim()
        .to_string();
    if long.is_empty() {
        None
    } else {
        Some(long)
    }
}

fn trimmed_text(entry: ElementRef, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).unwrap();
    entry
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}

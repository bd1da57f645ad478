use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One scraped match, either a finished result or an upcoming fixture.
///
/// `start`/`end` are absolute UTC instants; the source only publishes local
/// wall-clock kickoff times, so the end is synthesized as kickoff + 1h45m.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub championship: String,
    pub home_team: String,
    pub away_team: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Empty for fixtures; `"{home} {hs} - {as} {away}"` for results.
    pub description: String,
}

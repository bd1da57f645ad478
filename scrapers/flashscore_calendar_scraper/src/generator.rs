use anyhow::{Context, Result};
use chrono_tz::Tz;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
    time::Duration,
};
use tracing::{error, info};

use crate::{
    calendar,
    config::{AppConfig, TeamConfig},
    loader::MatchSourceLoader,
};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub generated: usize,
    pub skipped: usize,
}

/// Runs one full generation cycle: every configured team, sequentially,
/// results before fixtures. A failing team is logged and skipped so its
/// previous calendar file stays in place; it never blocks the teams after it.
pub async fn generate_all(config: &AppConfig) -> Result<CycleSummary> {
    let zone: Tz = config
        .time_zone
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid timeZone {:?}: {}", config.time_zone, e))?;

    let loader = MatchSourceLoader::new(
        &config.webdriver_url,
        zone,
        Duration::from_secs(config.settle_delay_secs),
    );

    let mut summary = CycleSummary::default();
    for team in &config.teams {
        info!("Generating calendar for {}", team.name);
        match generate_team(&loader, team, &config.output_dir).await {
            Ok(count) => {
                info!("Wrote {} events for {}", count, team.name);
                summary.generated += 1;
            }
            Err(e) => {
                error!("Skipping {} for this cycle: {:#}", team.name, e);
                summary.skipped += 1;
            }
        }
    }

    info!(
        "Cycle complete: {} generated, {} skipped",
        summary.generated, summary.skipped
    );
    Ok(summary)
}

async fn generate_team(
    loader: &MatchSourceLoader,
    team: &TeamConfig,
    output_dir: &str,
) -> Result<usize> {
    let mut matches = loader
        .load(&team.results_url, true)
        .await
        .context("Failed to load results")?;
    let fixtures = loader
        .load(&team.fixtures_url, false)
        .await
        .context("Failed to load fixtures")?;
    matches.extend(fixtures);

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output dir {:?}", output_dir))?;
    let path = Path::new(output_dir).join(format!("{}.ics", team_file_slug(&team.name)));

    let file = File::create(&path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut writer = BufWriter::new(file);
    calendar::write_calendar(&team.name, &matches, &mut writer)
        .and_then(|_| writer.flush())
        .with_context(|| format!("Failed to write {:?}", path))?;

    Ok(matches.len())
}

/// Filesystem-safe name for a team's calendar file: diacritics stripped,
/// runs of non-alphanumerics collapsed to `-`, lowercased.
pub fn team_file_slug(name: &str) -> String {
    slug::slugify(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn slug_lowercases_and_collapses() {
        assert_eq!(team_file_slug("Santos"), "santos");
        assert_eq!(team_file_slug("Bayern München"), "bayern-munchen");
        assert_eq!(team_file_slug("São Paulo FC"), "sao-paulo-fc");
        assert_eq!(team_file_slug("Milton  Keynes / Dons"), "milton-keynes-dons");
    }
}

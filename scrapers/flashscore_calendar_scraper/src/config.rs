use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TeamConfig {
    pub name: String,
    pub results_url: String,
    pub fixtures_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub teams: Vec<TeamConfig>,
    /// IANA zone the source renders kickoff times in.
    pub time_zone: String,
    pub port: u16,
    /// tokio-cron-scheduler expression, six fields with leading seconds.
    pub cron: String,
    pub run_at_startup: bool,
    pub output_dir: String,
    pub webdriver_url: String,
    /// How long to wait after navigation and after each "load more" click.
    pub settle_delay_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            teams: Vec::new(),
            time_zone: "Europe/Berlin".to_string(),
            port: 8080,
            cron: "0 0 6 * * *".to_string(),
            run_at_startup: false,
            output_dir: "public".to_string(),
            webdriver_url: "http://localhost:4444".to_string(),
            settle_delay_secs: 5,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let mut config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(port) = env::var("CALSCRAPER_PORT").map_or(Ok(None), |p| p.parse::<u16>().map(Some)) {
            if let Some(port) = port {
                self.port = port;
            }
        }
        if let Ok(url) = env::var("CALSCRAPER_WEBDRIVER_URL") {
            self.webdriver_url = url;
        }
        if let Ok(dir) = env::var("CALSCRAPER_OUTPUT_DIR") {
            self.output_dir = dir;
        }
        if let Ok(zone) = env::var("CALSCRAPER_TIMEZONE") {
            self.time_zone = zone;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_full_config() {
        let json = r#"{
            "teams": [
                {
                    "name": "Santos",
                    "resultsUrl": "https://www.flashscore.com/team/santos/n3QdnjFB/results/",
                    "fixturesUrl": "https://www.flashscore.com/team/santos/n3QdnjFB/fixtures/"
                }
            ],
            "timeZone": "Europe/Berlin",
            "port": 3000,
            "cron": "0 0 */6 * * *",
            "runAtStartup": true
        }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.teams.len(), 1);
        assert_eq!(config.teams[0].name, "Santos");
        assert_eq!(config.port, 3000);
        assert!(config.run_at_startup);
        // Fields absent from the file fall back to defaults.
        assert_eq!(config.output_dir, "public");
        assert_eq!(config.settle_delay_secs, 5);
    }

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.time_zone, "Europe/Berlin");
        assert_eq!(config.webdriver_url, "http://localhost:4444");
        assert!(!config.run_at_startup);
    }
}

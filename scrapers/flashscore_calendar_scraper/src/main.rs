use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::{fs, path::Path, sync::Arc};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use flashscore_calendar_scraper::{config::AppConfig, generator, web};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the JSON config file
    #[arg(short, long, default_value = "config.json")]
    config: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one generation cycle for all teams, then exit
    GenerateOnce,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = AppConfig::load(Path::new(&cli.config))?;

    if let Some(Commands::GenerateOnce) = cli.command {
        generator::generate_all(&config).await?;
        return Ok(());
    }

    fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("Failed to create output dir {:?}", config.output_dir))?;

    web::serve(&config.output_dir, config.port).await?;

    let config = Arc::new(config);

    if config.run_at_startup {
        info!("Running generation at startup...");
        if let Err(e) = generator::generate_all(&config).await {
            error!("Startup generation failed: {:#}", e);
        }
    }

    let scheduler = JobScheduler::new().await?;
    let job_config = Arc::clone(&config);
    let job = Job::new_async(config.cron.as_str(), move |_id, _scheduler| {
        let config = Arc::clone(&job_config);
        Box::pin(async move {
            info!("Generating calendars...");
            if let Err(e) = generator::generate_all(&config).await {
                error!("Scheduled generation failed: {:#}", e);
            }
        })
    })
    .with_context(|| format!("Invalid cron expression {:?}", config.cron))?;
    scheduler.add(job).await?;
    scheduler.start().await?;

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    Ok(())
}

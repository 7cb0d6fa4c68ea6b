use anyhow::Result;
use clap::Parser;

use sysglance::app::{App, Settings};
use sysglance::cli::{Cli, Commands};
use sysglance::utils::{aligned_table, AppConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let file = AppConfig::load()?;
    let settings = Settings::resolve(&cli, &file)?;

    match cli.command {
        None => {
            // No command - run the refreshing dashboard
            App::new(settings)?.run().await?;
        }
        Some(Commands::Snapshot) => {
            App::new(settings)?.snapshot_once().await?;
        }
        Some(Commands::Probes) => {
            handle_probes(settings)?;
        }
        Some(Commands::Config) => {
            handle_config(settings)?;
        }
    }

    Ok(())
}

fn handle_probes(settings: Settings) -> Result<()> {
    let app = App::new(settings)?;

    let rows: Vec<Vec<String>> = app
        .registry()
        .probes()
        .iter()
        .map(|probe| {
            vec![
                probe.name.clone(),
                probe
                    .timeout
                    .map(|t| humantime::format_duration(t).to_string())
                    .unwrap_or_else(|| {
                        format!(
                            "default ({})",
                            humantime::format_duration(settings.probe_timeout)
                        )
                    }),
                if probe.refresh_every == 1 {
                    "every cycle".to_string()
                } else {
                    format!("every {} cycles", probe.refresh_every)
                },
            ]
        })
        .collect();

    print!("{}", aligned_table(&["Probe", "Timeout", "Refresh"], &rows));
    Ok(())
}

fn handle_config(settings: Settings) -> Result<()> {
    settings.to_file_config().save()?;
    println!("Saved settings to {}", AppConfig::config_path()?.display());
    Ok(())
}

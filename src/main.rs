mod audio;
mod cli;
mod config;
mod error;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use cli::Cli;
use config::Config;
use report::Report;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    // Explicit --config path, or auto-detect blastbeat.toml / global config
    let mut config = match config::find_config(cli.config.as_deref()) {
        Some(path) => match config::load_config(&path) {
            Some(cfg) => {
                log::info!("Loaded config from {}", path.display());
                cfg
            }
            None => {
                log::warn!("Failed to load config from {}", path.display());
                Config::default()
            }
        },
        None => Config::default(),
    };
    cli.apply(&mut config);
    log::debug!("Effective config: {:?}", config);
    config.validate()?;

    log::info!("blastbeat - blast beat detector");
    log::info!("Input: {}", cli.input.display());

    // 1. Decode audio
    log::info!("Decoding audio...");
    let signal = audio::decode::decode_audio(&cli.input)?;

    // 2. Classify windows and find blast runs
    let progress = if cli.no_progress {
        None
    } else {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} windows ({eta} remaining)")
                .context("Invalid progress template")?
                .progress_chars("=>-"),
        );
        Some(pb)
    };

    let analysis = audio::analysis::analyze(&signal, &config, progress.clone())
        .with_context(|| format!("Failed to analyse {}", cli.input.display()))?;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    // 3. Report
    let report = Report::new(
        &cli.input,
        &signal,
        config.analysis.step_seconds,
        &analysis,
        cli.windows,
    );
    report.print();

    if let Some(ref path) = cli.json {
        report.write_json(path)?;
    }

    Ok(())
}

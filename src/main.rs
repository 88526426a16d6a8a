use std::io::{self, BufWriter, Write};

use anyhow::Result;
use color::{StatusPalette, color_chart};
use config::Config;
use env_logger::Env;
use log::debug;
use render::{OutputMode, Renderer};

use crate::cli::Cli;

mod cli;
mod color;
mod config;
mod core;
mod fetch;
mod render;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_env(Env::default())
        .init();

    let config = Config::load_or_default(cli.config.as_deref())?;
    debug!("config: {config:?}");

    let mut out = BufWriter::new(io::stdout().lock());
    if cli.color_chart {
        color_chart(&mut out)?;
        out.flush()?;
        return Ok(());
    }

    let palette = StatusPalette::from(&config.colors).with_enabled(cli.color_enabled(&config));
    let renderer = Renderer::new(palette);
    let source = fetch::select_source(&cli, &config)?;

    core::run_report(source.as_ref(), OutputMode::from(&cli), &renderer, &mut out).await
}

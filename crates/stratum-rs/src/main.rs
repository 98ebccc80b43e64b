//! `stratum`: print the values a config model would be built from.

mod cli;

use clap::Parser;
use cli::Cli;
use log::{debug, info};
use std::io::{self, Write};

fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();

    let cli = Cli::parse();
    info!(
        "resolving config (folder_set={}, file_set={}, prefix_set={}, assignments={}, no_file={})",
        cli.folder.is_some(),
        cli.file_name.is_some(),
        cli.prefix.is_some(),
        cli.set.len(),
        cli.no_file
    );
    let resolved = cli.resolve()?;
    if cli.sources {
        let mut stderr = io::stderr().lock();
        for layer in &resolved.layers {
            writeln!(stderr, "{}: {}", layer.name, layer.description)?;
            writeln!(stderr, "  keys: [{}]", layer.keys.join(", "))?;
        }
    }
    let rendered = cli::render(&resolved.config.0, cli.format)?;
    debug!("rendered merged values (bytes={})", rendered.len());
    io::stdout().lock().write_all(rendered.as_bytes())?;
    Ok(())
}

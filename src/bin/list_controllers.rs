use anyhow::Context;
use backstage::adapters::gilrs_input::list_gamepads;
use backstage::utils::logger;
use backstage::TomlConfig;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "list-controllers")]
#[command(about = "List detected gamepads and the one backstage would use")]
struct Args {
    /// Path to TOML configuration file (for preferred controller names)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let config = match &args.config {
        Some(path) => TomlConfig::from_file(path)
            .with_context(|| format!("Failed to load config file '{}'", path.display()))?,
        None => TomlConfig::default(),
    };

    let gamepads = list_gamepads(&config.controller.preferred_names)
        .context("Failed to query gamepads")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&gamepads)?);
        return Ok(());
    }

    if gamepads.is_empty() {
        println!("No controllers found. Connect a PS4 controller.");
        return Ok(());
    }

    for pad in &gamepads {
        let marker = if pad.selected { "*" } else { " " };
        println!("{} [{}] {}", marker, pad.id, pad.name);
    }
    Ok(())
}

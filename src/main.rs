use anyhow::Context;
use backstage::config::{RobotKind, TomlConfig};
use backstage::core::{ConfigProvider, InputSource, Robot, SessionReport};
use backstage::utils::{logger, validation::Validate};
use backstage::{CliConfig, Gamepad, ReplayInput, RobotController, SimulatedRobot, TeleopEngine};
use clap::Parser;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code().max(1));
        }
    };

    if config.logging.json {
        logger::init_json_logger(config.debug_logging());
    } else {
        logger::init_cli_logger(config.debug_logging());
    }

    tracing::info!("=== PS4 Controller Robot Control System ===");
    tracing::info!("Initializing...");
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    match run_session(&cli, &config).await {
        Ok(report) => {
            if let Some(path) = &cli.report {
                let json = serde_json::to_string_pretty(&report)?;
                std::fs::write(path, json)
                    .with_context(|| format!("Failed to write session report to {}", path.display()))?;
                tracing::info!("Session report saved to: {}", path.display());
            }
            tracing::info!("Goodbye!");
        }
        Err(e) => {
            tracing::error!(
                "Session failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::info!("{}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn run_session(cli: &CliConfig, config: &TomlConfig) -> backstage::Result<SessionReport> {
    match &cli.replay {
        Some(path) => {
            tracing::info!("Replaying input from {}", path.display());
            let input = ReplayInput::from_file(path)?;
            with_robot(input, cli, config).await
        }
        None => open_gamepad(cli, config).await,
    }
}

#[cfg(feature = "gamepad")]
async fn open_gamepad(cli: &CliConfig, config: &TomlConfig) -> backstage::Result<SessionReport> {
    let input = backstage::adapters::GilrsInput::open(&config.controller.preferred_names)?;
    with_robot(input, cli, config).await
}

#[cfg(not(feature = "gamepad"))]
async fn open_gamepad(_cli: &CliConfig, _config: &TomlConfig) -> backstage::Result<SessionReport> {
    Err(backstage::TeleopError::ConfigError {
        message: "built without gamepad support; use --replay".to_string(),
    })
}

async fn with_robot<I: InputSource>(
    input: I,
    cli: &CliConfig,
    config: &TomlConfig,
) -> backstage::Result<SessionReport> {
    let settings = config.robot();
    match settings.kind {
        RobotKind::Simulated => drive(input, SimulatedRobot::new(), config, cli.monitor).await,
        RobotKind::Serial => {
            let port = backstage::utils::validation::validate_required_field(
                "robot.port",
                &settings.port,
            )?;
            let robot = open_serial(port, settings.baud_rate)?;
            drive(input, robot, config, cli.monitor).await
        }
    }
}

#[cfg(feature = "serial")]
fn open_serial(port: &str, baud_rate: u32) -> backstage::Result<impl Robot> {
    backstage::SerialRobot::open(port, baud_rate)
}

#[cfg(not(feature = "serial"))]
fn open_serial(_port: &str, _baud_rate: u32) -> backstage::Result<SimulatedRobot> {
    Err(backstage::TeleopError::ConfigError {
        message: "built without serial support".to_string(),
    })
}

async fn drive<I: InputSource, R: Robot, C: ConfigProvider>(
    input: I,
    robot: R,
    config: &C,
    monitor: bool,
) -> backstage::Result<SessionReport> {
    tracing::info!("Robot created successfully");
    let gamepad = Gamepad::new(input, config.controller());
    let controller = RobotController::new(robot, config.drive().clone());
    tracing::info!("Robot controller created successfully");

    let poll_rate = Duration::from_millis(config.controller().poll_rate_ms);
    let mut engine = TeleopEngine::new_with_monitoring(gamepad, controller, poll_rate, monitor);
    tracing::info!("Controller started - waiting for input");

    engine.run_until(shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Unable to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

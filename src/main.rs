//! Command line front end for powerd brightness control

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flexi_logger::Logger;
use powerd_brightness::{
    config::Config,
    control::{self, SessionPort},
    external::brightness::{BrightnessParams, PowerdConnection},
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Path to the TOML configuration file
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Log more. Can be repeated.
    #[clap(short, long, parse(from_occurrences))]
    verbose: usize,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Print the brightness parameters reported by powerd
    Params,
    /// Print the brightness after synchronizing it with powerd
    Get,
    /// Print the maximum brightness
    Max,
    /// Set the brightness, clamped into the supported range
    Set {
        #[clap(allow_hyphen_values = true)]
        value: i32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;
    let log_spec = match args.verbose {
        0 => config.log_level.clone(),
        1 => "debug".to_owned(),
        _ => "trace".to_owned(),
    };
    let _logger = Logger::try_with_env_or_str(&log_spec)?.start()?;
    log_panics::init();

    let (connection, params) = control::connect_powerd(config.bus)
        .await
        .context("Couldn't connect to powerd")?;

    if args.command == Command::Params {
        // Only the parameters were asked for, so powerd's brightness stays as it is
        print_params(&params);
        connection.release();
        return Ok(());
    }

    let provider = config.initial_value_provider();
    let port = control::spawn_session(connection, params, provider.as_ref()).await;
    let result = run(args.command, &port).await;
    port.teardown().await;
    result
}

async fn run(command: Command, port: &SessionPort) -> Result<()> {
    match command {
        Command::Params => print_params(port.params()),
        Command::Get => println!("{}", port.get_value().await?),
        Command::Max => println!("{}", port.get_max_value()),
        Command::Set { value } => {
            port.set_value(value)
                .await
                .context("Couldn't set brightness")?;
            println!("{}", port.get_value().await?);
        }
    }
    Ok(())
}

fn print_params(params: &BrightnessParams) {
    println!("dim: {}", params.dim);
    println!("min: {}", params.min);
    println!("max: {}", params.max);
    println!("default: {}", params.default);
    println!("auto-brightness: {}", params.ab_supported);
}

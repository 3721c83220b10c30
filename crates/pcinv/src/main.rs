//! pcinv
//!
//! Ansible dynamic inventory for Prism Central. Prints one JSON document on
//! stdout; logs go to stderr, filtered by `PCINV_LOG` (default `warn`).

use clap::Parser;
use color_eyre::Result;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pcinv_client::PrismClient;
use pcinv_core::config::find_config_file;
use pcinv_core::{Config, CoreError, Endpoint, PartialConfig, Runner};

mod cli;

use cli::Args;

/// Exit status for configuration and cache failures
const FAILURE_EXIT_CODE: i32 = -1;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let filter = EnvFilter::try_from_env("PCINV_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = resolve_config(&args).unwrap_or_else(|e| fail(&e));
    debug!(?config, "configuration resolved");

    if args.env {
        print_env(&config.endpoint);
        return Ok(());
    }

    let pretty = config.options.pretty;
    let client = PrismClient::new(
        &config.endpoint.ip_addr,
        config.endpoint.username.clone(),
        config.endpoint.password.clone(),
    )?;

    let document = Runner::new(config, client)
        .run()
        .await
        .unwrap_or_else(|e| fail(&e));

    let output = if pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    println!("{output}");

    Ok(())
}

/// Layer the INI file, the environment and the flags
fn resolve_config(args: &Args) -> Result<Config, CoreError> {
    let ini = match find_config_file(args.config.clone()) {
        Some(path) => PartialConfig::from_ini_file(&path)?,
        None => PartialConfig::default(),
    };
    let merged = ini.merge(PartialConfig::from_env()).merge(args.layer());
    Config::resolve(merged, args.options())
}

fn print_env(endpoint: &Endpoint) {
    println!("PC_IP_ADDR={}", endpoint.ip_addr);
    println!("PC_USERNAME={}", endpoint.username);
    println!("PC_PASSWORD={}", endpoint.password);
}

fn fail(err: &CoreError) -> ! {
    eprintln!("{err}");
    std::process::exit(FAILURE_EXIT_CODE)
}

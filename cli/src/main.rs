mod commands;
mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{lookup::LookupCommand, request::RequestCommand};
use rhub_client::Client;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "rhub")]
#[command(about = "cli for interacting with the Resource Hub API", long_about = None)]
struct Cli {
    /// Config file (toml or yaml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Resource Hub base address (overides config)
    #[arg(long, global = true)]
    addr: Option<String>,

    #[arg(long, global = true)]
    username: Option<String>,

    #[arg(long, global = true)]
    password: Option<String>,

    /// API token, used instead of username and password
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Clone)]
enum Command {
    /// Send a single request and print the result
    Request(RequestCommand),
    /// GET each path and print the raw bodies
    Lookup(LookupCommand),
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{}\n{:#}", "Error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut cfg = config::Config::load(cli.config.clone())?;
    cfg.addr = cli.addr.clone().or(cfg.addr);
    cfg.username = cli.username.clone().or(cfg.username);
    cfg.password = cli.password.clone().or(cfg.password);
    cfg.token = cli.token.clone().or(cfg.token);

    // logs go to stderr, stdout carries the json result
    let filter = EnvFilter::builder()
        .with_default_directive(cfg.log_level().into())
        .from_env_lossy();
    let _ = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let client = Client::new(cfg.addr()?, cfg.credentials().context("Fail resolve credentials")?);
    debug!(addr = %client.base_address(), "client ready");

    match cli.command {
        Command::Request(command) => command.execute(&client),
        Command::Lookup(command) => command.execute(&client).map(|_| ExitCode::SUCCESS),
    }
}

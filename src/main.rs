mod commands;
mod core;
mod jprm;
mod project;
mod release;
mod utils;

use clap::{ArgAction, Parser, Subcommand};
use crate::core::context::ReleaseContext;
use crate::core::error::{ReleaseError, print_error};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Build a Jellyfin plugin with jprm and publish it to a repository manifest
#[derive(Parser)]
#[command(name = "jprm-release")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Plugin project directory (default: current directory)
  #[arg(short = 'C', long = "dir", global = true)]
  dir: Option<PathBuf>,

  /// Config file (default: jprm-release.toml if present)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Increase log verbosity (-v debug, -vv trace)
  #[arg(short, long, action = ArgAction::Count, global = true)]
  verbose: u8,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build the plugin package and add it to the repository manifest
  Build {
    /// Restore jprm.yaml even if the build or a later step fails
    #[arg(long)]
    restore_on_failure: bool,
  },

  /// Show the resolved version, build parameters and download URL without building
  Plan {
    /// Output the plan in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

/// Diagnostics go to stderr; RUST_LOG overrides -v
fn init_logging(verbose: u8) {
  let default_level = match verbose {
    0 => "jprm_release=warn",
    1 => "jprm_release=debug",
    _ => "jprm_release=trace",
  };

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
    .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  let work_dir = match cli.dir {
    Some(dir) => dir,
    None => match std::env::current_dir() {
      Ok(dir) => dir,
      Err(e) => handle_error(ReleaseError::message(format!("Failed to get current directory: {}", e))),
    },
  };

  let ctx = match ReleaseContext::build(&work_dir, cli.config.as_deref()) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let result = match cli.command {
    Commands::Build { restore_on_failure } => commands::run_build(&ctx, restore_on_failure),
    Commands::Plan { json } => commands::run_plan(&ctx, json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: ReleaseError) -> ! {
  print_error(&err);
  std::process::exit(1);
}

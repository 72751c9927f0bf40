use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::process;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use lpma::cli::Cli;
use lpma::config::Config;
use lpma::format::Formatter;
use lpma::store::Store;
use lpma::{Context, Notice, Report};

fn main() {
  let cli = Cli::parse();
  init_logging(cli.debug);

  match run(cli) {
    Ok(code) => process::exit(code),
    Err(e) => {
      bentley::error!(&e.to_string());
      process::exit(1);
    }
  }
}

fn init_logging(debug: bool) {
  let filter = if debug {
    EnvFilter::new("lpma=debug,warn")
  } else {
    EnvFilter::try_from_env("LPMA_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
  };

  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr))
    .with(filter)
    .init();
}

fn run(cli: Cli) -> Result<i32> {
  let Some(command) = cli.command else {
    println!("{}", Cli::command().render_usage());
    return Ok(0);
  };

  let config = Config::load(cli.config.as_deref())?;
  let data_file = config.data_file(cli.file.as_deref())?;
  tracing::debug!("using project store {}", data_file.display());

  let formatter = Formatter::new(config.line_width, config.label_width, std::env::current_dir()?);
  let ctx = Context::new(Store::new(data_file), formatter);

  let report = lpma::execute(&ctx, command.into_command())?;
  Ok(print_report(&report))
}

fn print_report(report: &Report) -> i32 {
  match &report.notice {
    Some(Notice::Success(message)) => {
      bentley::success!(message);
    }
    Some(Notice::Info(message)) => {
      bentley::info!(message);
    }
    None => {}
  }
  for line in &report.lines {
    println!("{line}");
  }
  if let Some(failure) = &report.failure {
    bentley::error!(&failure.to_string());
  }
  report.exit_code()
}

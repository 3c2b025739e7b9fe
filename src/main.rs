use std::{
  io::{self, Write},
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::{Context, Result};
use chrono::prelude::*;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colored::Colorize;

use grain_countdown::config::{self, Config};
use grain_countdown::display;
use grain_countdown::engine::CountdownEngine;
use grain_countdown::time::{parse_target, DurationExt, RemainingDuration};
use grain_countdown::Countdown;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
  #[command(subcommand)]
  command: Command,
  /// Config file to use. [default: ${XDG_CONFIG_DIR}/graincountdown/config.toml]
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,
  /// Count down to this instant instead of the configured one
  ///
  /// Accepts RFC 3339 or YYYY-MM-DDTHH:MM:SS in local time.
  #[arg(short, long, global = true, value_parser = parse_target)]
  target: Option<DateTime<Local>>,
  #[command(flatten)]
  verbose: Verbosity<WarnLevel>,
}

#[derive(Debug, Subcommand)]
enum Command {
  /// Show the time remaining until launch
  Status {
    /// Print a custom-formatted status
    ///
    /// Recognizes the following tokens:
    ///
    /// %d - days, at least two digits
    ///
    /// %h - hours, two digits
    ///
    /// %m - minutes, two digits
    ///
    /// %s - seconds, two digits
    ///
    /// %D - total remaining time in seconds
    ///
    /// %t - target time in RFC 3339 format
    ///
    /// %T - target time as a Unix timestamp
    ///
    /// %n - title
    #[arg(short, long, conflicts_with = "json")]
    format: Option<String>,
    /// Print the remaining time as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
  },
  /// Show a live countdown, updated until interrupted
  Watch {
    /// Time between updates [default: from config, 1s]
    #[arg(short, long, value_parser = Duration::from_human)]
    interval: Option<Duration>,
    /// Exit once the countdown reaches zero
    #[arg(long, default_value_t = false)]
    exit_on_zero: bool,
  },
  /// Print the config file location, creating it if needed
  Config,
}

fn print_status(countdown: &Countdown, format: Option<&str>, json: bool) -> Result<()> {
  let now = Local::now();

  if let Some(format) = format {
    println!("{}", countdown.format(format, now));

    return Ok(());
  }

  let remaining = countdown.remaining(now);

  if json {
    println!("{}", serde_json::to_string(&remaining).with_context(|| "Unable to format countdown as JSON")?);

    return Ok(());
  }

  println!("{}", countdown.title().bold());
  println!("Launching {}", countdown.target().format("%d %b %Y %R").to_string().cyan());
  println!();

  display::table(&remaining).printstd();

  println!();
  if remaining.is_zero() {
    println!("{}", "We're live!".green().bold());
  } else if !countdown.tagline().is_empty() {
    println!("{}", countdown.tagline().dimmed());
  }

  Ok(())
}

fn redraw(out: &mut impl Write, countdown: &Countdown, remaining: &RemainingDuration) -> Result<()> {
  write!(out, "\r{}", display::status_line(countdown.title(), remaining))?;
  out.flush()?;

  Ok(())
}

async fn watch(countdown: &Countdown, interval: Duration, exit_on_zero: bool) -> Result<()> {
  let mut handle = CountdownEngine::new(countdown.target()).start(interval);
  let mut stdout = io::stdout();

  let first = handle.current();
  redraw(&mut stdout, countdown, &first.remaining)?;

  if !(exit_on_zero && first.remaining.is_zero()) {
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
      tokio::select! {
        result = &mut ctrl_c => {
          result.with_context(|| "Failed to listen for Ctrl-C")?;
          break;
        }
        tick = handle.changed() => match tick {
          Some(tick) => {
            redraw(&mut stdout, countdown, &tick.remaining)?;

            if exit_on_zero && tick.remaining.is_zero() {
              break;
            }
          }
          None => break,
        }
      }
    }
  }

  handle.cancel();
  writeln!(stdout)?;

  Ok(())
}

fn load(config_path: &Path, target: Option<DateTime<Local>>) -> Result<(Config, Countdown)> {
  let config = Config::init(config_path)?;

  let mut countdown = Countdown::from_config(&config);
  if let Some(target) = target {
    countdown.set_target(target);
  }

  Ok((config, countdown))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
  human_panic::setup_panic!();

  let args = Args::parse();

  env_logger::Builder::new()
    .filter_level(args.verbose.log_level_filter())
    .init();

  let config_path =
    if let Some(conf_path) = args.config {
      conf_path
    } else {
      config::default_config_path()?
    };

  match args.command {
    Command::Status { format, json } => {
      let (_, countdown) = load(&config_path, args.target)?;

      print_status(&countdown, format.as_deref(), json)?;
    },
    Command::Watch { interval, exit_on_zero } => {
      let (config, countdown) = load(&config_path, args.target)?;
      let interval = interval.unwrap_or(config.tick_interval);

      watch(&countdown, interval, exit_on_zero).await?;
    },
    Command::Config => {
      if !config_path.exists() {
        Config::init(&config_path)?;
      }

      println!("{}", config_path.display());
    },
  }

  Ok(())
}

//! EarnLab CLI — earnings calendar, momentum ranking and config commands.
//!
//! Commands:
//! - `calendar fetch` — download the earnings dataset and save it locally
//! - `calendar show` — summarize the calendar or list one date's reporters
//! - `calendar upcoming` — tickers reporting N business days after a date
//! - `rank` — rank local CSV price history by trailing momentum
//! - `config init` / `config show` — write or print the strategy config

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use earnlab_core::calendar::EarningsCalendar;
use earnlab_core::data::{CsvHistory, HttpEarningsSource};
use earnlab_core::domain::{CoarseCandidate, SymbolId};
use earnlab_core::indicators::TrackerBook;
use earnlab_core::selection::UniverseSelector;
use earnlab_core::strategy::StrategyConfig;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "earnlab",
    about = "EarnLab CLI — earnings-window momentum strategy tools",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Earnings calendar commands.
    Calendar {
        #[command(subcommand)]
        action: CalendarAction,
    },
    /// Rank tickers with local price history by trailing momentum.
    Rank {
        /// Earnings calendar JSON file.
        #[arg(long)]
        calendar: PathBuf,

        /// Directory of <TICKER>.csv files with a `date,close` header.
        #[arg(long)]
        prices_dir: PathBuf,

        /// Ranking date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<String>,

        /// Strategy config TOML. Defaults to built-in settings.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the full ranking, not only the selection.
        #[arg(long, default_value_t = false)]
        all: bool,
    },
    /// Strategy configuration commands.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum CalendarAction {
    /// Download the earnings dataset and save it as JSON.
    Fetch {
        /// Dataset URL.
        #[arg(long)]
        url: String,

        /// Output file.
        #[arg(long, default_value = "earnings.json")]
        out: PathBuf,
    },
    /// Summarize the calendar, or list the tickers reporting on a date.
    Show {
        #[arg(long)]
        calendar: PathBuf,

        /// Announcement date (YYYY-MM-DD).
        #[arg(long)]
        date: Option<String>,
    },
    /// List tickers reporting a number of business days after a date.
    Upcoming {
        #[arg(long)]
        calendar: PathBuf,

        /// Reference date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<String>,

        /// Business days ahead to look. Overrides the config's days_before.
        #[arg(long)]
        days: Option<u32>,

        /// Strategy config TOML (days_before and holidays are used).
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write the default config as TOML.
    Init {
        #[arg(long, default_value = "earnlab.toml")]
        out: PathBuf,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Print the effective config and its id.
    Show {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Calendar { action } => match action {
            CalendarAction::Fetch { url, out } => run_calendar_fetch(&url, &out),
            CalendarAction::Show { calendar, date } => run_calendar_show(&calendar, date),
            CalendarAction::Upcoming {
                calendar,
                date,
                days,
                config,
            } => run_calendar_upcoming(&calendar, date, days, config),
        },
        Commands::Rank {
            calendar,
            prices_dir,
            date,
            config,
            all,
        } => run_rank(&calendar, &prices_dir, date, config, all),
        Commands::Config { action } => match action {
            ConfigAction::Init { out, force } => run_config_init(&out, force),
            ConfigAction::Show { config } => run_config_show(config),
        },
    }
}

fn parse_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD")),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn load_config(path: Option<&Path>) -> Result<StrategyConfig> {
    match path {
        Some(p) => StrategyConfig::from_file(p).with_context(|| format!("load config {}", p.display())),
        None => Ok(StrategyConfig::default()),
    }
}

fn load_calendar(path: &Path) -> Result<EarningsCalendar> {
    EarningsCalendar::from_file(path)
        .with_context(|| format!("load earnings calendar {}", path.display()))
}

fn run_calendar_fetch(url: &str, out: &Path) -> Result<()> {
    let source = HttpEarningsSource::new()?;
    let body = source.fetch_raw(url)?;
    // Parse before writing so a broken feed never lands on disk.
    let calendar = EarningsCalendar::from_json(&body)?;
    std::fs::write(out, body).with_context(|| format!("write {}", out.display()))?;
    info!(
        path = %out.display(),
        dates = calendar.len(),
        tickers = calendar.universe().len(),
        "earnings calendar saved"
    );
    Ok(())
}

fn run_calendar_show(path: &Path, date: Option<String>) -> Result<()> {
    let calendar = load_calendar(path)?;

    if let Some(date) = date {
        let date = parse_date(Some(&date))?;
        let tickers = calendar.tickers_on(date);
        println!("{date}: {} reporting", tickers.len());
        for ticker in tickers {
            println!("  {ticker}");
        }
        return Ok(());
    }

    println!("Announcement dates: {}", calendar.len());
    println!("Distinct tickers:   {}", calendar.universe().len());
    if let Some((first, last)) = calendar.date_range() {
        println!("Range:              {first} .. {last}");
    }
    Ok(())
}

fn run_calendar_upcoming(
    path: &Path,
    date: Option<String>,
    days: Option<u32>,
    config: Option<PathBuf>,
) -> Result<()> {
    let calendar = load_calendar(path)?;
    let config = load_config(config.as_deref())?;
    let today = parse_date(date.as_deref())?;
    let days_before = days.unwrap_or(config.days_before);

    let trading = config.trading_calendar();
    let target = trading.add_business_days(today, days_before);
    let switch = trading.add_business_days(target, config.switch_offset);
    let liquidate = trading.add_business_days(target, config.liquidate_offset);

    let tickers = calendar.tickers_on(target);
    println!(
        "{today} + {days_before} business days = {target} (switch {switch}, liquidate {liquidate})"
    );
    if tickers.is_empty() {
        println!("No announcements.");
    }
    for ticker in tickers {
        println!("  {ticker}");
    }
    Ok(())
}

fn run_rank(
    calendar_path: &Path,
    prices_dir: &Path,
    date: Option<String>,
    config: Option<PathBuf>,
    all: bool,
) -> Result<()> {
    let calendar = load_calendar(calendar_path)?;
    let config = load_config(config.as_deref())?;
    let today = parse_date(date.as_deref())?;
    let history = CsvHistory::new(prices_dir);

    let tickers = history.available_tickers()?;
    if tickers.is_empty() {
        bail!("no CSV files in {}", prices_dir.display());
    }

    let mut candidates = Vec::with_capacity(tickers.len());
    for ticker in &tickers {
        let symbol = SymbolId::usa(ticker);
        let rows = match history.load(&symbol) {
            Ok(rows) => rows,
            Err(e) => {
                warn!(%symbol, error = %e, "skipping ticker");
                continue;
            }
        };
        let last = rows.into_iter().filter(|(d, _)| *d <= today).last();
        if let Some((_, close)) = last {
            candidates.push(CoarseCandidate::new(symbol, close, true));
        }
    }

    let selector = UniverseSelector::new(config.quantile, config.min_price);
    let mut trackers = TrackerBook::new(config.window_len);
    let selection = selector.select(today, &candidates, &calendar, &mut trackers, &history);

    if all {
        println!("{:<8} {:>10}", "ticker", "momentum");
        for (symbol, perf) in selection.ranked.iter().rev() {
            println!("{:<8} {:>9.2}%", symbol.to_string(), perf * 100.0);
        }
        println!();
    }

    println!(
        "Eligible: {}  Ready: {}  Skipped: {}",
        selection.eligible,
        selection.ranked.len(),
        selection.skipped.len()
    );
    if selection.is_empty() {
        println!("Selection cleared (fewer than {} ready candidates).", selector.quantile());
        return Ok(());
    }
    println!("Top 1/{} selection:", selector.quantile());
    for symbol in selection.selected.iter().rev() {
        println!("  {symbol}");
    }
    Ok(())
}

fn run_config_init(out: &Path, force: bool) -> Result<()> {
    if out.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", out.display());
    }
    let text = StrategyConfig::default().to_toml()?;
    std::fs::write(out, text).with_context(|| format!("write {}", out.display()))?;
    println!("Wrote {}", out.display());
    Ok(())
}

fn run_config_show(config: Option<PathBuf>) -> Result<()> {
    let config = load_config(config.as_deref())?;
    println!("# config_id = {}", config.config_id()?);
    print!("{}", config.to_toml()?);
    Ok(())
}

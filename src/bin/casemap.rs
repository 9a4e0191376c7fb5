use std::{
    io::Write as _,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "casemap", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the inputs and print dataset statistics.
    Summary(SummaryArgs),
    /// Write the fill colors for one day as JSON.
    Frame(FrameArgs),
    /// Run timed playback and log every displayed day.
    Play(PlayArgs),
    /// Print the legend color stops.
    Legend(LegendArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Geography JSON (features with areaCode/areaName properties).
    #[arg(long)]
    geo: PathBuf,

    /// Population CSV.
    #[arg(long)]
    population: PathBuf,

    /// Cumulative case CSV (comma or semicolon delimited).
    #[arg(long)]
    cases: PathBuf,

    /// Optional JSON config; missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the moving average window.
    #[arg(long)]
    window: Option<usize>,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Also print slider marks (mid-year marks included).
    #[arg(long)]
    marks: bool,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Day index (0-based).
    #[arg(long)]
    day: usize,

    /// Output JSON path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PlayArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Number of ticks to run before stopping.
    #[arg(long, default_value_t = 10)]
    ticks: usize,

    /// Day index to start from.
    #[arg(long, default_value_t = 0)]
    start: usize,

    /// Override the tick delay in milliseconds.
    #[arg(long)]
    delay_ms: Option<u64>,
}

#[derive(Args, Debug)]
struct LegendArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Number of legend steps.
    #[arg(long, default_value_t = 40)]
    steps: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Summary(args) => cmd_summary(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Play(args) => cmd_play(args),
        Command::Legend(args) => cmd_legend(args),
    }
}

fn load_config(input: &InputArgs) -> anyhow::Result<casemap::CasemapConfig> {
    let mut cfg = match &input.config {
        Some(path) => casemap::CasemapConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => casemap::CasemapConfig::default(),
    };
    if let Some(window) = input.window {
        cfg.pipeline.moving_average_window = window;
    }
    Ok(cfg)
}

fn load_dataset(
    input: &InputArgs,
    cfg: &casemap::CasemapConfig,
) -> anyhow::Result<casemap::Dataset> {
    let paths = casemap::InputPaths {
        geography: input.geo.clone(),
        population: input.population.clone(),
        cases: input.cases.clone(),
    };
    let dataset = casemap::Dataset::load(&paths, cfg).context("load dataset")?;
    Ok(dataset)
}

fn cmd_summary(args: SummaryArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.input)?;
    let dataset = load_dataset(&args.input, &cfg)?;
    let report = dataset.report();
    let series = dataset.series();
    let [low, mid, high] = dataset.scale().domain();

    let mut out = std::io::stdout().lock();
    writeln!(out, "days:            {}", report.number_of_days)?;
    if let (Some(first), Some(last)) = (series.first_date(), series.last_date()) {
        writeln!(
            out,
            "range:           {} .. {}",
            casemap::day_label(first),
            casemap::day_label(last)
        )?;
    }
    writeln!(out, "municipalities:  {}", report.municipalities)?;
    writeln!(out, "case records:    {}", report.case_records)?;
    writeln!(out, "skipped rows:    {}", report.skipped_rows)?;
    writeln!(out, "regions:         {}", dataset.geography().features().len())?;
    writeln!(out, "scale domain:    {low:.0} / {mid:.0} / {high:.0}")?;
    writeln!(
        out,
        "no population:   {} records",
        report.normalize.missing_records()
    )?;
    for (code, count) in &report.normalize.missing_population {
        writeln!(out, "  {code}: {count}")?;
    }
    if args.marks {
        for mark in dataset.slider_marks(true) {
            writeln!(out, "mark {:>5}  {}", mark.value, mark.label)?;
        }
    }
    Ok(())
}

fn write_json(path: Option<&Path>, value: &impl serde::Serialize) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            let f = std::fs::File::create(path)
                .with_context(|| format!("create '{}'", path.display()))?;
            serde_json::to_writer_pretty(f, value).context("write frame JSON")?;
            eprintln!("wrote {}", path.display());
        }
        None => {
            let mut out = std::io::stdout().lock();
            serde_json::to_writer_pretty(&mut out, value).context("write frame JSON")?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.input)?;
    let dataset = load_dataset(&args.input, &cfg)?;
    let frame = dataset.frame(args.day)?;
    write_json(args.out.as_deref(), &frame)
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.input)?;
    if let Some(delay_ms) = args.delay_ms {
        cfg.playback.tick_delay_ms = delay_ms;
    }
    cfg.validate()?;
    let dataset = load_dataset(&args.input, &cfg)?;
    let n = dataset.number_of_days();

    let mut session = dataset.playback_session(&cfg)?;
    session.seek(args.start)?;
    session.toggle_play()?;

    // Generous bound so a stalled timer surfaces as an error instead of a hang.
    let timeout = cfg.playback.tick_delay() * 20 + Duration::from_secs(1);
    let mut out = std::io::stdout().lock();
    for _ in 0..args.ticks {
        let Some(index) = session.wait_tick(timeout)? else {
            anyhow::bail!("playback tick did not arrive within {timeout:?}");
        };
        let frame = dataset.frame(index)?;
        let day = dataset.series().day(index)?;
        let with_data = frame
            .fills
            .keys()
            .filter(|code| day.cell(code) != casemap::Cell::NoData)
            .count();
        writeln!(
            out,
            "{:<14} {:<16} {with_data}/{} regions with data",
            casemap::progress_label(index, n),
            frame.label,
            frame.fills.len()
        )?;
    }
    session.toggle_play()?;
    info!(state = ?session.state(), "playback stopped");
    Ok(())
}

fn cmd_legend(args: LegendArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.input)?;
    let dataset = load_dataset(&args.input, &cfg)?;
    let scale = dataset.scale();
    let mut out = std::io::stdout().lock();
    for (value, color) in scale.legend_stops(args.steps) {
        writeln!(out, "{value:>10.1}  {}", color.to_hex())?;
    }
    writeln!(out, "{:>10}  {}", "no data", scale.no_data.to_hex())?;
    writeln!(out, "{:>10}  {}", "null", scale.null_data.to_hex())?;
    Ok(())
}

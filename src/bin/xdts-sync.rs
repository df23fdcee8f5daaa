use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "xdts-sync", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the columns and exposures of a timesheet.
    Inspect(InspectArgs),
    /// Print the stepped curves synthesized for every column as JSON.
    Curves(CurvesArgs),
    /// Synchronize a project description against a folder of timesheets.
    Sync(SyncArgs),
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input `.xdts` file.
    file: PathBuf,

    /// Settings file (defaults apply when omitted).
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CurvesArgs {
    /// Input `.xdts` file.
    file: PathBuf,

    /// Composition frame rate.
    #[arg(long, default_value_t = 24.0)]
    fps: f64,
}

#[derive(Parser, Debug)]
struct SyncArgs {
    /// Project description JSON.
    #[arg(long)]
    project: PathBuf,

    /// Settings file; defaults to `xdts-sync.json` next to the project when present.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Timesheet folder; overrides `timesheetFolder` from the settings.
    #[arg(long)]
    timesheets: Option<PathBuf>,

    /// Output path for the synchronized project JSON.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(args),
        Command::Curves(args) => cmd_curves(args),
        Command::Sync(args) => cmd_sync(args),
    }
}

fn project_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

fn load_settings(explicit: Option<&Path>, dir: &Path) -> anyhow::Result<xdts_sync::Settings> {
    let settings = match explicit {
        Some(path) => xdts_sync::Settings::from_path(path)?,
        None => xdts_sync::Settings::load_or_default(dir)?,
    };
    Ok(settings)
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let settings = load_settings(args.settings.as_deref(), project_dir(&args.file))?;
    let ts = xdts_sync::Timesheet::from_path(&args.file)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{} ({} frames)", ts.name(), ts.duration())?;
    for (column, exposures) in ts.iter() {
        writeln!(out, "  {column}:")?;
        for e in exposures {
            let frame = settings.display_frame(e.frame);
            match e.value {
                Some(cel) => writeln!(out, "    {frame:>5}  {}", cel.get())?,
                None => writeln!(out, "    {frame:>5}  x")?,
            }
        }
    }
    Ok(())
}

fn cmd_curves(args: CurvesArgs) -> anyhow::Result<()> {
    let rate = xdts_sync::FrameRate::new(args.fps)?;
    let ts = xdts_sync::Timesheet::from_path(&args.file)?;

    let curves: BTreeMap<&str, xdts_sync::ColumnCurves> = ts
        .iter()
        .map(|(column, exposures)| (column, xdts_sync::synthesize_column(exposures, rate)))
        .collect();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &curves).context("write curves JSON")?;
    writeln!(out)?;
    Ok(())
}

fn cmd_sync(args: SyncArgs) -> anyhow::Result<()> {
    let dir = project_dir(&args.project);
    let settings = load_settings(args.settings.as_deref(), dir)?;

    let f = File::open(&args.project)
        .with_context(|| format!("open project '{}'", args.project.display()))?;
    let mut host = xdts_sync::MemoryHost::from_reader(BufReader::new(f))?.with_settings(&settings);

    let timesheet_dir = args
        .timesheets
        .clone()
        .unwrap_or_else(|| dir.join(&settings.timesheet_folder));
    let timesheets = xdts_sync::load_timesheets(&timesheet_dir)?;
    let groups = host.asset_groups()?;
    let tasks = xdts_sync::synchronize(&mut host, &timesheets, &groups)?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let f = File::create(&args.out)
        .with_context(|| format!("create output '{}'", args.out.display()))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, &host).context("write project JSON")?;
    w.flush()?;

    let columns: usize = tasks.iter().map(|t| t.columns.len()).sum();
    eprintln!(
        "synchronized {} timesheet(s), {columns} column(s); wrote {}",
        tasks.len(),
        args.out.display()
    );
    Ok(())
}

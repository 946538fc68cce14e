use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use orbitset::{
    BoxRaycaster, DatasetConfig, DatasetSession, DatasetSessionOpts, PartitionPolicy,
    RenderFailurePolicy,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "orbitset", version)]
struct Cli {
    /// Log at debug level (overridden by `RUST_LOG`).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render every view and write `transforms_{train,test}.json`.
    Generate(GenerateArgs),
    /// Print the planned poses and splits as JSON without rendering.
    Plan(PlanArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PartitionArg {
    Stride,
    Prefix,
}

impl From<PartitionArg> for PartitionPolicy {
    fn from(p: PartitionArg) -> Self {
        match p {
            PartitionArg::Stride => PartitionPolicy::StrideInterleave,
            PartitionArg::Prefix => PartitionPolicy::ContiguousPrefix,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FailureArg {
    Abort,
    Skip,
}

impl From<FailureArg> for RenderFailurePolicy {
    fn from(p: FailureArg) -> Self {
        match p {
            FailureArg::Abort => RenderFailurePolicy::Abort,
            FailureArg::Skip => RenderFailurePolicy::Skip,
        }
    }
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Input dataset config JSON.
    #[arg(long)]
    config: PathBuf,

    /// Override `dataset.train_fraction`.
    #[arg(long)]
    train_fraction: Option<f64>,

    /// Override `dataset.partition`.
    #[arg(long, value_enum)]
    partition: Option<PartitionArg>,

    /// Override `dataset.on_render_failure`.
    #[arg(long, value_enum)]
    on_render_failure: Option<FailureArg>,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Input dataset config JSON.
    #[arg(long)]
    config: PathBuf,

    /// Write the plan here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "orbitset=debug" } else { "orbitset=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let cfg = DatasetConfig::from_path(&args.config)?;
    let opts = DatasetSessionOpts {
        train_fraction: args.train_fraction,
        partition: args.partition.map(Into::into),
        on_render_failure: args.on_render_failure.map(Into::into),
    };
    let session = DatasetSession::new(&cfg, opts)?;
    let mut renderer = BoxRaycaster::from_config(&cfg);
    let report = session.run(&mut renderer)?;

    for (split, path) in &report.manifests {
        eprintln!("wrote {split} manifest {}", path.display());
    }
    for split in &report.empty_splits {
        eprintln!("no {split} frames; {split} manifest not written");
    }
    if report.frames_skipped > 0 {
        eprintln!(
            "skipped {} of {} frames",
            report.frames_skipped, report.frames_total
        );
    }
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let cfg = DatasetConfig::from_path(&args.config)?;
    let session = DatasetSession::new(&cfg, DatasetSessionOpts::default())?;
    let json = serde_json::to_string_pretty(&session.plan()).context("serialize plan")?;

    match args.out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(&out, json + "\n")
                .with_context(|| format!("write plan '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

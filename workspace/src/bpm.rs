use std::path::PathBuf;
use anyhow::Context;
use clap::Parser;
use fresnel::{
    config::ParamsOverride,
    grid::Dimensionality,
    output::NpyDir,
    problems,
    propagate::{ Mode, RunControl },
};
use tracing::info;

/// Run one of the registered beam propagation problems and write its output
/// as `.npy` files.
#[derive(Parser, Debug)]
#[command(name = "bpm", version)]
struct Cli {
    /// Name of the problem to run.
    #[arg(value_name = "EXAMPLE")]
    example: String,

    /// Dimensionality of the problem: 1D or 2D.
    #[arg(value_name = "DIM")]
    dim: Dimensionality,

    /// Propagate in imaginary time to find a ground state.
    #[arg(long)]
    ground: bool,

    /// TOML file with parameter overrides.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory [default: output/<DIM>/<EXAMPLE>].
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();
    let prob = problems::lookup(&cli.example, cli.dim)?;
    let overrides: ParamsOverride
        = match cli.config.as_ref() {
            Some(path) => ParamsOverride::from_toml_file(path)?,
            None => ParamsOverride::default(),
        };
    let outdir: PathBuf
        = cli.out.clone()
        .unwrap_or_else(|| {
            PathBuf::from("output")
                .join(cli.dim.to_string())
                .join(prob.name())
        });
    let mut sink = NpyDir::new(&outdir)
        .with_context(|| format!("preparing {}", outdir.display()))?;

    let mode = Mode::from_ground(cli.ground);
    let summary = prob.run(&overrides, mode, &mut sink, &RunControl::new())?;
    info!(
        frames = summary.frames,
        steps = summary.steps,
        t = summary.time,
        elapsed = ?summary.elapsed,
        outdir = %outdir.display(),
        "done"
    );
    Ok(())
}


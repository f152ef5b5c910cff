// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `build`   — turns a forest of DOM trees into datasets
//   2. `inspect` — loads a dataset and batches it once
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{BuildArgs, Commands, InspectArgs};

#[derive(Parser, Debug)]
#[command(
    name = "html-tree-dataset",
    version = "0.1.0",
    about = "Sample, mask and pad DOM-tree forests into training datasets."
)]
pub struct Cli {
    /// The subcommand to run (build or inspect)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Build(args)   => run_build(args),
            Commands::Inspect(args) => run_inspect(args),
        }
    }
}

fn run_build(args: BuildArgs) -> Result<()> {
    use crate::application::build_use_case::BuildUseCase;

    tracing::info!("Building '{}' datasets from trees in: {}", args.variant, args.forest_dir);

    let out_dir = args.out_dir.clone();
    let summary = BuildUseCase::new(args.into()).execute()?;

    println!(
        "Built {} samples ({} train / {} val) from {} trees, node_max={}, tree_max={}.",
        summary.samples,
        summary.train,
        summary.val,
        summary.trees,
        summary.node_max,
        summary.tree_max,
    );
    println!("Datasets saved to '{}'.", out_dir);
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    use crate::application::inspect_use_case::InspectUseCase;

    let report = InspectUseCase::new(args.out_dir, args.split.into(), args.batch_size).execute()?;

    println!("\nVariant:  {}", report.variant);
    println!("Padding:  {:?}", report.padding);
    println!("Samples:  {}", report.samples);
    println!("Shape:    node_max={}, tree_max={}", report.shape.node_max, report.shape.tree_max);
    println!("Batches:  {} of up to {}", report.batches, report.batch_size);
    match (report.query_dims, report.context_dims) {
        (Some(query), Some(context)) => {
            println!("First batch: query {:?}, context {:?}", query, context);
        }
        _ => println!("First batch: (dataset is empty)"),
    }
    Ok(())
}

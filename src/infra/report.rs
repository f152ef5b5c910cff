// ============================================================
// Layer 6 — Build Report
// ============================================================
// Appends one row per dataset build to a CSV file, so builds
// with different variants or reductions can be compared.
//
// Output file: <out>/builds.csv
//
// Example CSV output:
//   variant,reduction,trees,nodes,removed,samples,node_max,tree_max,train,val
//   base,random,120,58211,9120,10000,37,500,8000,2000
//   cont,depth,120,40133,27198,10000,37,500,8000,2000
//
// Reading it:
//   - `removed` is how many nodes the reduction took out
//   - tree_max close to the goal size means most trees were
//     reduced; far below it means the forest was small already
//   - node_max is the widest node row, i.e. the padded width
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};
use serde::{Deserialize, Serialize};

const HEADER: &str = "variant,reduction,trees,nodes,removed,samples,node_max,tree_max,train,val";

/// One row of the build report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSummary {
    pub variant:   String,
    pub reduction: String,

    /// Trees in the forest
    pub trees:     usize,

    /// Nodes left in the forest after reduction
    pub nodes:     usize,

    /// Nodes removed by reduction
    pub removed:   usize,

    pub samples:   usize,
    pub node_max:  usize,
    pub tree_max:  usize,
    pub train:     usize,
    pub val:       usize,
}

/// Logs build summaries to a CSV file.
pub struct BuildReport {
    csv_path: PathBuf,
}

impl BuildReport {
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl Into<String>) -> Result<Self> {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("builds.csv");

        // Appending across runs keeps one history per output directory
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(f, "{HEADER}")?;
            tracing::debug!("Created build report: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, s: &BuildSummary) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        writeln!(
            f,
            "{},{},{},{},{},{},{},{},{},{}",
            s.variant,
            s.reduction,
            s.trees,
            s.nodes,
            s.removed,
            s.samples,
            s.node_max,
            s.tree_max,
            s.train,
            s.val,
        )?;

        tracing::debug!("Logged build summary: {:?}", s);
        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

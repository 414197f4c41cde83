//! Batch command - Convert every plan in a directory

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use prdgen_core::{convert_file, Config, ConversionSummary, DirectorySink, Error};
use tokio::task::JoinSet;

use super::resolve_dir;

/// Arguments for the batch command
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Directory containing TDD plans (`*.md`)
    #[arg(required = true)]
    pub dir: PathBuf,
}

/// Outcome of converting one plan
#[derive(Debug)]
struct BatchEntry {
    name: String,
    result: prdgen_core::Result<ConversionSummary>,
}

impl BatchArgs {
    /// Execute the batch command
    pub async fn execute(&self, verbose: bool, config: &Config) -> anyhow::Result<()> {
        let plans = find_plans(&self.dir)?;
        if plans.is_empty() {
            println!("No plans found in {}", self.dir.display());
            return Ok(());
        }

        let sink = DirectorySink::new(resolve_dir(&config.output.dir)?);
        if verbose {
            tracing::info!(
                plans = plans.len(),
                output_dir = %sink.dir().display(),
                "Starting batch conversion"
            );
        }

        let options = config.render.clone();
        let entries = convert_all(plans, move |plan, name| {
            convert_file(plan, name, &options, &sink)
        })
        .await;

        let mut failed = 0;
        for entry in &entries {
            match &entry.result {
                Ok(summary) => println!(
                    "  ✅ {} -> {} ({} milestones, {} issues)",
                    entry.name,
                    summary.path.display(),
                    summary.milestones.len(),
                    summary.total_issues()
                ),
                Err(e) => {
                    failed += 1;
                    println!("  ❌ {}: {}", entry.name, e);
                }
            }
        }

        println!();
        println!(
            "Summary: {} converted, {} failed",
            entries.len() - failed,
            failed
        );

        if failed > 0 {
            anyhow::bail!("{} plan(s) failed to convert", failed);
        }
        Ok(())
    }
}

/// List `*.md` files in `dir`, sorted by name
fn find_plans(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Error reading plan directory {}", dir.display()))?;

    let mut plans = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
            plans.push(path);
        } else {
            tracing::debug!(path = %path.display(), "Skipping non-plan entry");
        }
    }
    plans.sort();
    Ok(plans)
}

/// Convert each plan on the blocking pool, returning results in plan order
///
/// A task that panics or is cancelled is reported as a failed entry.
async fn convert_all<F>(plans: Vec<PathBuf>, convert: F) -> Vec<BatchEntry>
where
    F: Fn(&Path, &str) -> prdgen_core::Result<ConversionSummary> + Send + Sync + 'static,
{
    let convert = Arc::new(convert);
    let names: Vec<String> = plans
        .iter()
        .map(|plan| {
            plan.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
        .collect();

    let mut tasks = JoinSet::new();
    for (index, (plan, name)) in plans.into_iter().zip(names.clone()).enumerate() {
        let convert = Arc::clone(&convert);
        tasks.spawn_blocking(move || (index, convert(&plan, &name)));
    }

    let mut results: Vec<Option<prdgen_core::Result<ConversionSummary>>> =
        names.iter().map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => results[index] = Some(result),
            Err(e) => tracing::warn!(error = %e, "Conversion task failed to complete"),
        }
    }

    names
        .into_iter()
        .zip(results)
        .map(|(name, result)| BatchEntry {
            result: result.unwrap_or_else(|| {
                Err(Error::Output(format!(
                    "Conversion task for {} did not complete",
                    name
                )))
            }),
            name,
        })
        .collect()
}

//! Convert command - Turn a TDD plan into a PRD

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use prdgen_core::{convert, Config, DirectorySink, MemorySink, PrdSink};

use super::resolve_dir;

/// Arguments for the convert command
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Path to the TDD plan
    #[arg(required = true)]
    pub plan: PathBuf,

    /// PRD name, used as the document title and output file stem
    #[arg(required = true)]
    pub name: String,

    /// Dry run - print the PRD instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

impl ConvertArgs {
    /// Execute the convert command
    pub async fn execute(&self, verbose: bool, config: &Config) -> anyhow::Result<()> {
        let content = std::fs::read_to_string(&self.plan)
            .with_context(|| format!("Error reading plan file {}", self.plan.display()))?;

        if verbose {
            tracing::info!(
                plan = %self.plan.display(),
                name = %self.name,
                dry_run = %self.dry_run,
                "Starting conversion"
            );
        }

        println!("Parsing TDD plan...");

        let memory = MemorySink::new();
        let directory;
        let sink: &dyn PrdSink = if self.dry_run {
            &memory
        } else {
            directory = DirectorySink::new(resolve_dir(&config.output.dir)?);
            &directory
        };

        let summary = convert(&content, &self.name, &config.render, sink)
            .with_context(|| format!("Failed to convert {}", self.plan.display()))?;

        println!("Found {} milestones", summary.milestones.len());
        for milestone in &summary.milestones {
            println!(
                "  - Milestone {}: {} ({} issues)",
                milestone.number, milestone.name, milestone.issue_count
            );
        }

        println!();
        println!("Generating PRD...");

        if self.dry_run {
            println!();
            print!("{}", memory.get(&self.name).unwrap_or_default());
            return Ok(());
        }

        println!();
        println!("✅ PRD created: {}", summary.path.display());
        println!();
        println!("Next steps:");
        println!("1. Review and edit: {}", summary.path.display());
        println!("2. Generate issues: /pm:prd-new {}", self.name);
        println!("3. Parse PRD: /pm:prd-parse {}", self.name);
        println!("4. Create issues: /pm:epic-oneshot {}", self.name);

        Ok(())
    }
}

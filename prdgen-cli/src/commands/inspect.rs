//! Inspect command - Show how a plan parses without rendering it

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use prdgen_core::{parse_plan, to_json, total_issues, Milestone};

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to the TDD plan
    #[arg(required = true)]
    pub plan: PathBuf,

    /// Print the parsed model as JSON
    #[arg(long)]
    pub json: bool,
}

impl InspectArgs {
    /// Execute the inspect command
    pub async fn execute(&self, verbose: bool) -> anyhow::Result<()> {
        let content = std::fs::read_to_string(&self.plan)
            .with_context(|| format!("Error reading plan file {}", self.plan.display()))?;
        let milestones = parse_plan(&content)
            .with_context(|| format!("Failed to parse {}", self.plan.display()))?;

        if self.json {
            println!("{}", to_json(&milestones)?);
            return Ok(());
        }

        print!("{}", describe(&self.plan, &milestones, verbose));
        Ok(())
    }
}

/// Human-readable outline of a parsed plan
fn describe(plan: &Path, milestones: &[Milestone], verbose: bool) -> String {
    let mut out = format!(
        "Parsed {}: {} milestones, {} issues\n\n",
        plan.display(),
        milestones.len(),
        total_issues(milestones)
    );

    for milestone in milestones {
        out.push_str(&format!(
            "  📁 Milestone {}: {} ({})\n",
            milestone.number, milestone.name, milestone.duration
        ));
        if !milestone.goal.is_empty() {
            out.push_str(&format!("     Goal: {}\n", milestone.goal));
        }
        for property in &milestone.properties {
            out.push_str(&format!("     • {}\n", property));
        }

        for issue in &milestone.issues {
            out.push_str(&format!(
                "    📝 Issue {}: {} ({}) - red {}, green {}, refactor {}\n",
                issue.id(),
                issue.title,
                issue.estimate,
                issue.red.len(),
                issue.green.len(),
                issue.refactor.len()
            ));

            if verbose {
                let phases = [
                    ("red", &issue.red),
                    ("green", &issue.green),
                    ("refactor", &issue.refactor),
                    ("property", &issue.related_properties),
                    ("depends on", &issue.dependencies),
                ];
                for (label, items) in phases {
                    for item in items {
                        out.push_str(&format!("         └─ {}: {}\n", label, item));
                    }
                }
            }
        }
        out.push('\n');
    }

    out
}

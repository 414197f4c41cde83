//! Plan to PRD conversion
//!
//! Ties the parser, renderer and an output sink together.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::output::{validate_name, PrdSink};
use crate::plan::{parse_plan, Milestone};
use crate::prd::{render_prd_with, RenderOptions};
use crate::Result;

/// Per-milestone line of a conversion summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneSummary {
    /// Milestone number
    pub number: u64,
    /// Milestone name
    pub name: String,
    /// Number of issues in the milestone
    pub issue_count: usize,
}

impl From<&Milestone> for MilestoneSummary {
    fn from(milestone: &Milestone) -> Self {
        Self {
            number: milestone.number,
            name: milestone.name.clone(),
            issue_count: milestone.issue_count(),
        }
    }
}

/// Result of converting a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionSummary {
    /// Where the PRD was written
    pub path: PathBuf,
    /// Milestones found in the plan
    pub milestones: Vec<MilestoneSummary>,
}

impl ConversionSummary {
    /// Total number of issues across all milestones
    pub fn total_issues(&self) -> usize {
        self.milestones.iter().map(|m| m.issue_count).sum()
    }
}

/// Convert plan text to a PRD named `name` and write it to `sink`
///
/// `name` is both the PRD title and the output file stem. Nothing is written
/// if the plan fails to parse.
pub fn convert(
    plan: &str,
    name: &str,
    options: &RenderOptions,
    sink: &dyn PrdSink,
) -> Result<ConversionSummary> {
    validate_name(name)?;

    let milestones = parse_plan(plan)?;
    let prd = render_prd_with(&milestones, name, options);
    let path = sink.write(name, &prd)?;

    let summary = ConversionSummary {
        path,
        milestones: milestones.iter().map(MilestoneSummary::from).collect(),
    };

    info!(
        name = %name,
        path = %summary.path.display(),
        milestones = summary.milestones.len(),
        issues = summary.total_issues(),
        "Converted plan"
    );

    Ok(summary)
}

/// Read a plan file and convert it
///
/// A plan that cannot be read produces no output.
pub fn convert_file(
    plan_path: &Path,
    name: &str,
    options: &RenderOptions,
    sink: &dyn PrdSink,
) -> Result<ConversionSummary> {
    let plan = std::fs::read_to_string(plan_path)?;
    convert(&plan, name, options, sink)
}

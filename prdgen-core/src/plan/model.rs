//! Plan document model

use serde::{Deserialize, Serialize};

use crate::Result;

/// A milestone from a TDD plan (`### Milestone N: Name (duration)`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// Milestone number, as written in the plan
    pub number: u64,
    /// Milestone name
    pub name: String,
    /// Duration estimate (e.g., "2 weeks")
    pub duration: String,
    /// Goal paragraph, empty when the plan has none
    pub goal: String,
    /// Properties to validate across the milestone
    pub properties: Vec<String>,
    /// Issues in plan order
    pub issues: Vec<Issue>,
}

impl Milestone {
    /// Create a milestone with no goal, properties or issues
    pub fn new(number: u64, name: impl Into<String>, duration: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
            duration: duration.into(),
            goal: String::new(),
            properties: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// Number of issues in this milestone
    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }
}

/// An issue within a milestone (`- Issue M.N: Title (estimate)`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Milestone part of the `M.N` id
    pub milestone_number: u64,
    /// Issue part of the `M.N` id
    pub issue_number: u64,
    /// Issue title
    pub title: String,
    /// Effort estimate (e.g., "2h")
    pub estimate: String,
    /// Description text, single-spaced
    pub description: String,
    /// Failing tests to write first
    pub red: Vec<String>,
    /// Minimal implementation steps
    pub green: Vec<String>,
    /// Cleanup steps
    pub refactor: Vec<String>,
    /// Properties this issue validates
    pub related_properties: Vec<String>,
    /// Issues or components this one depends on
    pub dependencies: Vec<String>,
}

impl Issue {
    /// Create an issue with empty description and checklists
    pub fn new(
        milestone_number: u64,
        issue_number: u64,
        title: impl Into<String>,
        estimate: impl Into<String>,
    ) -> Self {
        Self {
            milestone_number,
            issue_number,
            title: title.into(),
            estimate: estimate.into(),
            description: String::new(),
            red: Vec::new(),
            green: Vec::new(),
            refactor: Vec::new(),
            related_properties: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// Compound id (e.g., "1.2")
    pub fn id(&self) -> String {
        format!("{}.{}", self.milestone_number, self.issue_number)
    }
}

/// Total number of issues across all milestones
pub fn total_issues(milestones: &[Milestone]) -> usize {
    milestones.iter().map(Milestone::issue_count).sum()
}

/// Pretty-printed JSON dump of parsed milestones
pub fn to_json(milestones: &[Milestone]) -> Result<String> {
    Ok(serde_json::to_string_pretty(milestones)?)
}

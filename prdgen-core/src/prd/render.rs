//! PRD markdown renderer

use serde::{Deserialize, Serialize};

use crate::plan::{Issue, Milestone};

/// Labels applied to every issue unless configured otherwise
pub const DEFAULT_LABELS: [&str; 3] = ["enhancement", "backend", "testing"];

/// Checklist items appended to every refactor phase
const REFACTOR_CHECKLIST: [&str; 3] = [
    "Write Javadoc/JSDoc for all public methods",
    "Add inline comments for complex logic",
    "Update API documentation (if applicable)",
];

const PROPERTY_TESTS_CRITERION: &str = "Property tests pass (100+ iterations)";

/// Rendering options
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Labels listed on every issue
    pub labels: Vec<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            labels: DEFAULT_LABELS.iter().map(|l| l.to_string()).collect(),
        }
    }
}

/// Render milestones as a PRD with the default options
pub fn render_prd(milestones: &[Milestone], project_name: &str) -> String {
    render_prd_with(milestones, project_name, &RenderOptions::default())
}

/// Render milestones as a PRD
///
/// The output depends only on the arguments, so rendering the same plan twice
/// yields identical documents.
pub fn render_prd_with(
    milestones: &[Milestone],
    project_name: &str,
    options: &RenderOptions,
) -> String {
    let mut prd = String::new();

    prd.push_str(&format!("# {} PRD\n\n", project_name));
    prd.push_str("## Overview\n\n");
    prd.push_str("This PRD was auto-generated from a TDD implementation plan.\n");
    prd.push_str("All tasks follow the Red-Green-Refactor cycle with property-based testing.\n\n");

    prd.push_str("## Milestones\n\n");

    for milestone in milestones {
        render_milestone(&mut prd, milestone, options);
    }

    prd
}

fn render_milestone(prd: &mut String, milestone: &Milestone, options: &RenderOptions) {
    prd.push_str(&format!(
        "### Milestone {}: {}\n\n",
        milestone.number, milestone.name
    ));
    prd.push_str(&format!("**Duration**: {}\n", milestone.duration));
    prd.push_str(&format!("**Goal**: {}\n\n", milestone.goal));

    if !milestone.properties.is_empty() {
        prd.push_str("**Properties to validate**:\n");
        push_list(prd, &milestone.properties);
        prd.push('\n');
    }

    prd.push_str("#### Issues\n\n");

    for issue in &milestone.issues {
        render_issue(prd, issue, options);
    }
}

fn render_issue(prd: &mut String, issue: &Issue, options: &RenderOptions) {
    prd.push_str(&format!("##### Issue {}: {}\n\n", issue.id(), issue.title));
    prd.push_str(&format!("**Labels**: {}\n", options.labels.join(", ")));
    prd.push_str(&format!("**Estimate**: {}\n\n", issue.estimate));

    prd.push_str("**Description**:\n");
    prd.push_str(issue.description.trim());
    prd.push_str("\n\n");

    let has_properties = !issue.related_properties.is_empty();
    if has_properties {
        prd.push_str("**Related Properties**:\n");
        push_list(prd, &issue.related_properties);
        prd.push('\n');
    }

    prd.push_str("**TDD Approach**:\n\n");

    prd.push_str("Red Phase (Write Failing Tests):\n");
    push_checklist(prd, &issue.red);
    prd.push('\n');

    prd.push_str("Green Phase (Minimum Implementation):\n");
    push_checklist(prd, &issue.green);
    prd.push('\n');

    prd.push_str("Refactor Phase (Improve & Document):\n");
    push_checklist(prd, &issue.refactor);
    push_checklist(prd, &REFACTOR_CHECKLIST);
    prd.push('\n');

    prd.push_str("**Acceptance Criteria**:\n");
    push_checklist(prd, &["All unit tests pass", "All integration tests pass"]);
    if has_properties {
        push_checklist(prd, &[PROPERTY_TESTS_CRITERION]);
    }
    push_checklist(
        prd,
        &[
            "Code coverage > 80%",
            "No linter/compiler warnings",
            "Inline documentation complete",
            "API documentation updated (if applicable)",
            "Code review approved",
            "CI/CD pipeline green",
        ],
    );
    prd.push('\n');

    if !issue.dependencies.is_empty() {
        prd.push_str("**Dependencies**:\n");
        push_list(prd, &issue.dependencies);
        prd.push('\n');
    }
}

fn push_list<S: AsRef<str>>(prd: &mut String, items: &[S]) {
    for item in items {
        prd.push_str(&format!("- {}\n", item.as_ref()));
    }
}

fn push_checklist<S: AsRef<str>>(prd: &mut String, items: &[S]) {
    for item in items {
        prd.push_str(&format!("- [ ] {}\n", item.as_ref()));
    }
}

//! Plan parsing
//!
//! This module handles parsing of TDD implementation plans: markdown
//! documents made of milestones, each holding issues broken down into
//! red/green/refactor checklists.

mod model;
mod parser;

pub use model::{to_json, total_issues, Issue, Milestone};
pub use parser::{parse_plan, Section};

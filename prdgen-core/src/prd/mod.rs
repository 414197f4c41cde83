//! PRD generation
//!
//! Renders parsed plan milestones into the markdown PRD layout expected by
//! the CCPM issue pipeline: a title, an overview, then one section per
//! milestone with a block of checklists per issue.

mod render;

pub use render::{render_prd, render_prd_with, RenderOptions, DEFAULT_LABELS};

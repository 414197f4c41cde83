//! prdgen Core - Convert TDD implementation plans into PRDs
//!
//! A plan is parsed into [`Milestone`]s and [`Issue`]s, rendered as a
//! checklist-based PRD, and written through a [`PrdSink`].

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod plan;
pub mod prd;

pub use config::{Config, OutputConfig};
pub use convert::{convert, convert_file, ConversionSummary, MilestoneSummary};
pub use error::{Error, Result};
pub use output::{DirectorySink, MemorySink, PrdSink};
pub use plan::{parse_plan, to_json, total_issues, Issue, Milestone, Section};
pub use prd::{render_prd, render_prd_with, RenderOptions};

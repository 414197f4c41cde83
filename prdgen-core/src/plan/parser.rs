//! TDD plan parser

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::model::{Issue, Milestone};
use crate::{Error, Result};

/// The part of the plan the parser is currently collecting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Section {
    /// Nothing is being collected
    #[default]
    None,
    /// Free-text lines following an issue header
    Description,
    /// `- Red:` checklist
    Red,
    /// `- Green:` checklist
    Green,
    /// `- Refactor:` checklist
    Refactor,
    /// Milestone `**Properties to validate**:` or issue `- Properties:` list
    Properties,
    /// `- Dependencies:` list
    Dependencies,
}

impl Section {
    /// Detect an issue sub-section header such as `  - Red:`
    ///
    /// Sub-section headers must be indented by at least one whitespace character.
    pub fn from_sub_header(line: &str) -> Option<Section> {
        let caps = patterns().sub_header.captures(line)?;
        match &caps[1] {
            "Red" => Some(Section::Red),
            "Green" => Some(Section::Green),
            "Refactor" => Some(Section::Refactor),
            "Properties" => Some(Section::Properties),
            "Dependencies" => Some(Section::Dependencies),
            _ => None,
        }
    }
}

struct Patterns {
    milestone_prefix: Regex,
    milestone: Regex,
    issue_prefix: Regex,
    issue: Regex,
    milestone_property: Regex,
    sub_header: Regex,
    bullet: Regex,
    issue_property: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let re = |pattern: &str| Regex::new(pattern).expect("plan pattern is valid");
        Patterns {
            // Ids are ASCII digits only
            milestone_prefix: re(r"^### Milestone [0-9]+:"),
            milestone: re(r"^### Milestone ([0-9]+): (.+?) \((.+?)\)"),
            issue_prefix: re(r"^- Issue [0-9]+\.[0-9]+:"),
            issue: re(r"^- Issue ([0-9]+)\.([0-9]+): (.+?) \((.+?)\)"),
            milestone_property: re(r"^- Property [0-9]+:"),
            sub_header: re(r"^\s+- (Red|Green|Refactor|Properties|Dependencies):"),
            bullet: re(r"^\s+- "),
            issue_property: re(r"^\s+- Property"),
        }
    })
}

/// Parse a TDD plan into its milestones
///
/// Header lines must match their full shape; everything else is best-effort
/// and unrecognized lines are skipped.
pub fn parse_plan(content: &str) -> Result<Vec<Milestone>> {
    let state = content
        .lines()
        .enumerate()
        .try_fold(ParseState::default(), |state, (index, line)| {
            state.step(index + 1, line)
        })?;

    Ok(state.finish())
}

/// Scan state threaded through the fold over plan lines
#[derive(Debug, Default)]
struct ParseState {
    milestones: Vec<Milestone>,
    milestone: Option<Milestone>,
    issue: Option<Issue>,
    section: Section,
}

impl ParseState {
    fn step(mut self, line_no: usize, line: &str) -> Result<Self> {
        let patterns = patterns();

        // Milestone header: ### Milestone N: Name (duration)
        if patterns.milestone_prefix.is_match(line) {
            let milestone = parse_milestone_header(line_no, line)?;
            self.close_milestone();
            debug!(number = milestone.number, name = %milestone.name, "Opened milestone");
            self.milestone = Some(milestone);
            self.section = Section::None;
            return Ok(self);
        }

        if let Some(goal) = line.strip_prefix("**Goal**:") {
            if let Some(ref mut milestone) = self.milestone {
                milestone.goal = goal.trim_start().to_string();
            }
            return Ok(self);
        }

        if line.starts_with("**Properties to validate**:") {
            self.section = Section::Properties;
            return Ok(self);
        }

        // Milestone-level property, only while no issue is open
        if self.section == Section::Properties
            && self.issue.is_none()
            && patterns.milestone_property.is_match(line)
        {
            if let Some(ref mut milestone) = self.milestone {
                let property = line.strip_prefix("- ").unwrap_or(line);
                milestone.properties.push(property.to_string());
            }
            return Ok(self);
        }

        // Issue header: - Issue M.N: Title (estimate)
        if patterns.issue_prefix.is_match(line) {
            if self.milestone.is_none() {
                return Err(Error::OrphanIssue {
                    line: line_no,
                    text: line.to_string(),
                });
            }
            let issue = parse_issue_header(line_no, line)?;
            self.close_issue();
            debug!(id = %issue.id(), title = %issue.title, "Opened issue");
            self.issue = Some(issue);
            self.section = Section::Description;
            return Ok(self);
        }

        let Some(ref mut issue) = self.issue else {
            return Ok(self);
        };

        if let Some(section) = Section::from_sub_header(line) {
            self.section = section;
            return Ok(self);
        }

        match self.section {
            Section::Description => {
                let text = line.trim();
                if !text.is_empty() {
                    issue.description.push_str(text);
                    issue.description.push(' ');
                }
            }
            Section::Red => push_bullet(&mut issue.red, line),
            Section::Green => push_bullet(&mut issue.green, line),
            Section::Refactor => push_bullet(&mut issue.refactor, line),
            Section::Dependencies => push_bullet(&mut issue.dependencies, line),
            Section::Properties => {
                if patterns.issue_property.is_match(line) {
                    issue.related_properties.push(bullet_text(line));
                }
            }
            Section::None => {}
        }

        Ok(self)
    }

    /// Move the open issue into the open milestone
    fn close_issue(&mut self) {
        if let Some(mut issue) = self.issue.take() {
            issue.description = issue.description.trim().to_string();
            if let Some(ref mut milestone) = self.milestone {
                milestone.issues.push(issue);
            }
        }
    }

    /// Close the open issue, then move the open milestone into the output
    fn close_milestone(&mut self) {
        self.close_issue();
        if let Some(milestone) = self.milestone.take() {
            debug!(
                number = milestone.number,
                issues = milestone.issues.len(),
                "Closed milestone"
            );
            self.milestones.push(milestone);
        }
    }

    fn finish(mut self) -> Vec<Milestone> {
        self.close_milestone();
        self.milestones
    }
}

fn malformed(line_no: usize, line: &str) -> Error {
    Error::MalformedHeader {
        line: line_no,
        text: line.to_string(),
    }
}

fn parse_milestone_header(line_no: usize, line: &str) -> Result<Milestone> {
    let caps = patterns()
        .milestone
        .captures(line)
        .ok_or_else(|| malformed(line_no, line))?;
    let number = caps[1].parse().map_err(|_| malformed(line_no, line))?;

    Ok(Milestone::new(number, &caps[2], &caps[3]))
}

fn parse_issue_header(line_no: usize, line: &str) -> Result<Issue> {
    let caps = patterns()
        .issue
        .captures(line)
        .ok_or_else(|| malformed(line_no, line))?;
    let milestone_number = caps[1].parse().map_err(|_| malformed(line_no, line))?;
    let issue_number = caps[2].parse().map_err(|_| malformed(line_no, line))?;

    Ok(Issue::new(milestone_number, issue_number, &caps[3], &caps[4]))
}

/// Append an indented bullet's text to a checklist, ignoring other lines
fn push_bullet(items: &mut Vec<String>, line: &str) {
    if patterns().bullet.is_match(line) {
        items.push(bullet_text(line));
    }
}

fn bullet_text(line: &str) -> String {
    let text = line.trim();
    text.strip_prefix("- ").unwrap_or(text).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_PLAN: &str = r#"# Shop Implementation Plan

## Milestones

### Milestone 1: Catalog Foundation (2 weeks)
**Goal**: Products can be listed and searched

**Properties to validate**:
- Property 1: Every product has a unique SKU
- Property 2: Prices are never negative

- Issue 1.1: Product entity (4h)
  Define the product aggregate.
  It owns price and SKU.
  - Red:
    - Write failing test for SKU uniqueness
    - Write failing test for negative price
  - Green:
    - Add Product entity
  - Refactor:
    - Extract Money value object
  - Properties:
    - Property 1: Every product has a unique SKU
  - Dependencies:
    - None

- Issue 1.2: Product search (1d)
  Search by name.
  - Red:
    - Write failing search test
  - Green:
    - Implement LIKE query

### Milestone 2: Cart (1 week)
**Goal**:   Customers can hold items

- Issue 2.1: Add to cart (3h)
  - Red:
    - Write failing add test
  - Dependencies:
    - Issue 1.1

### Milestone 3: Payments (3 days)
"#;

    #[test]
    fn test_parse_milestones() {
        let milestones = parse_plan(SAMPLE_PLAN).unwrap();
        assert_eq!(milestones.len(), 3);
        assert_eq!(milestones[0].number, 1);
        assert_eq!(milestones[0].name, "Catalog Foundation");
        assert_eq!(milestones[0].duration, "2 weeks");
        assert_eq!(milestones[1].number, 2);
        assert_eq!(milestones[1].name, "Cart");
        assert_eq!(milestones[2].name, "Payments");
    }

    #[test]
    fn test_issue_counts_preserve_order() {
        let milestones = parse_plan(SAMPLE_PLAN).unwrap();
        let counts: Vec<usize> = milestones.iter().map(|m| m.issues.len()).collect();
        assert_eq!(counts, vec![2, 1, 0]);

        let ids: Vec<String> = milestones
            .iter()
            .flat_map(|m| m.issues.iter().map(Issue::id))
            .collect();
        assert_eq!(ids, vec!["1.1", "1.2", "2.1"]);
    }

    #[test]
    fn test_parse_goal() {
        let milestones = parse_plan(SAMPLE_PLAN).unwrap();
        assert_eq!(milestones[0].goal, "Products can be listed and searched");
        // Leading whitespace after the label is dropped
        assert_eq!(milestones[1].goal, "Customers can hold items");
        assert_eq!(milestones[2].goal, "");
    }

    #[test]
    fn test_parse_milestone_properties() {
        let milestones = parse_plan(SAMPLE_PLAN).unwrap();
        assert_eq!(
            milestones[0].properties,
            vec![
                "Property 1: Every product has a unique SKU",
                "Property 2: Prices are never negative",
            ]
        );
        assert!(milestones[1].properties.is_empty());
    }

    #[test]
    fn test_parse_issue_header() {
        let milestones = parse_plan(SAMPLE_PLAN).unwrap();
        let issue = &milestones[0].issues[0];
        assert_eq!(issue.milestone_number, 1);
        assert_eq!(issue.issue_number, 1);
        assert_eq!(issue.title, "Product entity");
        assert_eq!(issue.estimate, "4h");
    }

    #[test]
    fn test_parse_description() {
        let milestones = parse_plan(SAMPLE_PLAN).unwrap();
        assert_eq!(
            milestones[0].issues[0].description,
            "Define the product aggregate. It owns price and SKU."
        );
        assert_eq!(milestones[1].issues[0].description, "");
    }

    #[test]
    fn test_parse_phases() {
        let milestones = parse_plan(SAMPLE_PLAN).unwrap();
        let issue = &milestones[0].issues[0];
        assert_eq!(
            issue.red,
            vec![
                "Write failing test for SKU uniqueness",
                "Write failing test for negative price",
            ]
        );
        assert_eq!(issue.green, vec!["Add Product entity"]);
        assert_eq!(issue.refactor, vec!["Extract Money value object"]);
    }

    #[test]
    fn test_parse_issue_properties_and_dependencies() {
        let milestones = parse_plan(SAMPLE_PLAN).unwrap();
        let issue = &milestones[0].issues[0];
        assert_eq!(
            issue.related_properties,
            vec!["Property 1: Every product has a unique SKU"]
        );
        assert_eq!(issue.dependencies, vec!["None"]);

        let search = &milestones[0].issues[1];
        assert!(search.related_properties.is_empty());
        assert!(search.dependencies.is_empty());
        assert!(search.refactor.is_empty());

        assert_eq!(milestones[1].issues[0].dependencies, vec!["Issue 1.1"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_plan("").unwrap().is_empty());
        assert!(parse_plan("# Just a title\n\nSome prose.\n").unwrap().is_empty());
    }

    #[test]
    fn test_scenario_single_milestone() {
        let plan = "### Milestone 1: Setup (1 week)\n\
                    **Goal**: Bootstrap the project\n\
                    - Issue 1.1: Init repo (2h)\n  \
                      - Red:\n    \
                        - write failing test\n  \
                      - Green:\n    \
                        - make it pass\n";
        let milestones = parse_plan(plan).unwrap();
        assert_eq!(milestones.len(), 1);
        let issue = &milestones[0].issues[0];
        assert_eq!(issue.title, "Init repo");
        assert_eq!(issue.estimate, "2h");
        assert_eq!(issue.red, vec!["write failing test"]);
        assert_eq!(issue.green, vec!["make it pass"]);
        assert!(issue.refactor.is_empty());
        assert!(issue.related_properties.is_empty());
        assert!(issue.dependencies.is_empty());
    }

    #[test]
    fn test_malformed_milestone_header() {
        let plan = "# Plan\n\n### Milestone 1: Setup without duration\n";
        match parse_plan(plan) {
            Err(Error::MalformedHeader { line, text }) => {
                assert_eq!(line, 3);
                assert_eq!(text, "### Milestone 1: Setup without duration");
            }
            other => panic!("expected MalformedHeader, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_issue_header() {
        let plan = "### Milestone 1: Setup (1 week)\n- Issue 1.1: No estimate\n";
        let err = parse_plan(plan).unwrap_err();
        assert!(matches!(err, Error::MalformedHeader { line: 2, .. }));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_number_overflow_is_malformed() {
        let plan = "### Milestone 99999999999999999999999: Huge (1 week)\n";
        assert!(matches!(
            parse_plan(plan),
            Err(Error::MalformedHeader { line: 1, .. })
        ));
    }

    #[test]
    fn test_orphan_issue() {
        let plan = "- Issue 1.1: Lost (1h)\n";
        assert!(matches!(
            parse_plan(plan),
            Err(Error::OrphanIssue { line: 1, .. })
        ));
    }

    #[test]
    fn test_lookalike_lines_are_not_headers() {
        // Missing the "N:" part, so not treated as a header at all
        let plan = "### Milestone overview\n- Issue tracker notes\n";
        assert!(parse_plan(plan).unwrap().is_empty());
    }

    #[test]
    fn test_non_ascii_digit_headers_are_ignored() {
        let plan = "### Milestone \u{0663}: Arabic (1 week)\n\
                    ### Milestone 1: Setup (1 week)\n\
                    - Issue 1.\u{0662}: Lookalike (1h)\n\
                    **Properties to validate**:\n\
                    - Property \u{0661}: Lookalike property\n";
        let milestones = parse_plan(plan).unwrap();
        assert_eq!(milestones.len(), 1);
        assert_eq!(milestones[0].name, "Setup");
        assert!(milestones[0].issues.is_empty());
        assert!(milestones[0].properties.is_empty());
    }

    #[test]
    fn test_leading_zeros_are_normalized() {
        let plan = "### Milestone 01: Setup (1 week)\n- Issue 01.02: Init (1h)\n";
        let milestones = parse_plan(plan).unwrap();
        assert_eq!(milestones[0].number, 1);
        assert_eq!(milestones[0].issues[0].id(), "1.2");
    }

    #[test]
    fn test_header_trailing_text_is_ignored() {
        let plan = "### Milestone 4: Orders (v2) (2 weeks) extra\n";
        let milestones = parse_plan(plan).unwrap();
        // Lazy captures stop at the first parenthesized group
        assert_eq!(milestones[0].name, "Orders");
        assert_eq!(milestones[0].duration, "v2");
    }

    #[test]
    fn test_goal_without_milestone_is_ignored() {
        let plan = "**Goal**: orphan goal\n### Milestone 1: Setup (1 week)\n";
        let milestones = parse_plan(plan).unwrap();
        assert_eq!(milestones[0].goal, "");
    }

    #[test]
    fn test_unindented_bullets_ignored_in_phases() {
        let plan = "### Milestone 1: Setup (1 week)\n\
                    - Issue 1.1: Init (1h)\n  \
                      - Red:\n\
                    - not indented\n    \
                        - indented\n";
        let milestones = parse_plan(plan).unwrap();
        assert_eq!(milestones[0].issues[0].red, vec!["indented"]);
    }

    #[test]
    fn test_milestone_properties_header_with_open_issue() {
        // Once an issue is open, properties go to the issue, and unindented
        // milestone-style bullets are dropped
        let plan = "### Milestone 1: Setup (1 week)\n\
                    - Issue 1.1: Init (1h)\n\
                    **Properties to validate**:\n\
                    - Property 1: dropped\n  \
                      - Property 2: kept on issue\n";
        let milestones = parse_plan(plan).unwrap();
        assert!(milestones[0].properties.is_empty());
        assert_eq!(
            milestones[0].issues[0].related_properties,
            vec!["Property 2: kept on issue"]
        );
    }

    #[test]
    fn test_issue_properties_require_property_prefix() {
        let plan = "### Milestone 1: Setup (1 week)\n\
                    - Issue 1.1: Init (1h)\n  \
                      - Properties:\n    \
                        - Something else\n    \
                        - Property 3: idempotent\n";
        let milestones = parse_plan(plan).unwrap();
        assert_eq!(
            milestones[0].issues[0].related_properties,
            vec!["Property 3: idempotent"]
        );
    }

    #[test]
    fn test_section_from_sub_header() {
        assert_eq!(Section::from_sub_header("  - Red:"), Some(Section::Red));
        assert_eq!(Section::from_sub_header("\t- Green:"), Some(Section::Green));
        assert_eq!(
            Section::from_sub_header("    - Refactor: tidy"),
            Some(Section::Refactor)
        );
        assert_eq!(
            Section::from_sub_header("  - Properties:"),
            Some(Section::Properties)
        );
        assert_eq!(
            Section::from_sub_header("  - Dependencies:"),
            Some(Section::Dependencies)
        );
        // Must be indented
        assert_eq!(Section::from_sub_header("- Red:"), None);
        assert_eq!(Section::from_sub_header("  - Blue:"), None);
    }

    #[test]
    fn test_crlf_line_endings() {
        let plan = "### Milestone 1: Setup (1 week)\r\n- Issue 1.1: Init (1h)\r\n  - Red:\r\n    - fail\r\n";
        let milestones = parse_plan(plan).unwrap();
        assert_eq!(milestones[0].issues[0].red, vec!["fail"]);
    }
}

//! Permission file parser
//!
//! Converts the line-oriented group format into a [`GroupMap`]:
//!
//! ```text
//! >> VIP > vip+special
//! Alice
//! Bob
//! // comments are ignored
//! >> STAFF > staff
//! Carol
//! ```
//!
//! Parsing never fails. Lines that cannot be interpreted are skipped or given a
//! degraded reading, and each such decision is recorded as a [`ParseWarning`]
//! in the [`ParseReport`] returned by [`parse_with_report`].

use crate::model::{Group, GroupMap};
use std::fmt;
use tracing::{debug, trace, warn};

/// Marker that starts a group header line
pub const HEADER_MARKER: &str = ">>";

/// Marker that starts a comment line
pub const COMMENT_MARKER: &str = "//";

/// Separates the group name from its permission clause
pub const NAME_SEPARATOR: char = '>';

/// Separates permission tokens within the clause
pub const PERMISSION_DELIMITER: char = '+';

/// A lenient parsing decision, tied to a 1-based input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    pub line: usize,
    pub kind: ParseWarningKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarningKind {
    /// Header without a `>` separator; the group has no permissions
    MissingSeparator { group: String },
    /// Header with more than one `>`; segments after the clause are ignored
    ExtraSeparator { group: String },
    /// Header with a blank name; the header and its member lines are skipped
    EmptyGroupName,
    /// Header that redefines an earlier group; the later definition wins
    DuplicateGroup { group: String },
    /// Member line before any header
    OrphanMember { player: String },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: ", self.line)?;
        match &self.kind {
            ParseWarningKind::MissingSeparator { group } => write!(
                f,
                "header for '{}' has no '{}' separator, group has no permissions",
                group, NAME_SEPARATOR
            ),
            ParseWarningKind::ExtraSeparator { group } => write!(
                f,
                "header for '{}' has extra '{}' separators, trailing segments ignored",
                group, NAME_SEPARATOR
            ),
            ParseWarningKind::EmptyGroupName => {
                write!(f, "header has an empty group name, group skipped")
            }
            ParseWarningKind::DuplicateGroup { group } => {
                write!(f, "group '{}' redefined, earlier definition replaced", group)
            }
            ParseWarningKind::OrphanMember { player } => {
                write!(f, "member '{}' appears before any group header", player)
            }
        }
    }
}

/// Parsed groups together with the warnings raised while reading them
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    pub groups: GroupMap,
    pub warnings: Vec<ParseWarning>,
}

impl ParseReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Parse permission file text into groups, discarding diagnostics
pub fn parse(text: &str) -> GroupMap {
    parse_with_report(text).groups
}

/// Parse permission file text into groups, keeping diagnostics
pub fn parse_with_report(text: &str) -> ParseReport {
    let mut report = ParseReport::default();
    // Name of the group that member lines attach to
    let mut current: Option<String> = None;

    for (index, raw) in text.split('\n').enumerate() {
        let line_no = index + 1;
        // Trimming also strips the '\r' left behind by CRLF input
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix(HEADER_MARKER) {
            current = read_header(header, line_no, &mut report);
            continue;
        }

        if line.starts_with(COMMENT_MARKER) {
            trace!(line = line_no, "Skipping comment");
            continue;
        }

        match current.as_deref().and_then(|name| report.groups.get_mut(name)) {
            Some(group) => {
                trace!(line = line_no, group = %group.name, player = line, "Adding member");
                group.players.push(line.to_string());
            }
            None => record(
                &mut report,
                line_no,
                ParseWarningKind::OrphanMember {
                    player: line.to_string(),
                },
            ),
        }
    }

    debug!(
        groups = report.groups.len(),
        warnings = report.warnings.len(),
        "Parsed permission data"
    );

    report
}

/// Read a header (marker already stripped), insert its group, and return the
/// name of the group that following member lines belong to.
fn read_header(header: &str, line_no: usize, report: &mut ParseReport) -> Option<String> {
    let mut segments = header.split(NAME_SEPARATOR);
    let name = segments.next().unwrap_or_default().trim();
    let clause = segments.next();
    let has_extra = segments.next().is_some();

    if name.is_empty() {
        record(report, line_no, ParseWarningKind::EmptyGroupName);
        return None;
    }

    let permissions = match clause {
        Some(clause) => split_permissions(clause),
        None => {
            record(
                report,
                line_no,
                ParseWarningKind::MissingSeparator {
                    group: name.to_string(),
                },
            );
            Vec::new()
        }
    };

    if has_extra {
        record(
            report,
            line_no,
            ParseWarningKind::ExtraSeparator {
                group: name.to_string(),
            },
        );
    }

    if report.groups.contains_key(name) {
        record(
            report,
            line_no,
            ParseWarningKind::DuplicateGroup {
                group: name.to_string(),
            },
        );
    }

    trace!(line = line_no, group = name, permissions = ?permissions, "Read group header");
    report
        .groups
        .insert(name.to_string(), Group::new(name, permissions));

    Some(name.to_string())
}

/// Split a permission clause on `+`, trimming tokens and dropping empty ones
pub fn split_permissions(clause: &str) -> Vec<String> {
    clause
        .split(PERMISSION_DELIMITER)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

fn record(report: &mut ParseReport, line: usize, kind: ParseWarningKind) {
    let warning = ParseWarning { line, kind };
    warn!(line, "{}", warning);
    report.warnings.push(warning);
}

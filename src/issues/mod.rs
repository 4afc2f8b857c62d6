//! Security findings attached to open documents.
//!
//! [`SecurityIssueProvider`] owns the findings reported for each file and
//! keeps their line ranges in step with edits made to the document after
//! the scan ran.

pub mod diff;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use diff::offset_hunk_headers;

/// Zero-based line/column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
        Self {
            start: Position::new(start_line, start_col),
            end: Position::new(end_line, end_col),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentChange {
    pub range: Range,
    pub text: String,
}

impl ContentChange {
    pub fn new(range: Range, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    /// Lines in the document after the change minus lines before it.
    pub fn line_offset(&self) -> isize {
        let replaced = self.range.end.line.saturating_sub(self.range.start.line) + 1;
        let inserted = self.text.matches('\n').count() + 1;
        inserted as isize - replaced as isize
    }

    fn touches(&self, issue: &SecurityIssue) -> bool {
        self.range.start.line <= issue.end_line && issue.start_line <= self.range.end.line
    }

    /// Deletions and edits that type non-whitespace can change what a finding
    /// points at. Whitespace-only insertions cannot.
    fn may_invalidate(&self) -> bool {
        self.text.is_empty() || self.text.chars().any(|c| !c.is_whitespace())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentChangeEvent {
    pub file_path: PathBuf,
    pub content_changes: Vec<ContentChange>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub text: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedFix {
    #[serde(default)]
    pub description: String,
    /// Unified diff.
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityIssue {
    pub finding_id: String,
    pub start_line: usize,
    pub end_line: usize,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub detector_id: String,
    #[serde(default)]
    pub detector_name: String,
    #[serde(default)]
    pub rule_id: Option<String>,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub related_vulnerabilities: Vec<String>,
    #[serde(default)]
    pub recommendation: Recommendation,
    #[serde(default)]
    pub suggested_fixes: Vec<SuggestedFix>,
}

impl SecurityIssue {
    fn shift(&mut self, line_offset: isize) {
        if line_offset == 0 {
            return;
        }
        self.start_line = self.start_line.saturating_add_signed(line_offset);
        self.end_line = self.end_line.saturating_add_signed(line_offset);
        for fix in &mut self.suggested_fixes {
            if let Some(code) = &fix.code {
                fix.code = Some(offset_hunk_headers(code, line_offset));
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileIssues {
    pub file_path: PathBuf,
    pub issues: Vec<SecurityIssue>,
}

#[derive(Debug, Clone, Default)]
pub struct SecurityIssueProvider {
    issues: Vec<FileIssues>,
    scans_enabled: bool,
}

impl SecurityIssueProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issues(&self) -> &[FileIssues] {
        &self.issues
    }

    pub fn issues_for(&self, file_path: &Path) -> Option<&[SecurityIssue]> {
        self.issues
            .iter()
            .find(|group| group.file_path == file_path)
            .map(|group| group.issues.as_slice())
    }

    pub fn set_issues(&mut self, issues: Vec<FileIssues>) {
        self.issues = issues;
        self.drop_empty_groups();
    }

    /// While scans run automatically, edited findings are left for the next
    /// scan to confirm instead of being discarded.
    pub fn set_scans_enabled(&mut self, enabled: bool) {
        self.scans_enabled = enabled;
    }

    pub fn scans_enabled(&self) -> bool {
        self.scans_enabled
    }

    pub fn handle_document_change(&mut self, event: &DocumentChangeEvent) {
        if event.content_changes.is_empty() {
            return;
        }

        let scans_enabled = self.scans_enabled;
        let Some(group) = self
            .issues
            .iter_mut()
            .find(|group| group.file_path == event.file_path)
        else {
            return;
        };

        for change in &event.content_changes {
            if !scans_enabled && change.may_invalidate() {
                group.issues.retain(|issue| {
                    let keep = !change.touches(issue);
                    if !keep {
                        tracing::debug!(
                            finding_id = %issue.finding_id,
                            file = %event.file_path.display(),
                            "dropping issue invalidated by edit"
                        );
                    }
                    keep
                });
            }

            let line_offset = change.line_offset();
            for issue in &mut group.issues {
                if issue.start_line >= change.range.end.line {
                    issue.shift(line_offset);
                }
            }
        }

        self.drop_empty_groups();
    }

    /// Replaces the stored issue with the same finding id.
    pub fn update_issue(&mut self, file_path: &Path, issue: SecurityIssue) {
        let existing = self
            .issues
            .iter_mut()
            .filter(|group| group.file_path == file_path)
            .flat_map(|group| group.issues.iter_mut())
            .find(|existing| existing.finding_id == issue.finding_id);

        if let Some(existing) = existing {
            *existing = issue;
        }
    }

    pub fn remove_issue(&mut self, file_path: &Path, issue: &SecurityIssue) {
        for group in self
            .issues
            .iter_mut()
            .filter(|group| group.file_path == file_path)
        {
            group.issues.retain(|i| i.finding_id != issue.finding_id);
        }
        self.drop_empty_groups();
    }

    fn drop_empty_groups(&mut self) {
        self.issues.retain(|group| !group.issues.is_empty());
    }
}

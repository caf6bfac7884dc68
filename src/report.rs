//! Validation findings and the per-package report.
//!
//! Every check outcome is a typed [`Finding`]; the validator accumulates
//! them into a [`ValidationReport`] and never prints or aborts on content
//! problems. Only the CLI layer turns a report into exit codes and output.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Whether a finding blocks acceptance of the package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks acceptance; forces a non-zero exit.
    Hard,
    /// Advisory only; never affects the exit code.
    Soft,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Hard => write!(f, "ERROR"),
            Severity::Soft => write!(f, "WARNING"),
        }
    }
}

/// Finding codes. Each code carries a fixed severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Code {
    MissingManifest,
    InvalidFrontMatter,
    MissingRequiredField,
    InvalidName,
    NameTooLong,
    DescriptionTooLong,
    NonUnixPath,
    NamingConventionWarning,
    DescriptionTooShort,
    ManifestTooLong,
    DanglingReference,
}

impl Code {
    pub fn severity(self) -> Severity {
        match self {
            Code::MissingManifest
            | Code::InvalidFrontMatter
            | Code::MissingRequiredField
            | Code::InvalidName
            | Code::NameTooLong
            | Code::DescriptionTooLong
            | Code::NonUnixPath => Severity::Hard,
            Code::NamingConventionWarning
            | Code::DescriptionTooShort
            | Code::ManifestTooLong
            | Code::DanglingReference => Severity::Soft,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Code::MissingManifest => "MissingManifest",
            Code::InvalidFrontMatter => "InvalidFrontMatter",
            Code::MissingRequiredField => "MissingRequiredField",
            Code::InvalidName => "InvalidName",
            Code::NameTooLong => "NameTooLong",
            Code::DescriptionTooLong => "DescriptionTooLong",
            Code::NonUnixPath => "NonUnixPath",
            Code::NamingConventionWarning => "NamingConventionWarning",
            Code::DescriptionTooShort => "DescriptionTooShort",
            Code::ManifestTooLong => "ManifestTooLong",
            Code::DanglingReference => "DanglingReference",
        }
    }
}

/// A single check outcome.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub code: Code,
    pub message: String,
    /// Package-relative location, e.g. `SKILL.md` or `SKILL.md:42`.
    pub location: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} — {} ({})",
            self.severity,
            self.code.as_str(),
            self.message,
            self.location
        )
    }
}

/// Accumulated findings for one package.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub package: PathBuf,
    pub findings: Vec<Finding>,
    /// Checks that succeeded, shown in verbose output only.
    pub passes: Vec<String>,
}

impl ValidationReport {
    pub fn new(package: &Path) -> Self {
        ValidationReport {
            package: package.to_path_buf(),
            findings: Vec::new(),
            passes: Vec::new(),
        }
    }

    /// Record a finding; severity follows from the code.
    pub fn record(&mut self, code: Code, message: impl Into<String>, location: impl Into<String>) {
        self.findings.push(Finding {
            severity: code.severity(),
            code,
            message: message.into(),
            location: location.into(),
        });
    }

    /// Record a passed check.
    pub fn pass(&mut self, check: impl Into<String>) {
        self.passes.push(check.into());
    }

    pub fn hard_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Hard)
            .count()
    }

    pub fn soft_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Soft)
            .count()
    }

    /// True when the package has no hard failures.
    pub fn accepted(&self) -> bool {
        self.hard_count() == 0
    }

    pub fn has_code(&self, code: Code) -> bool {
        self.findings.iter().any(|f| f.code == code)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} hard failures, {} warnings",
            self.hard_count(),
            self.soft_count()
        )
    }

    /// Render the report as text: one finding per line, then the summary.
    /// With `verbose`, passed checks are listed first.
    pub fn render_text(&self, verbose: bool) -> String {
        let mut lines = Vec::new();
        if verbose {
            for check in &self.passes {
                lines.push(format!("ok: {check}"));
            }
        }
        for finding in &self.findings {
            lines.push(finding.to_string());
        }
        lines.push(self.summary());
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finding_line_format() {
        let finding = Finding {
            severity: Severity::Hard,
            code: Code::InvalidName,
            message: "name 'My_Skill' may only contain lowercase letters, digits, and hyphens"
                .into(),
            location: "SKILL.md".into(),
        };
        assert_eq!(
            finding.to_string(),
            "ERROR: InvalidName — name 'My_Skill' may only contain lowercase letters, digits, and hyphens (SKILL.md)"
        );
    }

    #[test]
    fn test_severity_follows_code() {
        let mut report = ValidationReport::new(Path::new("./pkg"));
        report.record(Code::MissingManifest, "SKILL.md not found", "./pkg");
        report.record(Code::DanglingReference, "missing", "SKILL.md:3");
        assert_eq!(report.hard_count(), 1);
        assert_eq!(report.soft_count(), 1);
        assert!(!report.accepted());
        assert_eq!(report.summary(), "1 hard failures, 1 warnings");
    }

    #[test]
    fn test_render_text_verbose_lists_passes() {
        let mut report = ValidationReport::new(Path::new("./pkg"));
        report.pass("SKILL.md present");
        let quiet = report.render_text(false);
        assert!(!quiet.contains("SKILL.md present"));
        let verbose = report.render_text(true);
        assert!(verbose.starts_with("ok: SKILL.md present"));
        assert!(verbose.ends_with("0 hard failures, 0 warnings"));
    }
}

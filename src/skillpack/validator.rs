//! Skill package validation.
//!
//! Single-pass, read-only scan of one package directory. Content
//! problems accumulate as findings so the report is always complete;
//! only environment failures (missing path, unreadable manifest) abort.

use crate::config::Config;
use crate::report::{Code, ValidationReport};
use crate::skillpack::parser::{parse_manifest, ParsedManifest};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

/// Subdirectories a package may carry alongside SKILL.md
const OPTIONAL_DIRS: [&str; 3] = ["references", "scripts", "assets"];

/// Inline Markdown links: `[text](target)`, target captured up to the
/// first whitespace so titles (`[x](a.md "title")`) are ignored.
static MD_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\]]*\]\(([^()\s]+)[^()]*\)").unwrap());

/// Failures of the environment rather than the package content.
/// These abort without a report and map to exit code 2.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("path does not exist: {0}")]
    NotFound(String),
    #[error("not a directory: {0}")]
    NotADirectory(String),
    #[error("cannot read {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Validate one skill package directory.
pub fn validate(path: &Path, config: &Config) -> Result<ValidationReport, EnvError> {
    if !path.exists() {
        return Err(EnvError::NotFound(path.display().to_string()));
    }
    if !path.is_dir() {
        return Err(EnvError::NotADirectory(path.display().to_string()));
    }

    tracing::debug!(package = %path.display(), "validating skill package");
    let mut report = ValidationReport::new(path);

    let manifest = path.join("SKILL.md");
    if manifest.is_file() {
        report.pass("SKILL.md present");
        let content =
            std::fs::read_to_string(&manifest).map_err(|source| EnvError::Unreadable {
                path: manifest.display().to_string(),
                source,
            })?;
        check_front_matter(&content, config, &mut report);
        check_links(&content, path, &mut report);
    } else {
        // skill.md (lowercase) is a common misspelling worth naming
        let message = if path.join("skill.md").is_file() {
            "SKILL.md not found (a lowercase skill.md exists; the manifest name is case-sensitive)"
        } else {
            "SKILL.md not found"
        };
        report.record(Code::MissingManifest, message, path.display().to_string());
    }

    enumerate_subdirs(path, &mut report);

    Ok(report)
}

fn check_front_matter(content: &str, config: &Config, report: &mut ValidationReport) {
    let (frontmatter, body) = match parse_manifest(content) {
        ParsedManifest::Parsed { frontmatter, body } => {
            report.pass("front matter parses");
            (frontmatter, body)
        }
        ParsedManifest::MissingOpenDelimiter => {
            report.record(
                Code::InvalidFrontMatter,
                "manifest does not start with a --- front matter block",
                "SKILL.md",
            );
            return;
        }
        ParsedManifest::MissingCloseDelimiter => {
            report.record(
                Code::InvalidFrontMatter,
                "front matter opening --- is never closed",
                "SKILL.md",
            );
            return;
        }
        ParsedManifest::InvalidYaml(err) => {
            report.record(
                Code::InvalidFrontMatter,
                format!("front matter is not a valid YAML mapping: {err}"),
                "SKILL.md",
            );
            return;
        }
    };

    match frontmatter.name.as_deref() {
        Some(name) if !name.is_empty() => check_name(name, config, report),
        Some(_) => report.record(
            Code::MissingRequiredField,
            "front matter field 'name' is empty",
            "SKILL.md",
        ),
        None => report.record(
            Code::MissingRequiredField,
            "front matter is missing the 'name' field",
            "SKILL.md",
        ),
    }

    match frontmatter.description.as_deref() {
        Some(description) if !description.is_empty() => {
            check_description(description, config, report)
        }
        Some(_) => report.record(
            Code::MissingRequiredField,
            "front matter field 'description' is empty",
            "SKILL.md",
        ),
        None => report.record(
            Code::MissingRequiredField,
            "front matter is missing the 'description' field",
            "SKILL.md",
        ),
    }

    let body_lines = body.lines().count();
    if body_lines > config.limits.manifest_max_lines {
        report.record(
            Code::ManifestTooLong,
            format!(
                "manifest body is {body_lines} lines (recommended limit {})",
                config.limits.manifest_max_lines
            ),
            "SKILL.md",
        );
    }
}

fn check_name(name: &str, config: &Config, report: &mut ValidationReport) {
    let mut valid = true;

    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        report.record(
            Code::InvalidName,
            format!("name '{name}' may only contain lowercase letters, digits, and hyphens"),
            "SKILL.md",
        );
        valid = false;
    }

    if name.starts_with('-') || name.ends_with('-') {
        report.record(
            Code::InvalidName,
            format!("name '{name}' must not start or end with a hyphen"),
            "SKILL.md",
        );
        valid = false;
    }

    let name_len = name.chars().count();
    if name_len > config.limits.name_max {
        report.record(
            Code::NameTooLong,
            format!(
                "name is {name_len} characters (limit {})",
                config.limits.name_max
            ),
            "SKILL.md",
        );
        valid = false;
    }

    if name.contains("--") {
        report.record(
            Code::NamingConventionWarning,
            format!("name '{name}' contains consecutive hyphens"),
            "SKILL.md",
        );
    }

    let lowered = name.to_ascii_lowercase();
    if let Some(term) = config
        .naming
        .vague_terms
        .iter()
        .find(|term| lowered.contains(term.as_str()))
    {
        report.record(
            Code::NamingConventionWarning,
            format!("name '{name}' uses the vague term '{term}'"),
            "SKILL.md",
        );
    }

    if valid {
        report.pass(format!("name '{name}' ok"));
    }
}

fn check_description(description: &str, config: &Config, report: &mut ValidationReport) {
    let len = description.chars().count();
    if len > config.limits.description_max {
        report.record(
            Code::DescriptionTooLong,
            format!(
                "description is {len} characters (limit {})",
                config.limits.description_max
            ),
            "SKILL.md",
        );
    } else if len < config.limits.description_min {
        report.record(
            Code::DescriptionTooShort,
            format!(
                "description is {len} characters (minimum {})",
                config.limits.description_min
            ),
            "SKILL.md",
        );
    } else {
        report.pass(format!("description ok ({len} characters)"));
    }
}

/// Check every Markdown link target in the manifest. External URLs are
/// skipped; relative targets must exist and use forward slashes.
fn check_links(content: &str, package: &Path, report: &mut ValidationReport) {
    for (idx, line) in content.lines().enumerate() {
        let lineno = idx + 1;
        for capture in MD_LINK.captures_iter(line) {
            let target = &capture[1];
            if target.starts_with("http://") || target.starts_with("https://") {
                continue;
            }

            if target.contains('\\') {
                report.record(
                    Code::NonUnixPath,
                    format!("path '{target}' uses backslashes"),
                    format!("SKILL.md:{lineno}"),
                );
                continue;
            }

            // targets may carry a #fragment; only the file part must exist
            let file_part = target.split('#').next().unwrap_or(target);
            if file_part.is_empty() || file_part.starts_with('/') {
                continue;
            }

            if package.join(file_part).exists() {
                report.pass(format!("linked file '{file_part}' exists"));
            } else {
                report.record(
                    Code::DanglingReference,
                    format!("linked file '{file_part}' does not exist"),
                    format!("SKILL.md:{lineno}"),
                );
            }
        }
    }
}

fn enumerate_subdirs(package: &Path, report: &mut ValidationReport) {
    for dir in OPTIONAL_DIRS {
        let sub = package.join(dir);
        if !sub.is_dir() {
            continue;
        }
        let files = WalkDir::new(&sub)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .count();
        tracing::debug!(dir, files, "optional subdirectory present");
        report.pass(format!("{dir}/ present ({files} files)"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn package_with_manifest(content: &str) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("SKILL.md"), content).unwrap();
        dir
    }

    fn manifest(name: &str, description: &str) -> String {
        format!("---\nname: {name}\ndescription: \"{description}\"\n---\n\nInstructions.\n")
    }

    #[test]
    fn test_minimal_valid_package() {
        let dir = package_with_manifest(&manifest(
            "pdf-extractor",
            "Extracts text from PDF files.",
        ));
        let report = validate(dir.path(), &Config::default()).unwrap();
        assert_eq!(report.hard_count(), 0, "{:?}", report.findings);
        assert_eq!(report.soft_count(), 0, "{:?}", report.findings);
        assert!(report.accepted());
    }

    #[test]
    fn test_missing_manifest_is_the_only_hard_failure() {
        let dir = tempfile::tempdir().unwrap();
        let report = validate(dir.path(), &Config::default()).unwrap();
        assert_eq!(report.hard_count(), 1);
        assert!(report.has_code(Code::MissingManifest));
    }

    #[test]
    fn test_lowercase_manifest_hinted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("skill.md"),
            manifest("x-skill", "Lowercase manifest name."),
        )
        .unwrap();
        let report = validate(dir.path(), &Config::default()).unwrap();
        assert!(report.has_code(Code::MissingManifest));
        assert!(report.findings[0].message.contains("lowercase skill.md"));
    }

    #[test]
    fn test_nonexistent_path_is_env_error() {
        let result = validate(Path::new("/nonexistent/skill-pkg"), &Config::default());
        assert!(matches!(result, Err(EnvError::NotFound(_))));
    }

    #[test]
    fn test_uppercase_name_and_vague_term() {
        let dir = package_with_manifest(&manifest("MyHelper", "Helps with various things."));
        let report = validate(dir.path(), &Config::default()).unwrap();
        assert!(report.has_code(Code::InvalidName));
        assert!(report.has_code(Code::NamingConventionWarning));
        assert!(!report.accepted());
    }

    #[test]
    fn test_leading_hyphen_is_invalid() {
        let dir = package_with_manifest(&manifest("-skill", "Starts with a hyphen, badly."));
        let report = validate(dir.path(), &Config::default()).unwrap();
        assert!(report.has_code(Code::InvalidName));
    }

    #[test]
    fn test_consecutive_hyphens_warn_only() {
        let dir = package_with_manifest(&manifest("pdf--extractor", "Extracts text from PDFs."));
        let report = validate(dir.path(), &Config::default()).unwrap();
        assert_eq!(report.hard_count(), 0);
        assert!(report.has_code(Code::NamingConventionWarning));
    }

    #[test]
    fn test_name_length_boundary() {
        let config = Config::default();
        let ok = package_with_manifest(&manifest(&"a".repeat(64), "A name of exactly 64 chars."));
        let report = validate(ok.path(), &config).unwrap();
        assert!(!report.has_code(Code::NameTooLong));

        let long = package_with_manifest(&manifest(&"a".repeat(65), "A name of 65 characters."));
        let report = validate(long.path(), &config).unwrap();
        assert!(report.has_code(Code::NameTooLong));
    }

    #[test]
    fn test_description_length_boundary() {
        let config = Config::default();
        let ok = package_with_manifest(&manifest("len-check", &"d".repeat(1024)));
        let report = validate(ok.path(), &config).unwrap();
        assert!(!report.has_code(Code::DescriptionTooLong));

        let long = package_with_manifest(&manifest("len-check", &"d".repeat(1025)));
        let report = validate(long.path(), &config).unwrap();
        assert!(report.has_code(Code::DescriptionTooLong));
    }

    #[test]
    fn test_short_description_warns() {
        let dir = package_with_manifest(&manifest("terse", "Too short"));
        let report = validate(dir.path(), &Config::default()).unwrap();
        assert_eq!(report.hard_count(), 0);
        assert!(report.has_code(Code::DescriptionTooShort));
    }

    #[test]
    fn test_missing_required_fields() {
        let dir = package_with_manifest("---\nname: no-description\n---\nbody\n");
        let report = validate(dir.path(), &Config::default()).unwrap();
        assert!(report.has_code(Code::MissingRequiredField));
        assert_eq!(report.hard_count(), 1);
    }

    #[test]
    fn test_no_front_matter() {
        let dir = package_with_manifest("# No front matter\n\nJust markdown.\n");
        let report = validate(dir.path(), &Config::default()).unwrap();
        assert!(report.has_code(Code::InvalidFrontMatter));
    }

    #[test]
    fn test_dangling_reference_warns() {
        let content = format!(
            "{}\nSee [the format guide](references/format.md).\n",
            manifest("linked", "Links to a missing reference.")
        );
        let dir = package_with_manifest(&content);
        let report = validate(dir.path(), &Config::default()).unwrap();
        assert_eq!(report.hard_count(), 0);
        assert!(report.has_code(Code::DanglingReference));
    }

    #[test]
    fn test_existing_reference_passes() {
        let content = format!(
            "{}\nSee [the format guide](references/format.md).\n",
            manifest("linked", "Links to a real reference.")
        );
        let dir = package_with_manifest(&content);
        fs::create_dir(dir.path().join("references")).unwrap();
        fs::write(dir.path().join("references/format.md"), "# Format\n").unwrap();
        let report = validate(dir.path(), &Config::default()).unwrap();
        assert_eq!(report.soft_count(), 0);
        assert!(report
            .passes
            .iter()
            .any(|p| p.contains("references/format.md")));
        assert!(report.passes.iter().any(|p| p.contains("references/")));
    }

    #[test]
    fn test_external_urls_skipped() {
        let content = format!(
            "{}\n[docs](https://example.com/missing) and [plain](http://example.com/x).\n",
            manifest("url-skill", "Links only to external URLs.")
        );
        let dir = package_with_manifest(&content);
        let report = validate(dir.path(), &Config::default()).unwrap();
        assert!(!report.has_code(Code::DanglingReference));
    }

    #[test]
    fn test_backslash_path_is_hard() {
        let content = format!(
            "{}\nRun [the script](scripts\\run.py).\n",
            manifest("windowsy", "Uses a Windows-style path.")
        );
        let dir = package_with_manifest(&content);
        let report = validate(dir.path(), &Config::default()).unwrap();
        assert!(report.has_code(Code::NonUnixPath));
        assert!(!report.accepted());
    }

    #[test]
    fn test_manifest_too_long_warns() {
        let body = "line\n".repeat(501);
        let content = format!(
            "---\nname: long-manifest\ndescription: \"A manifest with a very long body.\"\n---\n{body}"
        );
        let dir = package_with_manifest(&content);
        let report = validate(dir.path(), &Config::default()).unwrap();
        assert_eq!(report.hard_count(), 0);
        assert!(report.has_code(Code::ManifestTooLong));
    }

    #[test]
    fn test_idempotent_reports() {
        let dir = package_with_manifest(&manifest("MyHelper", "Short"));
        let config = Config::default();
        let first = validate(dir.path(), &config).unwrap().render_text(true);
        let second = validate(dir.path(), &config).unwrap().render_text(true);
        assert_eq!(first, second);
    }
}

//! Skill package discovery.

use crate::skillpack::parser::{parse_manifest, ParsedManifest};
use crate::skillpack::validator::EnvError;
use std::path::{Path, PathBuf};

/// Minimal metadata for a discovered package
#[derive(Debug, Clone)]
pub struct PackageEntry {
    pub path: PathBuf,
    pub name: String,
    pub description: String,
    pub allowed_tools: Option<Vec<String>>,
}

/// Index of the packages found under one root
#[derive(Debug, Default)]
pub struct PackageIndex {
    packages: Vec<PackageEntry>,
    errors: Vec<(PathBuf, String)>,
}

/// Find candidate packages under `root`: immediate subdirectories that
/// contain a SKILL.md. Results are sorted by path so batch output stays
/// deterministic regardless of directory-iteration order.
pub fn discover(root: &Path) -> Result<Vec<PathBuf>, EnvError> {
    if !root.exists() {
        return Err(EnvError::NotFound(root.display().to_string()));
    }
    if !root.is_dir() {
        return Err(EnvError::NotADirectory(root.display().to_string()));
    }

    let entries = std::fs::read_dir(root).map_err(|source| EnvError::Unreadable {
        path: root.display().to_string(),
        source,
    })?;

    let mut found = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() && path.join("SKILL.md").is_file() {
            found.push(path);
        }
    }
    found.sort();
    tracing::debug!(root = %root.display(), count = found.len(), "discovered packages");
    Ok(found)
}

impl PackageIndex {
    /// Build an index of every package under `root`. Manifests are read
    /// leniently; ones that fail to parse are retained as errors rather
    /// than dropped.
    pub fn scan(root: &Path) -> Result<Self, EnvError> {
        let mut index = PackageIndex::default();

        for path in discover(root)? {
            let manifest = path.join("SKILL.md");
            let content = match std::fs::read_to_string(&manifest) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!(path = %manifest.display(), "unreadable manifest: {e}");
                    index.errors.push((manifest, e.to_string()));
                    continue;
                }
            };

            match parse_manifest(&content) {
                ParsedManifest::Parsed { frontmatter, .. } => {
                    // Directory name stands in when the manifest has no name
                    let name = frontmatter
                        .name
                        .filter(|n| !n.is_empty())
                        .unwrap_or_else(|| {
                            path.file_name()
                                .and_then(|n| n.to_str())
                                .unwrap_or("unnamed")
                                .to_string()
                        });
                    index.packages.push(PackageEntry {
                        path,
                        name,
                        description: frontmatter.description.unwrap_or_default(),
                        allowed_tools: frontmatter.allowed_tools.map(|at| at.to_vec()),
                    });
                }
                ParsedManifest::MissingOpenDelimiter | ParsedManifest::MissingCloseDelimiter => {
                    index
                        .errors
                        .push((manifest, "missing front matter delimiters".to_string()));
                }
                ParsedManifest::InvalidYaml(e) => {
                    index.errors.push((manifest, e));
                }
            }
        }

        Ok(index)
    }

    pub fn packages(&self) -> &[PackageEntry] {
        &self.packages
    }

    pub fn errors(&self) -> &[(PathBuf, String)] {
        &self.errors
    }

    pub fn count(&self) -> usize {
        self.packages.len()
    }

    /// Format the index as a listing, one `- name: description` per line.
    pub fn render_listing(&self) -> String {
        let mut lines = Vec::new();
        for entry in &self.packages {
            let mut line = format!("- {}: {}", entry.name, entry.description);
            if let Some(tools) = &entry.allowed_tools {
                line.push_str(&format!(" [tools: {}]", tools.join(", ")));
            }
            lines.push(line);
        }
        for (path, error) in &self.errors {
            lines.push(format!("- (unparsable) {}: {error}", path.display()));
        }
        lines.join("\n")
    }
}

//! SKILL.md front matter parser.

use serde::Deserialize;

/// Parsed SKILL.md front matter.
///
/// Required fields stay optional here so a missing key surfaces as a
/// per-field finding instead of a deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Frontmatter {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "allowed-tools")]
    pub allowed_tools: Option<AllowedTools>,
}

/// Allowed tools can be CSV string or YAML list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AllowedTools {
    Csv(String),
    List(Vec<String>),
}

impl AllowedTools {
    /// Convert to a list of tool names
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            AllowedTools::Csv(s) => s.split(',').map(|t| t.trim().to_string()).collect(),
            AllowedTools::List(v) => v.clone(),
        }
    }
}

/// Outcome of splitting a manifest into front matter and body.
#[derive(Debug)]
pub enum ParsedManifest {
    Parsed {
        frontmatter: Frontmatter,
        body: String,
    },
    /// File does not open with a `---` line.
    MissingOpenDelimiter,
    /// Opening `---` with no closing `---` line.
    MissingCloseDelimiter,
    /// Delimiters found but the header is not a valid YAML mapping.
    InvalidYaml(String),
}

/// Split a SKILL.md into front matter and body.
///
/// Never fails: every malformed shape maps to a [`ParsedManifest`]
/// variant the validator can report on.
pub fn parse_manifest(content: &str) -> ParsedManifest {
    if !content.starts_with("---") {
        return ParsedManifest::MissingOpenDelimiter;
    }

    let rest = &content[3..];
    let Some(fm_end) = rest.find("\n---") else {
        return ParsedManifest::MissingCloseDelimiter;
    };

    let yaml = &rest[..fm_end];
    let frontmatter: Frontmatter = match serde_yaml::from_str(yaml) {
        Ok(fm) => fm,
        Err(e) => return ParsedManifest::InvalidYaml(e.to_string()),
    };

    // Body starts after the closing "---" line
    let body_start = fm_end + 4;
    let body = if body_start < rest.len() {
        rest[body_start..].trim_start_matches('\n').to_string()
    } else {
        String::new()
    };

    ParsedManifest::Parsed { frontmatter, body }
}

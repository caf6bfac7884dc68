use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

/// Thresholds applied to manifest fields
#[derive(Debug, Clone, Deserialize)]
pub struct Limits {
    #[serde(default = "default_name_max")]
    pub name_max: usize,
    #[serde(default = "default_description_min")]
    pub description_min: usize,
    #[serde(default = "default_description_max")]
    pub description_max: usize,
    #[serde(default = "default_manifest_max_lines")]
    pub manifest_max_lines: usize,
}

fn default_name_max() -> usize {
    64
}
fn default_description_min() -> usize {
    10
}
fn default_description_max() -> usize {
    1024
}
fn default_manifest_max_lines() -> usize {
    500
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            name_max: default_name_max(),
            description_min: default_description_min(),
            description_max: default_description_max(),
            manifest_max_lines: default_manifest_max_lines(),
        }
    }
}

/// Naming-convention checks
#[derive(Debug, Clone, Deserialize)]
pub struct NamingConfig {
    /// Terms that mark a skill name as too vague (matched case-insensitively)
    #[serde(default = "default_vague_terms")]
    pub vague_terms: Vec<String>,
}

fn default_vague_terms() -> Vec<String> {
    ["helper", "utils", "tools"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            vague_terms: default_vague_terms(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub limits: Limits,
    pub naming: NamingConfig,
}

/// On-disk shape: sections are optional so a file can override one
/// section without resetting the others.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    limits: Option<Limits>,
    naming: Option<NamingConfig>,
}

impl Config {
    /// Load configuration from default paths.
    /// Priority: project (./.skillcheck.toml) > user (~/.skillcheck.toml).
    /// An explicit path replaces the default chain entirely.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = explicit {
            config.apply(RawConfig::load_from(path)?);
            return Ok(config);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".skillcheck.toml");
            if user_config.exists() {
                config.apply(RawConfig::load_from(&user_config)?);
            }
        }

        let project_config = Path::new(".skillcheck.toml");
        if project_config.exists() {
            config.apply(RawConfig::load_from(project_config)?);
        }

        Ok(config)
    }

    fn apply(&mut self, raw: RawConfig) {
        if let Some(limits) = raw.limits {
            self.limits = limits;
        }
        if let Some(naming) = raw.naming {
            self.naming = naming;
        }
    }
}

impl RawConfig {
    fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let raw: RawConfig = toml::from_str(&content)?;
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.limits.name_max, 64);
        assert_eq!(config.limits.description_min, 10);
        assert_eq!(config.limits.description_max, 1024);
        assert_eq!(config.limits.manifest_max_lines, 500);
        assert_eq!(config.naming.vague_terms, vec!["helper", "utils", "tools"]);
    }

    #[test]
    fn test_partial_section_keeps_sibling_defaults() {
        let raw: RawConfig = toml::from_str("[limits]\ndescription_min = 20\n").unwrap();
        let mut config = Config::default();
        config.apply(raw);
        assert_eq!(config.limits.description_min, 20);
        assert_eq!(config.limits.description_max, 1024);
        assert_eq!(config.naming.vague_terms.len(), 3);
    }

    #[test]
    fn test_vague_terms_override() {
        let raw: RawConfig =
            toml::from_str("[naming]\nvague_terms = [\"misc\", \"stuff\"]\n").unwrap();
        let mut config = Config::default();
        config.apply(raw);
        assert_eq!(config.naming.vague_terms, vec!["misc", "stuff"]);
    }
}

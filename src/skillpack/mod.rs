//! Skill packages: directories holding a SKILL.md manifest with YAML
//! front matter, plus optional references/, scripts/, and assets/
//! subdirectories.

pub mod index;
pub mod parser;
pub mod validator;

pub use index::PackageIndex;
pub use parser::Frontmatter;
pub use validator::{validate, EnvError};

//! skillcheck: structural validation for skill packages.
//!
//! A skill package is a directory with a `SKILL.md` manifest:
//!
//! ```markdown
//! ---
//! name: pdf-extractor
//! description: Extracts text from PDF files.
//! ---
//!
//! [Markdown instructions for the assistant]
//! ```
//!
//! [`validate`] scans one package and returns a [`ValidationReport`] of
//! typed findings; hard findings block acceptance, soft ones are
//! advisory. The validator is a pure function over filesystem contents;
//! exit codes and printing live in the CLI.

pub mod config;
pub mod report;
pub mod skillpack;

pub use config::Config;
pub use report::{Code, Finding, Severity, ValidationReport};
pub use skillpack::validator::{validate, EnvError};

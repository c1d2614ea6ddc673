//! mu_options: Mu.json parsing and compiler options.
//!
//! Parses project files and provides the `CompilerOptions` structure the
//! driver consults when deciding how to bind a program.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How many symbol tables one compilation produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindScope {
    /// One flat namespace across every document of the program.
    #[default]
    Program,
    /// One namespace per document; documents cannot clash with each other.
    Document,
}

/// Compiler options, matching the `compilerOptions` object of Mu.json.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompilerOptions {
    pub bind_scope: Option<BindScope>,
    /// Bind documents on the thread pool when binding per document.
    pub parallel: Option<bool>,
}

impl CompilerOptions {
    pub fn bind_scope(&self) -> BindScope {
        self.bind_scope.unwrap_or_default()
    }

    pub fn parallel(&self) -> bool {
        self.parallel.unwrap_or(true)
    }
}

/// The Mu.json file structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MuConfig {
    pub compiler_options: Option<CompilerOptions>,
    pub files: Option<Vec<String>>,
}

impl MuConfig {
    /// `files` resolved against the directory holding the project file.
    pub fn resolved_files(&self, project_path: &Path) -> Vec<PathBuf> {
        let root = project_path.parent().unwrap_or_else(|| Path::new(""));
        self.files
            .iter()
            .flatten()
            .map(|file| root.join(file))
            .collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("'{}' is not a valid project file: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse a Mu.json file from a string.
pub fn parse_config(content: &str) -> Result<MuConfig, serde_json::Error> {
    serde_json::from_str(content)
}

/// Parse a Mu.json file from a path.
pub fn parse_config_file(path: impl AsRef<Path>) -> Result<MuConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"{
                "compilerOptions": { "bindScope": "document", "parallel": false },
                "files": ["net.json", "web/web.json"]
            }"#,
        )
        .unwrap();

        let options = config.compiler_options.clone().unwrap();
        assert_eq!(options.bind_scope(), BindScope::Document);
        assert!(!options.parallel());
        assert_eq!(
            config.resolved_files(Path::new("proj/Mu.json")),
            vec![PathBuf::from("proj/net.json"), PathBuf::from("proj/web/web.json")]
        );
    }

    #[test]
    fn test_defaults() {
        let config = parse_config("{}").unwrap();
        assert!(config.compiler_options.is_none());
        let options = CompilerOptions::default();
        assert_eq!(options.bind_scope(), BindScope::Program);
        assert!(options.parallel());
        assert!(config.resolved_files(Path::new("Mu.json")).is_empty());
    }

    #[test]
    fn test_unknown_option_rejected() {
        let err = parse_config(r#"{ "compilerOptions": { "strict": true } }"#).unwrap_err();
        assert!(err.to_string().contains("strict"));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_config_file("does/not/exist/Mu.json").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}

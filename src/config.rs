// Fri Oct 16 2026 - Alex

use std::path::PathBuf;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub input_directory: PathBuf,
    pub output_directory: PathBuf,
    pub main_namespace: String,
    pub input_pattern: String,
    pub header_extension: String,
    /// Directory holding `{kind}.tmpl` overrides for the built-in templates.
    pub template_directory: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_directory: PathBuf::from("."),
            output_directory: PathBuf::from("codegen"),
            main_namespace: "df".to_string(),
            input_pattern: "df.*.xml".to_string(),
            header_extension: "h".to_string(),
            template_directory: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input_directory(mut self, dir: PathBuf) -> Self {
        self.input_directory = dir;
        self
    }

    pub fn with_output_directory(mut self, dir: PathBuf) -> Self {
        self.output_directory = dir;
        self
    }

    pub fn with_main_namespace(mut self, namespace: String) -> Self {
        self.main_namespace = namespace;
        self
    }

    pub fn with_input_pattern(mut self, pattern: String) -> Self {
        self.input_pattern = pattern;
        self
    }

    pub fn with_header_extension(mut self, extension: String) -> Self {
        self.header_extension = extension;
        self
    }

    pub fn with_template_directory(mut self, dir: PathBuf) -> Self {
        self.template_directory = Some(dir);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.main_namespace.is_empty() {
            return Err("main_namespace must not be empty".to_string());
        }
        if self.main_namespace.split("::").any(|part| crate::schema::validate_identifier(part).is_err()) {
            return Err(format!("main_namespace is not a valid C++ namespace: {}", self.main_namespace));
        }
        if self.input_pattern.is_empty() {
            return Err("input_pattern must not be empty".to_string());
        }
        if glob::Pattern::new(&self.input_pattern).is_err() {
            return Err(format!("input_pattern is not a valid glob: {}", self.input_pattern));
        }
        if self.header_extension.is_empty() || self.header_extension.contains(['/', '\\', '.']) {
            return Err(format!("header_extension is invalid: {:?}", self.header_extension));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.input_directory, PathBuf::from("."));
        assert_eq!(config.output_directory, PathBuf::from("codegen"));
        assert_eq!(config.main_namespace, "df");
        assert_eq!(config.input_pattern, "df.*.xml");
        assert_eq!(config.header_extension, "h");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders_and_validation() {
        let config = Config::new()
            .with_input_directory(PathBuf::from("xml"))
            .with_main_namespace("df::v50".to_string());
        assert!(config.validate().is_ok());
        assert_eq!(config.input_directory, PathBuf::from("xml"));

        assert!(Config::new().with_main_namespace("".to_string()).validate().is_err());
        assert!(Config::new().with_main_namespace("d f".to_string()).validate().is_err());
        assert!(Config::new().with_input_pattern("df.[.xml".to_string()).validate().is_err());
        assert!(Config::new().with_header_extension(".h".to_string()).validate().is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let config = Config::new().with_template_directory(PathBuf::from("templates"));
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}

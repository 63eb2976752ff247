//! Application configuration and output naming.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::schema::{ApplicationInfo, GeneralProfile};
use crate::sections::SectionKind;
use crate::styles::{TemplateError, TemplateRegistry};

pub const DEFAULT_CONFIG_FILE: &str = "resumeforge.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configured template is not available: {0}")]
    UnknownTemplate(String),
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("generated_applications")
}

fn default_file_name_template() -> String {
    "Resume - {name} - {company} - {job} - {date}.pdf".to_string()
}

fn default_template() -> String {
    "modern".to_string()
}

fn default_sections() -> Vec<SectionKind> {
    SectionKind::SELECTABLE.to_vec()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,
    #[serde(default = "default_file_name_template")]
    pub file_name_template: String,
    #[serde(default = "default_template")]
    pub template: String,
    #[serde(default)]
    pub templates_dir: Option<PathBuf>,
    #[serde(default = "default_sections")]
    pub sections: Vec<SectionKind>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_directory: default_output_directory(),
            file_name_template: default_file_name_template(),
            template: default_template(),
            templates_dir: None,
            sections: default_sections(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `path` if given, else the default file when present, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load(Path::new(DEFAULT_CONFIG_FILE)),
            None => {
                log::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                Ok(Self::default())
            }
        }
    }

    /// Built-in templates plus `templates_dir`, if configured.
    pub fn registry(&self) -> Result<TemplateRegistry, TemplateError> {
        match &self.templates_dir {
            Some(dir) => TemplateRegistry::load_from_dir(dir),
            None => TemplateRegistry::builtin(),
        }
    }

    pub fn check_template(&self, registry: &TemplateRegistry) -> Result<(), ConfigError> {
        if registry.get(&self.template).is_none() {
            return Err(ConfigError::UnknownTemplate(self.template.clone()));
        }
        Ok(())
    }

    /// File name with `{name}`, `{company}`, `{job}` and `{date}` filled in.
    pub fn file_name(&self, app: &ApplicationInfo, general: &GeneralProfile, date: NaiveDate) -> String {
        self.file_name_template
            .replace("{name}", &path_safe(&general.name))
            .replace("{company}", &path_safe(&app.company))
            .replace("{job}", &path_safe(&app.job))
            .replace("{date}", &date.format("%Y-%m-%d").to_string())
    }

    /// `output_directory/<company>/<job>/<file name>`.
    pub fn output_path(&self, app: &ApplicationInfo, general: &GeneralProfile, date: NaiveDate) -> PathBuf {
        self.output_directory
            .join(path_safe(&app.company))
            .join(path_safe(&app.job))
            .join(self.file_name(app, general, date))
    }
}

/// Replaces characters that would split or escape a path component.
fn path_safe(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '-',
            c => c,
        })
        .collect::<String>()
        .trim_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> ApplicationInfo {
        ApplicationInfo { company: "Acme".into(), job: "Engineer".into() }
    }

    fn general() -> GeneralProfile {
        GeneralProfile {
            name: "Ada Lovelace".into(),
            title: "Analyst".into(),
            location: "London".into(),
            email: "ada@example.com".into(),
            cell_number: None,
            portfolio: "https://ada.dev".into(),
            linkedin: "https://linkedin.com/in/ada".into(),
            github: "https://github.com/ada".into(),
            description: "Wrote the first published algorithm.".into(),
        }
    }

    #[test]
    fn test_default_output_path() {
        let config = AppConfig::default();
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let path = config.output_path(&app(), &general(), date);
        assert_eq!(
            path,
            PathBuf::from("generated_applications/Acme/Engineer/Resume - Ada Lovelace - Acme - Engineer - 2024-03-09.pdf")
        );
    }

    #[test]
    fn test_separators_in_names_stay_in_one_component() {
        let config = AppConfig::default();
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let app = ApplicationInfo { company: "A/B Corp".into(), job: "../Dev".into() };
        let path = config.output_path(&app, &general(), date);
        let rel = path.strip_prefix("generated_applications").unwrap();
        assert_eq!(rel.components().count(), 3);
    }

    #[test]
    fn test_load_partial_and_reject_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resumeforge.json");
        fs::write(&path, r#"{"template": "modern", "sections": ["jobs", "languages"]}"#).unwrap();
        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.sections, [SectionKind::Jobs, SectionKind::Languages]);
        assert_eq!(config.output_directory, PathBuf::from("generated_applications"));

        fs::write(&path, r#"{"colour": "blue"}"#).unwrap();
        assert!(matches!(AppConfig::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_unknown_template_rejected() {
        let config = AppConfig { template: "classic".into(), ..AppConfig::default() };
        let registry = config.registry().unwrap();
        assert!(matches!(config.check_template(&registry), Err(ConfigError::UnknownTemplate(_))));
    }
}

//! Template System - Style Tables as Contracts
//!
//! A template carries the layout cell size, the font identifiers it needs
//! and a two-level style table: section name -> element role -> text style.
//! Lookups never fall back; a role the template does not define is an error.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::page::PageSetup;

pub type TemplateId = String;

/// Built-in template shipped with the engine.
pub const MODERN_TEMPLATE_JSON: &str = include_str!("../templates/modern.json");

#[derive(Debug, Error)]
pub enum StyleError {
    #[error("Style section not defined: {0}")]
    MissingSection(String),

    #[error("Style role not defined: {section}.{role}")]
    MissingRole { section: String, role: String },
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Failed to read templates: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid template {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Template {0} requires engine >= {1}, current is {2}")]
    EngineVersionMismatch(String, String, String),

    #[error("Invalid version string: {0}")]
    InvalidVersion(String),
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FontDecoration {
    #[default]
    Regular,
    Bold,
    Italic,
    Underline,
}

/// Concrete presentation attributes for one style role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextStyle {
    /// Font identifier, resolved by the document surface.
    pub font: String,
    #[serde(default)]
    pub style: FontDecoration,
    pub size: f32,
    #[serde(default)]
    pub color: Option<[u8; 3]>,
}

/// Shared cell geometry, in page units (mm).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    pub cell_width: f32,
    pub cell_height: f32,
}

/// Section name -> role -> style.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct StyleTable {
    sections: BTreeMap<String, BTreeMap<String, TextStyle>>,
}

impl StyleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, section: &str, role: &str, style: TextStyle) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(role.to_string(), style);
    }

    pub fn section(&self, name: &str) -> Result<SectionStyles<'_>, StyleError> {
        self.sections
            .get_key_value(name)
            .map(|(name, roles)| SectionStyles { name, roles })
            .ok_or_else(|| StyleError::MissingSection(name.to_string()))
    }

    pub fn lookup(&self, section: &str, role: &str) -> Result<&TextStyle, StyleError> {
        self.section(section)?.role(role)
    }

    /// Every font identifier referenced by any role.
    pub fn fonts(&self) -> Vec<&str> {
        let mut fonts: Vec<&str> = self
            .sections
            .values()
            .flat_map(|roles| roles.values().map(|s| s.font.as_str()))
            .collect();
        fonts.sort_unstable();
        fonts.dedup();
        fonts
    }
}

/// Read-only view of one section's roles.
#[derive(Debug, Clone, Copy)]
pub struct SectionStyles<'a> {
    name: &'a str,
    roles: &'a BTreeMap<String, TextStyle>,
}

impl<'a> SectionStyles<'a> {
    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn role(&self, role: &str) -> Result<&'a TextStyle, StyleError> {
        self.roles.get(role).ok_or_else(|| StyleError::MissingRole {
            section: self.name.to_string(),
            role: role.to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    pub description: String,
    pub template_version: String,
    pub engine_min_version: String,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub superseded_by: Option<String>,
    #[serde(default)]
    pub page: PageSetup,
    pub cell_width: f32,
    pub cell_height: f32,
    /// Font identifier -> PDF base font name.
    #[serde(default)]
    pub fonts: BTreeMap<String, String>,
    pub styles: StyleTable,
}

impl Template {
    pub fn layout(&self) -> LayoutConfig {
        LayoutConfig {
            cell_width: self.cell_width,
            cell_height: self.cell_height,
        }
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn modern() -> Result<Self, serde_json::Error> {
        Self::from_json(MODERN_TEMPLATE_JSON)
    }

    /// Rejects templates that need a newer engine than `engine_version`.
    pub fn check_engine(&self, engine_version: &str) -> Result<(), TemplateError> {
        let engine = semver::Version::parse(engine_version)
            .map_err(|_| TemplateError::InvalidVersion(engine_version.to_string()))?;
        let min = semver::Version::parse(&self.engine_min_version)
            .map_err(|_| TemplateError::InvalidVersion(self.engine_min_version.clone()))?;

        if engine < min {
            return Err(TemplateError::EngineVersionMismatch(
                format!("{}@{}", self.id, self.template_version),
                self.engine_min_version.clone(),
                engine_version.to_string(),
            ));
        }
        Ok(())
    }
}

/// Template registry - loads and caches templates
pub struct TemplateRegistry {
    templates: HashMap<TemplateId, Template>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self { templates: HashMap::new() }
    }

    /// Registry holding only the built-in templates.
    pub fn builtin() -> Result<Self, TemplateError> {
        let mut registry = Self::new();
        let modern = Template::modern().map_err(|source| TemplateError::Parse {
            path: PathBuf::from("templates/modern.json"),
            source,
        })?;
        registry.register(modern);
        Ok(registry)
    }

    /// Built-ins plus every `*.json` file in `dir`; a file with the same id replaces a built-in.
    pub fn load_from_dir(dir: &Path) -> Result<Self, TemplateError> {
        let mut registry = Self::builtin()?;
        if dir.exists() {
            let mut paths = Vec::new();
            for entry in fs::read_dir(dir)? {
                let path = entry?.path();
                if path.extension().map_or(false, |e| e == "json") {
                    paths.push(path);
                }
            }
            paths.sort();
            for path in paths {
                let content = fs::read_to_string(&path)?;
                let template = Template::from_json(&content)
                    .map_err(|source| TemplateError::Parse { path: path.clone(), source })?;
                log::debug!("loaded template {} from {}", template.id, path.display());
                registry.register(template);
            }
        }
        Ok(registry)
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.get(id)
    }

    pub fn list(&self) -> Vec<&Template> {
        let mut list: Vec<_> = self.templates.values().collect();
        list.sort_by(|a, b| a.id.cmp(&b.id));
        list
    }

    pub fn register(&mut self, template: Template) {
        self.templates.insert(template.id.clone(), template);
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modern_template_parses() {
        let t = Template::modern().unwrap();
        assert_eq!(t.id, "modern");
        assert_eq!(t.layout().cell_width, 190.0);
        let header = t.styles.lookup("jobs", "section_header").unwrap();
        assert_eq!(header.color, Some([0, 51, 102]));
        assert_eq!(header.style, FontDecoration::Regular);
        assert_eq!(t.styles.lookup("general", "name").unwrap().size, 14.0);
    }

    #[test]
    fn test_missing_role_is_error() {
        let t = Template::modern().unwrap();
        let err = t.styles.lookup("jobs", "nonexistent").unwrap_err();
        assert_eq!(err.to_string(), "Style role not defined: jobs.nonexistent");
        assert!(matches!(
            t.styles.section("unknown"),
            Err(StyleError::MissingSection(_))
        ));
    }

    #[test]
    fn test_every_style_font_is_mapped() {
        let t = Template::modern().unwrap();
        for font in t.styles.fonts() {
            assert!(t.fonts.contains_key(font), "unmapped font {}", font);
        }
    }

    #[test]
    fn test_engine_version_gate() {
        let mut t = Template::modern().unwrap();
        assert!(t.check_engine("1.0.0").is_ok());
        t.engine_min_version = "9.0.0".to_string();
        assert!(matches!(t.check_engine("1.0.0"), Err(TemplateError::EngineVersionMismatch(..))));
        t.engine_min_version = "next".to_string();
        assert!(matches!(t.check_engine("1.0.0"), Err(TemplateError::InvalidVersion(_))));
    }

    #[test]
    fn test_load_from_dir_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let mut t = Template::modern().unwrap();
        t.name = "Modern (custom)".to_string();
        fs::write(dir.path().join("modern.json"), serde_json::to_string(&t).unwrap()).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let registry = TemplateRegistry::load_from_dir(dir.path()).unwrap();
        assert_eq!(registry.list().len(), 1);
        assert_eq!(registry.get("modern").unwrap().name, "Modern (custom)");
    }

    #[test]
    fn test_broken_template_file_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        assert!(matches!(
            TemplateRegistry::load_from_dir(dir.path()),
            Err(TemplateError::Parse { .. })
        ));
    }
}

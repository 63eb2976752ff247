//! Section Renderers
//!
//! One renderer per resume section. A renderer reads its slice of the
//! validated resume and its style subsection, then writes a header line
//! followed by one block per included entry.

mod entries;
mod general;
mod writer;

pub use entries::{
    ArticlesSection, AwardsSection, CertificationsSection, EducationSection, JobsSection,
    LanguagesSection, ProjectsSection, VolunteeringSection,
};
pub use general::GeneralSection;
pub use writer::{SectionWriter, ENTRY_TITLE_HEIGHT, HEADER_HEIGHT, SPACER_HEIGHT};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::schema::{Record, Resume};
use crate::styles::{LayoutConfig, StyleError, StyleTable};
use crate::surface::{DocumentSurface, SurfaceError};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Style(#[from] StyleError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// A renderable section.
pub trait SectionRenderer {
    fn kind(&self) -> SectionKind;

    /// Writes the section at the cursor and leaves the cursor at the left
    /// margin of the next line.
    fn render(&self, surface: &mut dyn DocumentSurface) -> Result<(), RenderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    General,
    Projects,
    Articles,
    Jobs,
    Education,
    Certifications,
    Volunteering,
    Awards,
    Languages,
}

impl SectionKind {
    /// Sections the caller may select, in the default order. General always comes first.
    pub const SELECTABLE: [SectionKind; 8] = [
        SectionKind::Projects,
        SectionKind::Articles,
        SectionKind::Jobs,
        SectionKind::Education,
        SectionKind::Certifications,
        SectionKind::Volunteering,
        SectionKind::Awards,
        SectionKind::Languages,
    ];

    /// Key of this section in a style table.
    pub fn style_key(&self) -> &'static str {
        match self {
            SectionKind::General => "general",
            SectionKind::Projects => "projects",
            SectionKind::Articles => "articles",
            SectionKind::Jobs => "jobs",
            SectionKind::Education => "education",
            SectionKind::Certifications => "certifications",
            SectionKind::Volunteering => "volunteering",
            SectionKind::Awards => "awards",
            SectionKind::Languages => "languages",
        }
    }

    /// Header line text.
    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::General => "General",
            SectionKind::Projects => "Projects",
            SectionKind::Articles => "Articles",
            SectionKind::Jobs => "Jobs",
            SectionKind::Education => "Education",
            SectionKind::Certifications => "Certifications",
            SectionKind::Volunteering => "Volunteering",
            SectionKind::Awards => "Awards",
            SectionKind::Languages => "Languages",
        }
    }

    /// Every style role the renderer may request, whatever the data.
    pub fn required_roles(&self) -> &'static [&'static str] {
        match self {
            SectionKind::General => &["name", "title", "contact", "link", "description_header", "description"],
            SectionKind::Projects => &["section_header", "name", "link", "details"],
            SectionKind::Articles => &["section_header", "title", "publication", "details", "link"],
            SectionKind::Jobs => &["section_header", "title", "company", "details"],
            SectionKind::Education => &["section_header", "school", "field", "details"],
            SectionKind::Certifications => &["section_header", "name", "issuer", "details"],
            SectionKind::Volunteering => &["section_header", "organization", "role", "details"],
            SectionKind::Awards => &["section_header", "title", "issuer", "details"],
            SectionKind::Languages => &["section_header", "language", "proficiency"],
        }
    }

    /// Fails with the first role `styles` does not define for this section.
    pub fn check_styles(&self, styles: &StyleTable) -> Result<(), StyleError> {
        let section = styles.section(self.style_key())?;
        for role in self.required_roles() {
            section.role(role)?;
        }
        Ok(())
    }

    /// Builds the renderer for this section over `resume`.
    pub fn renderer<'a>(
        &self,
        resume: &'a Resume,
        styles: &'a StyleTable,
        layout: LayoutConfig,
    ) -> Result<Box<dyn SectionRenderer + 'a>, StyleError> {
        let section = styles.section(self.style_key())?;
        let renderer: Box<dyn SectionRenderer + 'a> = match self {
            SectionKind::General => Box::new(GeneralSection::new(&resume.general, section, layout)),
            SectionKind::Projects => Box::new(ProjectsSection::new(&resume.projects, section, layout)),
            SectionKind::Articles => Box::new(ArticlesSection::new(&resume.articles, section, layout)),
            SectionKind::Jobs => Box::new(JobsSection::new(&resume.jobs, section, layout)),
            SectionKind::Education => Box::new(EducationSection::new(&resume.education, section, layout)),
            SectionKind::Certifications => {
                Box::new(CertificationsSection::new(&resume.certifications, section, layout))
            }
            SectionKind::Volunteering => {
                Box::new(VolunteeringSection::new(&resume.volunteering, section, layout))
            }
            SectionKind::Awards => Box::new(AwardsSection::new(&resume.awards, section, layout)),
            SectionKind::Languages => Box::new(LanguagesSection::new(&resume.languages, section, layout)),
        };
        Ok(renderer)
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.style_key())
    }
}

impl FromStr for SectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        std::iter::once(SectionKind::General)
            .chain(SectionKind::SELECTABLE)
            .find(|k| k.style_key() == s)
            .ok_or_else(|| format!("unknown section: {}", s))
    }
}

/// Entries whose `include` flag is set, in input order.
pub(crate) fn included<'a, R: Record>(kind: SectionKind, entries: &'a [R]) -> impl Iterator<Item = &'a R> + 'a {
    entries.iter().enumerate().filter_map(move |(i, entry)| {
        if entry.included() {
            Some(entry)
        } else {
            log::debug!("{}: skipping entry {} (include = false)", kind, i);
            None
        }
    })
}

/// "Degree: BSc" style line. Absent and empty values both print nothing.
pub(crate) fn labeled(label: &str, value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(|v| format!("{}: {}", label, v))
}

/// "Skills: a, b" style line, or nothing for an empty list.
pub(crate) fn joined(label: &str, items: &[String]) -> Option<String> {
    if items.is_empty() {
        None
    } else {
        Some(format!("{}: {}", label, items.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::Template;

    #[test]
    fn test_modern_template_covers_every_section() {
        let t = Template::modern().unwrap();
        SectionKind::General.check_styles(&t.styles).unwrap();
        for kind in SectionKind::SELECTABLE {
            kind.check_styles(&t.styles).unwrap();
        }
    }

    #[test]
    fn test_section_kind_names() {
        assert_eq!("jobs".parse::<SectionKind>().unwrap(), SectionKind::Jobs);
        assert_eq!("general".parse::<SectionKind>().unwrap(), SectionKind::General);
        assert!("Jobs".parse::<SectionKind>().is_err());
        let json = serde_json::to_string(&SectionKind::Certifications).unwrap();
        assert_eq!(json, "\"certifications\"");
    }

    #[test]
    fn test_joined_skips_empty() {
        assert_eq!(joined("Skills", &[]), None);
        let items = vec!["Rust".to_string(), "Go".to_string()];
        assert_eq!(joined("Skills", &items).unwrap(), "Skills: Rust, Go");
    }
}

//! List-valued sections. Each entry type knows how to write its own block;
//! [`ListSection`] adds the header and the include filter.

use crate::schema::{
    ArticleEntry, AwardEntry, CertificationEntry, EducationEntry, JobEntry, LanguageEntry, ProjectEntry,
    Record, VolunteerEntry,
};
use crate::styles::{LayoutConfig, SectionStyles};
use crate::surface::DocumentSurface;

use super::{included, joined, labeled, RenderError, SectionKind, SectionRenderer, SectionWriter};
use super::{ENTRY_TITLE_HEIGHT, SPACER_HEIGHT};

const LANGUAGE_SPACER_HEIGHT: f32 = 2.0;

/// One entry's block of lines.
pub trait EntryBlock: Record {
    const KIND: SectionKind;

    fn write(&self, w: &mut SectionWriter<'_, '_>) -> Result<(), RenderError>;
}

pub struct ListSection<'a, E> {
    entries: &'a [E],
    styles: SectionStyles<'a>,
    layout: LayoutConfig,
}

impl<'a, E: EntryBlock> ListSection<'a, E> {
    pub fn new(entries: &'a [E], styles: SectionStyles<'a>, layout: LayoutConfig) -> Self {
        Self { entries, styles, layout }
    }
}

impl<E: EntryBlock> SectionRenderer for ListSection<'_, E> {
    fn kind(&self) -> SectionKind {
        E::KIND
    }

    fn render(&self, surface: &mut dyn DocumentSurface) -> Result<(), RenderError> {
        let mut w = SectionWriter::new(surface, self.styles, self.layout);
        w.header(E::KIND.title())?;
        for entry in included(E::KIND, self.entries) {
            entry.write(&mut w)?;
        }
        Ok(())
    }
}

pub type JobsSection<'a> = ListSection<'a, JobEntry>;
pub type EducationSection<'a> = ListSection<'a, EducationEntry>;
pub type CertificationsSection<'a> = ListSection<'a, CertificationEntry>;
pub type VolunteeringSection<'a> = ListSection<'a, VolunteerEntry>;
pub type ProjectsSection<'a> = ListSection<'a, ProjectEntry>;
pub type AwardsSection<'a> = ListSection<'a, AwardEntry>;
pub type LanguagesSection<'a> = ListSection<'a, LanguageEntry>;
pub type ArticlesSection<'a> = ListSection<'a, ArticleEntry>;

impl EntryBlock for JobEntry {
    const KIND: SectionKind = SectionKind::Jobs;

    fn write(&self, w: &mut SectionWriter<'_, '_>) -> Result<(), RenderError> {
        w.cell(&self.title, "title", Some(ENTRY_TITLE_HEIGHT))?;
        w.cell(&self.company, "company", None)?;
        w.cell(&format!("Employment Type: {}", self.employment_type), "details", None)?;
        w.cell(&format!("Duration: {}", self.duration), "details", None)?;
        if let Some(line) = labeled("Description", self.description.as_deref()) {
            w.multi_cell(&line, "details")?;
        }
        if let Some(line) = self.skills.as_deref().and_then(|s| joined("Skills", s)) {
            w.cell(&line, "details", None)?;
        }
        w.spacer("details", SPACER_HEIGHT)
    }
}

impl EntryBlock for EducationEntry {
    const KIND: SectionKind = SectionKind::Education;

    fn write(&self, w: &mut SectionWriter<'_, '_>) -> Result<(), RenderError> {
        w.cell(&self.school, "school", Some(ENTRY_TITLE_HEIGHT))?;
        w.cell(&self.field, "field", None)?;
        w.cell(&format!("Duration: {}", self.duration), "details", None)?;
        if let Some(line) = labeled("Degree", self.degree.as_deref()) {
            w.cell(&line, "details", None)?;
        }
        if let Some(gpa) = &self.gpa {
            w.cell(&format!("GPA: {}", gpa), "details", None)?;
        }
        if let Some(line) = self.activities_and_societies.as_deref().and_then(|a| joined("Clubs", a)) {
            w.cell(&line, "details", None)?;
        }
        if let Some(line) = labeled("Description", self.description.as_deref()) {
            w.multi_cell(&line, "details")?;
        }
        w.spacer("details", SPACER_HEIGHT)
    }
}

impl EntryBlock for CertificationEntry {
    const KIND: SectionKind = SectionKind::Certifications;

    fn write(&self, w: &mut SectionWriter<'_, '_>) -> Result<(), RenderError> {
        w.cell(&self.name, "name", Some(ENTRY_TITLE_HEIGHT))?;
        w.cell(&format!("Issued By: {}", self.issuer), "issuer", None)?;
        w.cell(&format!("Issued On: {}", self.issued_on), "details", None)?;
        w.cell(&format!("Credential ID: {}", self.credential_id), "details", None)?;
        w.spacer("details", SPACER_HEIGHT)
    }
}

impl EntryBlock for VolunteerEntry {
    const KIND: SectionKind = SectionKind::Volunteering;

    fn write(&self, w: &mut SectionWriter<'_, '_>) -> Result<(), RenderError> {
        w.cell(&self.organization, "organization", Some(ENTRY_TITLE_HEIGHT))?;
        w.cell(&self.role, "role", None)?;
        w.cell(&self.cause, "details", None)?;
        w.cell(&format!("Duration: {}", self.duration), "details", None)?;
        if let Some(line) = labeled("Description", self.description.as_deref()) {
            w.multi_cell(&line, "details")?;
        }
        w.spacer("details", SPACER_HEIGHT)
    }
}

impl EntryBlock for ProjectEntry {
    const KIND: SectionKind = SectionKind::Projects;

    fn write(&self, w: &mut SectionWriter<'_, '_>) -> Result<(), RenderError> {
        w.cell(&self.name, "name", Some(ENTRY_TITLE_HEIGHT))?;
        if let Some(link) = &self.link {
            w.link(link, "link")?;
        }
        w.cell(&format!("Duration: {}", self.duration), "details", None)?;
        w.multi_cell(&format!("Description: {}", self.description), "details")?;
        if let Some(line) = joined("Skills", &self.skills) {
            w.cell(&line, "details", None)?;
        }
        w.spacer("details", SPACER_HEIGHT)
    }
}

impl EntryBlock for AwardEntry {
    const KIND: SectionKind = SectionKind::Awards;

    fn write(&self, w: &mut SectionWriter<'_, '_>) -> Result<(), RenderError> {
        w.cell(&self.title, "title", Some(ENTRY_TITLE_HEIGHT))?;
        w.cell(&self.issuer, "issuer", None)?;
        w.cell(&format!("Issued On: {}", self.issued_on), "details", None)?;
        w.multi_cell(&format!("Description: {}", self.description), "details")?;
        w.spacer("details", SPACER_HEIGHT)
    }
}

impl EntryBlock for LanguageEntry {
    const KIND: SectionKind = SectionKind::Languages;

    fn write(&self, w: &mut SectionWriter<'_, '_>) -> Result<(), RenderError> {
        w.cell(&self.language, "language", Some(ENTRY_TITLE_HEIGHT))?;
        w.multi_cell(self.proficiency.as_str(), "proficiency")?;
        w.spacer("proficiency", LANGUAGE_SPACER_HEIGHT)
    }
}

impl EntryBlock for ArticleEntry {
    const KIND: SectionKind = SectionKind::Articles;

    fn write(&self, w: &mut SectionWriter<'_, '_>) -> Result<(), RenderError> {
        w.cell(&self.title, "title", Some(ENTRY_TITLE_HEIGHT))?;
        if let Some(url) = &self.url {
            w.link(url, "link")?;
        }
        w.cell(&format!("Publication: {}", self.publication), "publication", None)?;
        w.cell(&format!("Date: {}", self.date), "details", None)?;
        if let Some(line) = labeled("Description", self.description.as_deref()) {
            w.multi_cell(&line, "details")?;
        }
        w.spacer("details", SPACER_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DatePoint, DateRange, EmploymentType, Proficiency, YearMonth};
    use crate::styles::Template;
    use crate::surface::RecordingSurface;

    fn range() -> DateRange {
        DateRange {
            start: DatePoint::Month(YearMonth { year: 2020, month: 1 }),
            end: DatePoint::Present,
        }
    }

    fn job(title: &str, include: bool) -> JobEntry {
        JobEntry {
            include,
            title: title.into(),
            company: "Analytical Engines Ltd".into(),
            employment_type: EmploymentType::FullTime,
            duration: range(),
            description: None,
            skills: None,
            references: None,
        }
    }

    fn render<E: EntryBlock>(entries: &[E]) -> Vec<String> {
        let t = Template::modern().unwrap();
        let section = ListSection::new(entries, t.styles.section(E::KIND.style_key()).unwrap(), t.layout());
        let mut surface = RecordingSurface::new();
        section.render(&mut surface).unwrap();
        surface.texts().into_iter().map(str::to_string).collect()
    }

    #[test]
    fn test_jobs_block_and_include_filter() {
        let texts = render(&[job("A", true), job("B", false), job("C", true)]);
        assert_eq!(
            texts,
            [
                "Jobs",
                "A",
                "Analytical Engines Ltd",
                "Employment Type: Full-time",
                "Duration: 2020-01 - Present",
                "",
                "C",
                "Analytical Engines Ltd",
                "Employment Type: Full-time",
                "Duration: 2020-01 - Present",
                "",
            ]
        );
    }

    #[test]
    fn test_empty_section_writes_header_only() {
        assert_eq!(render::<AwardEntry>(&[]), ["Awards"]);
    }

    #[test]
    fn test_job_optional_lines() {
        let mut j = job("A", true);
        j.description = Some("Built the engine".into());
        j.skills = Some(vec!["Rust".into(), "Go".into()]);
        let texts = render(&[j]);
        assert!(texts.contains(&"Description: Built the engine".to_string()));
        assert!(texts.contains(&"Skills: Rust, Go".to_string()));

        let mut j = job("A", true);
        j.skills = Some(vec![]);
        assert!(!render(&[j]).iter().any(|t| t.starts_with("Skills")));
    }

    #[test]
    fn test_empty_optional_text_is_skipped() {
        let mut j = job("A", true);
        j.description = Some(String::new());
        assert!(!render(&[j]).iter().any(|t| t.starts_with("Description")));

        let entry = EducationEntry {
            include: true,
            school: "University of London".into(),
            degree: Some(String::new()),
            field: "Mathematics".into(),
            duration: range(),
            gpa: None,
            activities_and_societies: None,
            description: Some(String::new()),
        };
        assert_eq!(
            render(&[entry]),
            ["Education", "University of London", "Mathematics", "Duration: 2020-01 - Present", ""]
        );
    }

    #[test]
    fn test_project_skills_line() {
        let project = |skills: Vec<String>| ProjectEntry {
            include: true,
            name: "Engine".into(),
            duration: range(),
            link: Some("https://ada.dev/engine".into()),
            description: "A difference engine.".into(),
            skills,
        };
        let texts = render(&[project(vec![])]);
        assert_eq!(
            texts,
            [
                "Projects",
                "Engine",
                "https://ada.dev/engine",
                "Duration: 2020-01 - Present",
                "Description: A difference engine.",
                "",
            ]
        );
        let texts = render(&[project(vec!["Rust".into(), "Go".into()])]);
        assert_eq!(texts[5], "Skills: Rust, Go");
    }

    #[test]
    fn test_education_optional_lines() {
        let entry = EducationEntry {
            include: true,
            school: "University of London".into(),
            degree: Some("BSc".into()),
            field: "Mathematics".into(),
            duration: range(),
            gpa: Some(crate::schema::Gpa { text: "3.7".into(), value: 3.7 }),
            activities_and_societies: Some(vec!["Chess".into(), "Rowing".into()]),
            description: None,
        };
        let texts = render(&[entry]);
        assert_eq!(
            texts,
            [
                "Education",
                "University of London",
                "Mathematics",
                "Duration: 2020-01 - Present",
                "Degree: BSc",
                "GPA: 3.7",
                "Clubs: Chess, Rowing",
                "",
            ]
        );
    }

    #[test]
    fn test_certification_and_award_labels() {
        let cert = CertificationEntry {
            include: true,
            name: "AWS SA".into(),
            issuer: "Amazon".into(),
            issued_on: YearMonth { year: 2023, month: 5 },
            credential_id: "ABC-123".into(),
        };
        assert_eq!(
            render(&[cert]),
            ["Certifications", "AWS SA", "Issued By: Amazon", "Issued On: 2023-05", "Credential ID: ABC-123", ""]
        );

        let award = AwardEntry {
            include: true,
            title: "Best Paper".into(),
            issuer: "Royal Society".into(),
            issued_on: YearMonth { year: 1843, month: 9 },
            description: "Notes on the engine.".into(),
        };
        assert_eq!(
            render(&[award]),
            ["Awards", "Best Paper", "Royal Society", "Issued On: 1843-09", "Description: Notes on the engine.", ""]
        );
    }

    #[test]
    fn test_languages_use_short_spacer() {
        let t = Template::modern().unwrap();
        let langs = [LanguageEntry { include: true, language: "French".into(), proficiency: Proficiency::FullProfessional }];
        let section = LanguagesSection::new(&langs, t.styles.section("languages").unwrap(), t.layout());
        let mut surface = RecordingSurface::new();
        section.render(&mut surface).unwrap();
        assert_eq!(surface.texts(), ["Languages", "French", "Full Professional", ""]);
        assert!(matches!(
            surface.commands().last(),
            Some(crate::surface::LayoutCommand::Cell { height, .. }) if *height == LANGUAGE_SPACER_HEIGHT
        ));
    }

    #[test]
    fn test_volunteering_and_article_blocks() {
        let vol = VolunteerEntry {
            include: true,
            organization: "Code Club".into(),
            role: "Mentor".into(),
            cause: "Education".into(),
            duration: range(),
            description: None,
        };
        assert_eq!(
            render(&[vol]),
            ["Volunteering", "Code Club", "Mentor", "Education", "Duration: 2020-01 - Present", ""]
        );

        let article = ArticleEntry {
            include: true,
            title: "Sketch of the Analytical Engine".into(),
            publication: "Taylor's Scientific Memoirs".into(),
            date: YearMonth { year: 1843, month: 8 },
            url: None,
            description: None,
        };
        assert_eq!(
            render(&[article]),
            [
                "Articles",
                "Sketch of the Analytical Engine",
                "Publication: Taylor's Scientific Memoirs",
                "Date: 1843-08",
                "",
            ]
        );
    }
}

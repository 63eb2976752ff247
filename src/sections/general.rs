use crate::schema::GeneralProfile;
use crate::styles::{LayoutConfig, SectionStyles};
use crate::surface::DocumentSurface;

use super::{RenderError, SectionKind, SectionRenderer, SectionWriter};

const NAME_HEIGHT: f32 = 10.0;
const TITLE_HEIGHT: f32 = 8.0;

/// Identity block at the top of the document. Has no header and no include filter.
pub struct GeneralSection<'a> {
    profile: &'a GeneralProfile,
    styles: SectionStyles<'a>,
    layout: LayoutConfig,
}

impl<'a> GeneralSection<'a> {
    pub fn new(profile: &'a GeneralProfile, styles: SectionStyles<'a>, layout: LayoutConfig) -> Self {
        Self { profile, styles, layout }
    }
}

impl SectionRenderer for GeneralSection<'_> {
    fn kind(&self) -> SectionKind {
        SectionKind::General
    }

    fn render(&self, surface: &mut dyn DocumentSurface) -> Result<(), RenderError> {
        let p = self.profile;
        let mut w = SectionWriter::new(surface, self.styles, self.layout);

        w.cell(&p.name, "name", Some(NAME_HEIGHT))?;
        w.cell(&p.title, "title", Some(TITLE_HEIGHT))?;
        w.cell(&p.location, "contact", None)?;
        w.cell(&p.email, "contact", None)?;
        if let Some(phone) = &p.cell_number {
            w.cell(phone, "contact", None)?;
        }
        for url in [&p.portfolio, &p.linkedin, &p.github] {
            w.link(url, "link")?;
        }
        w.cell("Description", "description_header", Some(TITLE_HEIGHT))?;
        w.multi_cell(&p.description, "description")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::Template;
    use crate::surface::{LayoutCommand, RecordingSurface};

    fn profile(phone: Option<&str>) -> GeneralProfile {
        GeneralProfile {
            name: "Ada Lovelace".into(),
            title: "Analyst".into(),
            location: "London".into(),
            email: "ada@example.com".into(),
            cell_number: phone.map(str::to_string),
            portfolio: "https://ada.dev".into(),
            linkedin: "https://linkedin.com/in/ada".into(),
            github: "https://github.com/ada".into(),
            description: "Wrote the first published algorithm.".into(),
        }
    }

    #[test]
    fn test_general_order_and_links() {
        let t = Template::modern().unwrap();
        let p = profile(Some("+14155551234"));
        let section = GeneralSection::new(&p, t.styles.section("general").unwrap(), t.layout());
        let mut surface = RecordingSurface::new();
        section.render(&mut surface).unwrap();

        assert_eq!(
            surface.texts(),
            [
                "Ada Lovelace",
                "Analyst",
                "London",
                "ada@example.com",
                "+14155551234",
                "https://ada.dev",
                "https://linkedin.com/in/ada",
                "https://github.com/ada",
                "Description",
                "Wrote the first published algorithm.",
            ]
        );
        let links = surface
            .commands()
            .iter()
            .filter(|c| matches!(c, LayoutCommand::Link { text, url, .. } if text == url))
            .count();
        assert_eq!(links, 3);
    }

    #[test]
    fn test_phone_omitted_when_absent() {
        let t = Template::modern().unwrap();
        let p = profile(None);
        let section = GeneralSection::new(&p, t.styles.section("general").unwrap(), t.layout());
        let mut surface = RecordingSurface::new();
        section.render(&mut surface).unwrap();
        assert_eq!(surface.texts().len(), 9);
    }
}

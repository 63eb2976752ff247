//! Layout primitives shared by every section renderer.

use crate::styles::{LayoutConfig, SectionStyles};
use crate::surface::DocumentSurface;

use super::RenderError;

/// Section header line height.
pub const HEADER_HEIGHT: f32 = 8.0;
/// Height of the first line of an entry block.
pub const ENTRY_TITLE_HEIGHT: f32 = 5.0;
/// Blank line between entries of one section.
pub const SPACER_HEIGHT: f32 = 5.0;

/// Writes styled lines for one section. Every method leaves the cursor at the
/// left margin of the next line.
pub struct SectionWriter<'s, 'a> {
    surface: &'s mut dyn DocumentSurface,
    styles: SectionStyles<'a>,
    layout: LayoutConfig,
}

impl<'s, 'a> SectionWriter<'s, 'a> {
    pub fn new(surface: &'s mut dyn DocumentSurface, styles: SectionStyles<'a>, layout: LayoutConfig) -> Self {
        Self { surface, styles, layout }
    }

    fn apply(&mut self, role: &str) -> Result<(), RenderError> {
        let style = self.styles.role(role)?;
        self.surface.set_style(style)?;
        Ok(())
    }

    /// Single line; `height` defaults to the shared cell height.
    pub fn cell(&mut self, text: &str, role: &str, height: Option<f32>) -> Result<(), RenderError> {
        self.apply(role)?;
        let height = height.unwrap_or(self.layout.cell_height);
        self.surface.cell(self.layout.cell_width, height, text)?;
        Ok(())
    }

    /// Wrapped at the shared cell width.
    pub fn multi_cell(&mut self, text: &str, role: &str) -> Result<(), RenderError> {
        self.apply(role)?;
        self.surface
            .multi_cell(self.layout.cell_width, self.layout.cell_height, text)?;
        Ok(())
    }

    /// Clickable text equal to the URL itself.
    pub fn link(&mut self, url: &str, role: &str) -> Result<(), RenderError> {
        self.apply(role)?;
        self.surface.link(self.layout.cell_height, url, url)?;
        Ok(())
    }

    pub fn header(&mut self, text: &str) -> Result<(), RenderError> {
        self.cell(text, "section_header", Some(HEADER_HEIGHT))
    }

    pub fn spacer(&mut self, role: &str, height: f32) -> Result<(), RenderError> {
        self.cell("", role, Some(height))
    }
}

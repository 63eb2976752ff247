//! Document Surface - the canvas section renderers write to
//!
//! Every write starts at the left margin and leaves the cursor at the
//! left margin of the next line.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::styles::TextStyle;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Font not registered on surface: {0}")]
    FontNotRegistered(String),

    #[error("Unsupported base font: {0}")]
    UnsupportedFont(String),

    #[error("No style selected before writing text")]
    NoStyle,

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writable canvas contract.
pub trait DocumentSurface {
    /// Select font, decoration, size and colour for following writes.
    fn set_style(&mut self, style: &TextStyle) -> Result<(), SurfaceError>;

    /// Single-line cell of fixed width and height.
    fn cell(&mut self, width: f32, height: f32, text: &str) -> Result<(), SurfaceError>;

    /// Text wrapped at `width`, one line of `line_height` per wrapped line.
    fn multi_cell(&mut self, width: f32, line_height: f32, text: &str) -> Result<(), SurfaceError>;

    /// Clickable text pointing at `url`.
    fn link(&mut self, height: f32, text: &str, url: &str) -> Result<(), SurfaceError>;
}

/// One recorded write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LayoutCommand {
    SetStyle { style: TextStyle },
    Cell { width: f32, height: f32, text: String },
    MultiCell { width: f32, line_height: f32, text: String },
    Link { height: f32, text: String, url: String },
}

impl LayoutCommand {
    /// Text written by this command, if it writes any.
    pub fn text(&self) -> Option<&str> {
        match self {
            LayoutCommand::SetStyle { .. } => None,
            LayoutCommand::Cell { text, .. }
            | LayoutCommand::MultiCell { text, .. }
            | LayoutCommand::Link { text, .. } => Some(text),
        }
    }
}

/// Surface that records layout commands instead of drawing them.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<LayoutCommand>,
    fonts: Option<BTreeSet<String>>,
    styled: bool,
}

impl RecordingSurface {
    /// Accepts any font identifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the given font identifiers resolve.
    pub fn with_fonts<I, S>(fonts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            commands: Vec::new(),
            fonts: Some(fonts.into_iter().map(Into::into).collect()),
            styled: false,
        }
    }

    pub fn commands(&self) -> &[LayoutCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<LayoutCommand> {
        self.commands
    }

    /// Text of every write, in order (spacers included as empty strings).
    pub fn texts(&self) -> Vec<&str> {
        self.commands.iter().filter_map(LayoutCommand::text).collect()
    }

    fn ensure_styled(&self) -> Result<(), SurfaceError> {
        if self.styled {
            Ok(())
        } else {
            Err(SurfaceError::NoStyle)
        }
    }
}

impl DocumentSurface for RecordingSurface {
    fn set_style(&mut self, style: &TextStyle) -> Result<(), SurfaceError> {
        if let Some(fonts) = &self.fonts {
            if !fonts.contains(&style.font) {
                return Err(SurfaceError::FontNotRegistered(style.font.clone()));
            }
        }
        self.styled = true;
        self.commands.push(LayoutCommand::SetStyle { style: style.clone() });
        Ok(())
    }

    fn cell(&mut self, width: f32, height: f32, text: &str) -> Result<(), SurfaceError> {
        self.ensure_styled()?;
        self.commands.push(LayoutCommand::Cell { width, height, text: text.to_string() });
        Ok(())
    }

    fn multi_cell(&mut self, width: f32, line_height: f32, text: &str) -> Result<(), SurfaceError> {
        self.ensure_styled()?;
        self.commands.push(LayoutCommand::MultiCell { width, line_height, text: text.to_string() });
        Ok(())
    }

    fn link(&mut self, height: f32, text: &str, url: &str) -> Result<(), SurfaceError> {
        self.ensure_styled()?;
        self.commands.push(LayoutCommand::Link {
            height,
            text: text.to_string(),
            url: url.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::FontDecoration;

    fn style(font: &str) -> TextStyle {
        TextStyle { font: font.to_string(), style: FontDecoration::Regular, size: 8.0, color: None }
    }

    #[test]
    fn test_records_in_order() {
        let mut s = RecordingSurface::new();
        s.set_style(&style("Body")).unwrap();
        s.cell(190.0, 4.0, "one").unwrap();
        s.multi_cell(190.0, 4.0, "two").unwrap();
        s.link(4.0, "https://x.dev", "https://x.dev").unwrap();
        assert_eq!(s.texts(), ["one", "two", "https://x.dev"]);
        assert_eq!(s.commands().len(), 4);
    }

    #[test]
    fn test_unknown_font_rejected() {
        let mut s = RecordingSurface::with_fonts(["Body"]);
        let err = s.set_style(&style("Heading")).unwrap_err();
        assert!(matches!(err, SurfaceError::FontNotRegistered(f) if f == "Heading"));
    }

    #[test]
    fn test_write_without_style_rejected() {
        let mut s = RecordingSurface::new();
        assert!(matches!(s.cell(1.0, 1.0, "x"), Err(SurfaceError::NoStyle)));
    }

    #[test]
    fn test_command_json_is_tagged() {
        let cmd = LayoutCommand::Cell { width: 1.0, height: 2.0, text: "a".into() };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["op"], "cell");
    }
}

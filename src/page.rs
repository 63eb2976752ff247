//! Page Setup Authority
//!
//! Defines where the page format and margins come from.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const MAX_MARGIN_MM: f32 = 50.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PageError {
    #[error("Margins must be between 0 and {max} mm, got {0}", max = MAX_MARGIN_MM)]
    MarginOutOfRange(f32),
}

/// PageAuthority records which layer decided the page setup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageAuthority {
    /// Engine defaults (fallback)
    #[default]
    System,
    /// Template-defined page block
    Template,
    /// User-provided overrides (with validation)
    User,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageFormat {
    #[default]
    Letter,
    A4,
    Legal,
}

impl PageFormat {
    /// Width and height in millimetres.
    pub fn size_mm(&self) -> (f32, f32) {
        match self {
            PageFormat::Letter => (215.9, 279.4),
            PageFormat::A4 => (210.0, 297.0),
            PageFormat::Legal => (215.9, 355.6),
        }
    }
}

impl std::str::FromStr for PageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "letter" => Ok(PageFormat::Letter),
            "a4" => Ok(PageFormat::A4),
            "legal" => Ok(PageFormat::Legal),
            other => Err(format!("unknown page format: {}", other)),
        }
    }
}

/// Margins in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Margins {
    pub fn uniform(mm: f32) -> Self {
        Self { left: mm, top: mm, right: mm, bottom: mm }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self { left: 10.0, top: 10.0, right: 10.0, bottom: 10.0 }
    }
}

fn template_authority() -> PageAuthority {
    PageAuthority::Template
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSetup {
    #[serde(skip_deserializing, default = "template_authority")]
    pub authority: PageAuthority,
    #[serde(default)]
    pub format: PageFormat,
    #[serde(default)]
    pub margins: Margins,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            authority: PageAuthority::System,
            format: PageFormat::Letter,
            margins: Margins::default(),
        }
    }
}

impl PageSetup {
    /// Create from user with validation
    pub fn from_user(format: PageFormat, margins: Margins) -> Result<Self, PageError> {
        let sides = [margins.left, margins.top, margins.right, margins.bottom];
        if let Some(bad) = sides.iter().find(|m| !m.is_finite() || **m < 0.0 || **m > MAX_MARGIN_MM) {
            return Err(PageError::MarginOutOfRange(*bad));
        }
        Ok(Self {
            authority: PageAuthority::User,
            format,
            margins,
        })
    }

    /// Usable width between the side margins, in millimetres.
    pub fn printable_width(&self) -> f32 {
        self.format.size_mm().0 - self.margins.left - self.margins.right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_page_block_sets_authority() {
        let setup: PageSetup = serde_json::from_str(r#"{"format": "a4"}"#).unwrap();
        assert_eq!(setup.authority, PageAuthority::Template);
        assert_eq!(setup.format, PageFormat::A4);
        assert_eq!(setup.margins, Margins::default());
        assert_eq!(PageSetup::default().authority, PageAuthority::System);

        let user = PageSetup::from_user(PageFormat::A4, Margins::uniform(15.0)).unwrap();
        let json = serde_json::to_value(user).unwrap();
        assert_eq!(json["authority"], "user");
    }

    #[test]
    fn test_user_margins_validated() {
        assert!(PageSetup::from_user(PageFormat::Letter, Margins::default()).is_ok());
        let bad = Margins { left: -1.0, ..Margins::default() };
        assert_eq!(PageSetup::from_user(PageFormat::Letter, bad), Err(PageError::MarginOutOfRange(-1.0)));
    }

    #[test]
    fn test_letter_printable_width_fits_modern_cells() {
        let setup = PageSetup::default();
        assert!(setup.printable_width() >= 190.0);
        assert_eq!("Legal".parse::<PageFormat>().unwrap(), PageFormat::Legal);
    }
}

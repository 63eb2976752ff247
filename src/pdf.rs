//! PDF surface built on `lopdf`.
//!
//! Font identifiers from the template map onto the standard Type1 fonts, so
//! nothing is embedded. Positions are tracked in millimetres from the top-left
//! corner and converted to PDF points when operations are emitted.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::metrics::{text_width_mm, wrap_lines, MetricFamily};
use crate::page::PageSetup;
use crate::styles::{FontDecoration, TextStyle};
use crate::surface::{DocumentSurface, SurfaceError};

const PT_PER_MM: f32 = 72.0 / 25.4;

const STANDARD_FONTS: [&str; 14] = [
    "Helvetica",
    "Helvetica-Bold",
    "Helvetica-Oblique",
    "Helvetica-BoldOblique",
    "Times-Roman",
    "Times-Bold",
    "Times-Italic",
    "Times-BoldItalic",
    "Courier",
    "Courier-Bold",
    "Courier-Oblique",
    "Courier-BoldOblique",
    "Symbol",
    "ZapfDingbats",
];

/// Base font for `base` with `decoration` applied, when the family has that face.
fn styled_base_font(base: &str, decoration: FontDecoration) -> String {
    let variant = match (base, decoration) {
        ("Helvetica", FontDecoration::Bold) => "Helvetica-Bold",
        ("Helvetica", FontDecoration::Italic) => "Helvetica-Oblique",
        ("Times-Roman", FontDecoration::Bold) => "Times-Bold",
        ("Times-Roman", FontDecoration::Italic) => "Times-Italic",
        ("Courier", FontDecoration::Bold) => "Courier-Bold",
        ("Courier", FontDecoration::Italic) => "Courier-Oblique",
        _ => base,
    };
    variant.to_string()
}

/// Encodes text for the WinAnsiEncoding declared on every font.
/// Characters the encoding lacks become `?`.
fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c as u32 {
        0x00..=0x7F | 0xA0..=0xFF => c as u8,
        _ => match c {
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8A,
            '‹' => 0x8B,
            'Œ' => 0x8C,
            'Ž' => 0x8E,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9A,
            '›' => 0x9B,
            'œ' => 0x9C,
            'ž' => 0x9E,
            'Ÿ' => 0x9F,
            _ => b'?',
        },
    }
}

fn rgb(color: [u8; 3]) -> Vec<Object> {
    color.iter().map(|c| (*c as f32 / 255.0).into()).collect()
}

#[derive(Debug, Clone)]
struct ActiveStyle {
    resource: String,
    family: MetricFamily,
    decoration: FontDecoration,
    size: f32,
    color: [u8; 3],
}

/// A single-column document written top to bottom with automatic page breaks.
pub struct PdfSurface {
    document: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    setup: PageSetup,
    /// Font identifier -> base font name.
    fonts: BTreeMap<String, String>,
    /// Base font name -> (resource name, font object).
    font_objects: BTreeMap<String, (String, ObjectId)>,
    content: Content,
    annotations: Vec<ObjectId>,
    cursor_y: f32,
    active: Option<ActiveStyle>,
    info: Option<Dictionary>,
}

impl PdfSurface {
    /// Opens the first page. Every mapped base font must be a standard PDF font.
    pub fn new(setup: PageSetup, fonts: &BTreeMap<String, String>) -> Result<Self, SurfaceError> {
        for base in fonts.values() {
            if !STANDARD_FONTS.contains(&base.as_str()) {
                return Err(SurfaceError::UnsupportedFont(base.clone()));
            }
        }

        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();

        Ok(Self {
            document,
            pages_id,
            page_ids: Vec::new(),
            setup,
            fonts: fonts.clone(),
            font_objects: BTreeMap::new(),
            content: Content { operations: vec![] },
            annotations: Vec::new(),
            cursor_y: setup.margins.top,
            active: None,
            info: None,
        })
    }

    /// Title and author written to the document information dictionary.
    pub fn set_info(&mut self, title: &str, author: &str) {
        self.info = Some(dictionary! {
            "Title" => Object::string_literal(to_win_ansi(title)),
            "Author" => Object::string_literal(to_win_ansi(author)),
            "Producer" => Object::string_literal(format!("resumeforge {}", crate::ENGINE_VERSION)),
        });
    }

    /// Pages written so far, counting the open one.
    pub fn page_count(&self) -> usize {
        self.page_ids.len() + 1
    }

    /// Distance of the cursor from the top edge, in millimetres.
    pub fn cursor_y(&self) -> f32 {
        self.cursor_y
    }

    fn page_size_pt(&self) -> (f32, f32) {
        let (w, h) = self.setup.format.size_mm();
        (w * PT_PER_MM, h * PT_PER_MM)
    }

    fn font_resource(&mut self, base_font: &str) -> String {
        if let Some((resource, _)) = self.font_objects.get(base_font) {
            return resource.clone();
        }
        let resource = format!("F{}", self.font_objects.len() + 1);
        let font_id = self.document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => base_font,
            "Encoding" => "WinAnsiEncoding",
        });
        self.font_objects.insert(base_font.to_string(), (resource.clone(), font_id));
        resource
    }

    fn active(&self) -> Result<&ActiveStyle, SurfaceError> {
        self.active.as_ref().ok_or(SurfaceError::NoStyle)
    }

    fn measure(&self, text: &str) -> Result<f32, SurfaceError> {
        let a = self.active()?;
        Ok(text_width_mm(text, a.size, a.family, a.decoration))
    }

    fn finish_page(&mut self) -> Result<(), SurfaceError> {
        let (page_width, page_height) = self.page_size_pt();
        let content = std::mem::replace(&mut self.content, Content { operations: vec![] });
        let content_id = self.document.add_object(Stream::new(dictionary! {}, content.encode()?));

        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.0.into(), 0.0.into(), page_width.into(), page_height.into()],
            "Contents" => content_id,
        };
        if !self.annotations.is_empty() {
            let annots: Vec<Object> = self.annotations.drain(..).map(Object::from).collect();
            page.set("Annots", annots);
        }
        let page_id = self.document.add_object(page);
        self.page_ids.push(page_id);
        Ok(())
    }

    fn break_page_if_needed(&mut self, height: f32) -> Result<(), SurfaceError> {
        let (_, page_height) = self.setup.format.size_mm();
        let limit = page_height - self.setup.margins.bottom;
        let at_top = (self.cursor_y - self.setup.margins.top).abs() < f32::EPSILON;
        if self.cursor_y + height > limit && !at_top {
            log::debug!("page {} full, starting a new page", self.page_count());
            self.finish_page()?;
            self.cursor_y = self.setup.margins.top;
        }
        Ok(())
    }

    /// Draws one line of text in a cell at the cursor and returns the text width in mm.
    fn draw_line(&mut self, height: f32, text: &str) -> Result<f32, SurfaceError> {
        self.break_page_if_needed(height)?;
        let width = self.measure(text)?;
        let active = self.active()?.clone();

        if !text.is_empty() {
            let (_, page_height) = self.page_size_pt();
            let size_mm = active.size / PT_PER_MM;
            let baseline_mm = self.cursor_y + height / 2.0 + 0.3 * size_mm;
            let x = self.setup.margins.left * PT_PER_MM;
            let y = page_height - baseline_mm * PT_PER_MM;

            let ops = &mut self.content.operations;
            ops.push(Operation::new("BT", vec![]));
            ops.push(Operation::new("Tf", vec![active.resource.as_str().into(), active.size.into()]));
            ops.push(Operation::new("rg", rgb(active.color)));
            ops.push(Operation::new("Td", vec![x.into(), y.into()]));
            ops.push(Operation::new("Tj", vec![Object::string_literal(to_win_ansi(text))]));
            ops.push(Operation::new("ET", vec![]));

            if active.decoration == FontDecoration::Underline {
                let under_y = y - active.size * 0.1;
                ops.push(Operation::new("RG", rgb(active.color)));
                ops.push(Operation::new("w", vec![(active.size * 0.05).into()]));
                ops.push(Operation::new("m", vec![x.into(), under_y.into()]));
                ops.push(Operation::new("l", vec![(x + width * PT_PER_MM).into(), under_y.into()]));
                ops.push(Operation::new("S", vec![]));
            }
        }

        self.cursor_y += height;
        Ok(width)
    }

    /// Closes the open page and assembles the document catalog.
    pub fn into_document(mut self) -> Result<Document, SurfaceError> {
        self.finish_page()?;

        let mut font_dict = Dictionary::new();
        for (resource, id) in self.font_objects.values() {
            font_dict.set(resource.as_bytes(), Object::Reference(*id));
        }
        let resources_id = self.document.add_object(dictionary! { "Font" => font_dict });

        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::from(*id)).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
            "Resources" => resources_id,
        };
        self.document.objects.insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.document.trailer.set("Root", catalog_id);

        if let Some(info) = self.info.take() {
            let info_id = self.document.add_object(info);
            self.document.trailer.set("Info", info_id);
        }

        Ok(self.document)
    }

    pub fn write_to<W: Write>(self, writer: &mut W) -> Result<(), SurfaceError> {
        let mut document = self.into_document()?;
        document.save_to(writer)?;
        Ok(())
    }

    /// Writes the PDF to `path`, creating parent directories.
    pub fn save(self, path: &Path) -> Result<(), SurfaceError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(path)?;
        self.write_to(&mut file)?;
        file.flush()?;
        Ok(())
    }
}

impl DocumentSurface for PdfSurface {
    fn set_style(&mut self, style: &TextStyle) -> Result<(), SurfaceError> {
        let base = self
            .fonts
            .get(&style.font)
            .ok_or_else(|| SurfaceError::FontNotRegistered(style.font.clone()))?;
        let base_font = styled_base_font(base, style.style);
        let resource = self.font_resource(&base_font);
        self.active = Some(ActiveStyle {
            resource,
            family: MetricFamily::of_base_font(&base_font),
            decoration: style.style,
            size: style.size,
            color: style.color.unwrap_or([0, 0, 0]),
        });
        Ok(())
    }

    fn cell(&mut self, _width: f32, height: f32, text: &str) -> Result<(), SurfaceError> {
        self.draw_line(height, text)?;
        Ok(())
    }

    fn multi_cell(&mut self, width: f32, line_height: f32, text: &str) -> Result<(), SurfaceError> {
        let lines = {
            let active = self.active()?;
            let (size, family, decoration) = (active.size, active.family, active.decoration);
            wrap_lines(text, width, |s| text_width_mm(s, size, family, decoration))
        };
        for line in lines {
            self.draw_line(line_height, &line)?;
        }
        Ok(())
    }

    fn link(&mut self, height: f32, text: &str, url: &str) -> Result<(), SurfaceError> {
        let top = {
            self.break_page_if_needed(height)?;
            self.cursor_y
        };
        let width = self.draw_line(height, text)?;

        let (_, page_height) = self.page_size_pt();
        let x0 = self.setup.margins.left * PT_PER_MM;
        let rect = vec![
            x0.into(),
            (page_height - (top + height) * PT_PER_MM).into(),
            (x0 + width * PT_PER_MM).into(),
            (page_height - top * PT_PER_MM).into(),
        ];
        let action = dictionary! {
            "S" => "URI",
            "URI" => Object::string_literal(url.as_bytes().to_vec()),
        };
        let annot = dictionary! {
            "Type" => "Annot",
            "Subtype" => "Link",
            "Rect" => rect,
            "Border" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(0)],
            "A" => action,
        };
        let annot_id = self.document.add_object(annot);
        self.annotations.push(annot_id);
        Ok(())
    }
}

impl From<lopdf::Error> for SurfaceError {
    fn from(e: lopdf::Error) -> Self {
        SurfaceError::Pdf(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fonts() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("Body".to_string(), "Helvetica".to_string()),
            ("Heading".to_string(), "Helvetica-Bold".to_string()),
        ])
    }

    fn body() -> TextStyle {
        TextStyle { font: "Body".into(), style: FontDecoration::Regular, size: 8.0, color: None }
    }

    fn bytes(surface: PdfSurface) -> Vec<u8> {
        let mut out = Vec::new();
        surface.write_to(&mut out).unwrap();
        out
    }

    #[test]
    fn test_writes_pdf_with_link() {
        let mut s = PdfSurface::new(PageSetup::default(), &fonts()).unwrap();
        s.set_info("Resume - Ada", "Ada");
        s.set_style(&body()).unwrap();
        s.cell(190.0, 4.0, "Ada Lovelace").unwrap();
        s.link(4.0, "https://ada.dev", "https://ada.dev").unwrap();
        let out = bytes(s);
        let text = String::from_utf8_lossy(&out);
        assert!(out.starts_with(b"%PDF-1.5"));
        assert!(text.contains("/URI"));
        assert!(text.contains("Helvetica"));
    }

    #[test]
    fn test_cursor_advances_and_pages_break() {
        let mut s = PdfSurface::new(PageSetup::default(), &fonts()).unwrap();
        s.set_style(&body()).unwrap();
        let top = s.cursor_y();
        s.cell(190.0, 4.0, "line").unwrap();
        assert!((s.cursor_y() - top - 4.0).abs() < 1e-4);
        for _ in 0..100 {
            s.cell(190.0, 4.0, "line").unwrap();
        }
        assert!(s.page_count() >= 2);
    }

    #[test]
    fn test_multi_cell_wraps() {
        let mut s = PdfSurface::new(PageSetup::default(), &fonts()).unwrap();
        s.set_style(&body()).unwrap();
        let top = s.cursor_y();
        s.multi_cell(20.0, 4.0, "a description long enough to need several lines").unwrap();
        assert!(s.cursor_y() - top >= 8.0);
    }

    #[test]
    fn test_unmapped_and_unsupported_fonts() {
        let mut s = PdfSurface::new(PageSetup::default(), &fonts()).unwrap();
        let style = TextStyle { font: "Missing".into(), ..body() };
        assert!(matches!(s.set_style(&style), Err(SurfaceError::FontNotRegistered(_))));

        let bad = BTreeMap::from([("Body".to_string(), "DejaVuSans".to_string())]);
        assert!(matches!(PdfSurface::new(PageSetup::default(), &bad), Err(SurfaceError::UnsupportedFont(_))));
    }

    #[test]
    fn test_win_ansi_punctuation() {
        assert_eq!(to_win_ansi("caf\u{e9}"), b"caf\xE9");
        assert_eq!(to_win_ansi("\u{2018}\u{2019}\u{201C}\u{201D}\u{2022}\u{20AC}"), [0x91, 0x92, 0x93, 0x94, 0x95, 0x80]);
        // C1 controls have no glyph in the encoding.
        assert_eq!(to_win_ansi("\u{85}"), b"?");
    }

    #[test]
    fn test_text_operand_uses_win_ansi() {
        let mut s = PdfSurface::new(PageSetup::default(), &fonts()).unwrap();
        s.set_style(&body()).unwrap();
        s.cell(190.0, 4.0, "Ada\u{2019}s work \u{2013} \u{141}ukasz").unwrap();
        let out = bytes(s);
        let expected: &[u8] = b"(Ada\x92s work \x96 ?ukasz) Tj";
        assert!(out.windows(expected.len()).any(|w| w == expected));
    }

    #[test]
    fn test_bold_decoration_selects_bold_face() {
        assert_eq!(styled_base_font("Helvetica", FontDecoration::Bold), "Helvetica-Bold");
        assert_eq!(styled_base_font("Helvetica-Bold", FontDecoration::Bold), "Helvetica-Bold");
        assert_eq!(styled_base_font("Times-Roman", FontDecoration::Underline), "Times-Roman");
    }
}

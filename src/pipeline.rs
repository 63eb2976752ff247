//! Rendering Pipeline - Single Entry Point
//!
//! Every render validates the raw resume first. Styles are checked for every
//! selected section before the first write, so a bad template never produces
//! a partial document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

use crate::hashing::{compute_job_hash, layout_digest};
use crate::page::{PageError, PageSetup};
use crate::pdf::PdfSurface;
use crate::schema::Resume;
use crate::sections::{RenderError, SectionKind};
use crate::styles::{StyleError, Template, TemplateError, TemplateRegistry};
use crate::surface::{DocumentSurface, LayoutCommand, RecordingSurface, SurfaceError};
use crate::validation::ValidationError;
use crate::ENGINE_VERSION;

#[cfg(feature = "test-hooks")]
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "test-hooks")]
static VALIDATION_CALL_COUNT: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "test-hooks")]
pub fn get_validation_call_count() -> u32 {
    VALIDATION_CALL_COUNT.load(Ordering::SeqCst)
}

#[cfg(feature = "test-hooks")]
pub fn reset_validation_call_count() {
    VALIDATION_CALL_COUNT.store(0, Ordering::SeqCst);
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Invalid page setup: {0}")]
    Page(#[from] PageError),

    #[error("Template cannot render: {0}")]
    Style(#[from] StyleError),

    #[error("Render failed: {0}")]
    Render(#[from] RenderError),

    #[error("Output failed: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn is_validation(&self) -> bool {
        matches!(self, PipelineError::Validation(_))
    }
}

fn default_template() -> String {
    "modern".to_string()
}

fn default_sections() -> Vec<SectionKind> {
    SectionKind::SELECTABLE.to_vec()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderRequest {
    #[serde(default = "default_template")]
    pub template_id: String,
    /// Sections after General, in output order.
    #[serde(default = "default_sections")]
    pub sections: Vec<SectionKind>,
    /// User page format and margins, replacing the template's page block.
    #[serde(default)]
    pub page: Option<PageSetup>,
    /// Raw resume document, validated by the pipeline.
    pub resume: Value,
}

impl RenderRequest {
    pub fn new(resume: Value) -> Self {
        Self {
            template_id: default_template(),
            sections: default_sections(),
            page: None,
            resume,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderManifest {
    pub id: String,
    pub template_id: String,
    pub template_version: String,
    pub engine_version: String,
    pub created_at: DateTime<Utc>,
    pub sections: Vec<SectionKind>,
    pub page: PageSetup,
    pub command_count: usize,
    pub layout_digest: String,
    pub job_hash: String,
}

/// Validated resume plus the layout it produced.
#[derive(Debug, Clone)]
pub struct RenderedResume {
    pub resume: Resume,
    pub manifest: RenderManifest,
    pub commands: Vec<LayoutCommand>,
}

/// General first, then the selection with duplicates dropped.
pub fn section_order(selection: &[SectionKind]) -> Vec<SectionKind> {
    let mut order = vec![SectionKind::General];
    for kind in selection {
        if order.contains(kind) {
            log::warn!("section {} selected more than once; keeping the first", kind);
            continue;
        }
        order.push(*kind);
    }
    order
}

/// Runs each section's renderer in order against one surface.
pub fn render_sections(
    resume: &Resume,
    template: &Template,
    order: &[SectionKind],
    surface: &mut dyn DocumentSurface,
) -> Result<(), RenderError> {
    for kind in order {
        let renderer = kind.renderer(resume, &template.styles, template.layout())?;
        log::debug!("rendering section {}", renderer.kind());
        renderer.render(surface)?;
    }
    Ok(())
}

/// Writes a recorded command stream onto another surface.
pub fn replay(commands: &[LayoutCommand], surface: &mut dyn DocumentSurface) -> Result<(), SurfaceError> {
    for command in commands {
        match command {
            LayoutCommand::SetStyle { style } => surface.set_style(style)?,
            LayoutCommand::Cell { width, height, text } => surface.cell(*width, *height, text)?,
            LayoutCommand::MultiCell { width, line_height, text } => {
                surface.multi_cell(*width, *line_height, text)?
            }
            LayoutCommand::Link { height, text, url } => surface.link(*height, text, url)?,
        }
    }
    Ok(())
}

/// The rendering pipeline - single entry point for resume output
pub struct RenderPipeline {
    registry: TemplateRegistry,
}

impl RenderPipeline {
    pub fn new(registry: TemplateRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn list_templates(&self) -> Vec<&Template> {
        self.registry.list()
    }

    pub fn get_template(&self, id: &str) -> Option<&Template> {
        self.registry.get(id)
    }

    /// Validate a raw resume document.
    ///
    /// This is the ONLY validation entry point.
    pub fn validate(&self, input: &Value) -> Result<Resume, ValidationError> {
        #[cfg(feature = "test-hooks")]
        VALIDATION_CALL_COUNT.fetch_add(1, Ordering::SeqCst);

        Resume::from_value(input)
    }

    /// Resolves the template and checks it can style every section in `order`.
    pub fn prepare(&self, template_id: &str, order: &[SectionKind]) -> Result<&Template, PipelineError> {
        let template = self
            .registry
            .get(template_id)
            .ok_or_else(|| PipelineError::TemplateNotFound(template_id.to_string()))?;

        template.check_engine(ENGINE_VERSION)?;
        if template.deprecated {
            log::warn!(
                "template {} is deprecated{}",
                template.id,
                template
                    .superseded_by
                    .as_deref()
                    .map(|s| format!(", superseded by {}", s))
                    .unwrap_or_default()
            );
        }

        for kind in order {
            kind.check_styles(&template.styles)?;
        }
        Ok(template)
    }

    /// Validate, preflight and render to a command stream.
    ///
    /// Always validates internally. There is no way to render unvalidated data.
    pub fn render(&self, request: &RenderRequest) -> Result<RenderedResume, PipelineError> {
        let resume = self.validate(&request.resume)?;
        let order = section_order(&request.sections);
        let template = self.prepare(&request.template_id, &order)?;
        let page = match request.page {
            Some(user) => PageSetup::from_user(user.format, user.margins)?,
            None => template.page,
        };
        let layout = template.layout();
        if layout.cell_width > page.printable_width() + f32::EPSILON {
            log::warn!(
                "cells are {} mm wide but the {:?} page leaves {:.1} mm between margins",
                layout.cell_width,
                page.format,
                page.printable_width()
            );
        }

        let mut surface = RecordingSurface::with_fonts(template.fonts.keys().cloned());
        render_sections(&resume, template, &order, &mut surface)?;
        let commands = surface.into_commands();

        let job_hash = compute_job_hash(template, &resume, ENGINE_VERSION)?;
        let manifest = RenderManifest {
            id: Uuid::new_v4().to_string(),
            template_id: template.id.clone(),
            template_version: template.template_version.clone(),
            engine_version: ENGINE_VERSION.to_string(),
            created_at: Utc::now(),
            sections: order,
            page,
            command_count: commands.len(),
            layout_digest: layout_digest(&commands)?,
            job_hash,
        };

        log::info!(
            "rendered {} sections for {} ({} commands, layout {})",
            manifest.sections.len(),
            resume.general.name,
            manifest.command_count,
            &manifest.layout_digest[..12]
        );

        Ok(RenderedResume { resume, manifest, commands })
    }

    /// Render and write the PDF to `path`.
    pub fn render_pdf(&self, request: &RenderRequest, path: &Path) -> Result<RenderedResume, PipelineError> {
        let rendered = self.render(request)?;
        self.write_pdf(&rendered, path)?;
        Ok(rendered)
    }

    /// Replays an already rendered resume onto a PDF at `path`.
    pub fn write_pdf(&self, rendered: &RenderedResume, path: &Path) -> Result<(), PipelineError> {
        let template = self
            .registry
            .get(&rendered.manifest.template_id)
            .ok_or_else(|| PipelineError::TemplateNotFound(rendered.manifest.template_id.clone()))?;

        let mut pdf = PdfSurface::new(rendered.manifest.page, &template.fonts)?;
        let general = &rendered.resume.general;
        pdf.set_info(
            &format!("Resume - {} - {}", general.name, rendered.resume.application.job),
            &general.name,
        );
        replay(&rendered.commands, &mut pdf)?;
        let pages = pdf.page_count();
        pdf.save(path)?;

        log::info!("wrote {} ({} pages)", path.display(), pages);
        Ok(())
    }
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self::new(TemplateRegistry::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_order_puts_general_first() {
        let order = section_order(&[SectionKind::Jobs, SectionKind::General, SectionKind::Jobs, SectionKind::Awards]);
        assert_eq!(order, [SectionKind::General, SectionKind::Jobs, SectionKind::Awards]);
    }

    #[test]
    fn test_unknown_template() {
        let pipeline = RenderPipeline::new(TemplateRegistry::builtin().unwrap());
        assert!(matches!(
            pipeline.prepare("classic", &[SectionKind::General]),
            Err(PipelineError::TemplateNotFound(_))
        ));
    }

    #[test]
    fn test_preflight_reports_missing_role() {
        let mut template = Template::modern().unwrap();
        template.id = "sparse".to_string();
        template.styles = crate::styles::StyleTable::new();
        let mut registry = TemplateRegistry::builtin().unwrap();
        registry.register(template);
        let pipeline = RenderPipeline::new(registry);

        let err = pipeline.prepare("sparse", &[SectionKind::General]).unwrap_err();
        assert!(matches!(err, PipelineError::Style(StyleError::MissingSection(s)) if s == "general"));
    }

    #[test]
    fn test_user_page_overrides_template() {
        let pipeline = RenderPipeline::new(TemplateRegistry::builtin().unwrap());
        let resume = serde_json::from_str(include_str!("../demos/resume.json")).unwrap();

        let mut request = RenderRequest::new(resume);
        let rendered = pipeline.render(&request).unwrap();
        assert_eq!(rendered.manifest.page.authority, crate::PageAuthority::Template);

        request.page = Some(PageSetup { format: crate::PageFormat::A4, ..PageSetup::default() });
        let rendered = pipeline.render(&request).unwrap();
        assert_eq!(rendered.manifest.page.authority, crate::PageAuthority::User);
        assert_eq!(rendered.manifest.page.format, crate::PageFormat::A4);

        request.page = Some(PageSetup { margins: crate::page::Margins::uniform(80.0), ..PageSetup::default() });
        assert!(matches!(pipeline.render(&request), Err(PipelineError::Page(PageError::MarginOutOfRange(_)))));
    }

    #[test]
    fn test_replay_reproduces_stream() {
        let template = Template::modern().unwrap();
        let style = template.styles.lookup("jobs", "details").unwrap().clone();
        let commands = vec![
            LayoutCommand::SetStyle { style },
            LayoutCommand::Cell { width: 190.0, height: 4.0, text: "x".into() },
            LayoutCommand::Link { height: 4.0, text: "https://a.dev".into(), url: "https://a.dev".into() },
        ];
        let mut surface = RecordingSurface::new();
        replay(&commands, &mut surface).unwrap();
        assert_eq!(surface.commands(), commands.as_slice());
    }
}

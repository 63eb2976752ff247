//! ResumeForge Core - Resume Compiler
//!
//! # Rules
//! 1. Data Is Validated Once, Up Front
//! 2. Templates Are Contracts (no style fallbacks)
//! 3. Sections Render In Caller Order, Entries In Input Order
//! 4. Deterministic Output
//! 5. Manifests Enable Reproduction

pub mod config;
pub mod hashing;
pub mod metrics;
pub mod page;
pub mod pdf;
pub mod pipeline;
pub mod schema;
pub mod sections;
pub mod styles;
pub mod surface;
pub mod validation;

pub use config::{AppConfig, ConfigError};
pub use hashing::{canonical_json, compute_job_hash, layout_digest};
pub use page::{Margins, PageAuthority, PageError, PageFormat, PageSetup};
pub use pdf::PdfSurface;
pub use pipeline::{PipelineError, RenderManifest, RenderPipeline, RenderRequest, RenderedResume};
pub use schema::Resume;
pub use sections::{RenderError, SectionKind, SectionRenderer};
pub use styles::{StyleError, StyleTable, Template, TemplateId, TemplateRegistry, TextStyle};
pub use surface::{DocumentSurface, LayoutCommand, RecordingSurface, SurfaceError};
pub use validation::{ValidationError, ValidationViolation};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

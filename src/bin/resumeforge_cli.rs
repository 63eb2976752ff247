//! ResumeForge CLI
//!
//! Commands: templates, validate, render
//! Outputs JSON to stdout, logs to stderr
//! Returns 2 on validation failure, 1 on any other failure

use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use resumeforge_core::{
    AppConfig, Margins, PageFormat, PageSetup, PipelineError, RenderPipeline, RenderRequest, ValidationError,
};

#[derive(Parser)]
#[command(name = "resumeforge-cli")]
#[command(about = "ResumeForge CLI - validated resumes rendered to PDF")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to resumeforge.json when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available templates
    Templates,

    /// Validate a resume document
    Validate {
        /// Resume JSON file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Validate and render a resume to PDF
    Render {
        /// Resume JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Template ID (overrides config)
        #[arg(short, long)]
        template: Option<String>,

        /// Output PDF path (defaults to the configured naming scheme)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Page format (letter, a4, legal), replacing the template's
        #[arg(long)]
        format: Option<PageFormat>,

        /// Uniform page margin in mm (requires --format)
        #[arg(long, requires = "format")]
        margin: Option<f32>,

        /// Also print the layout command stream
        #[arg(long)]
        commands: bool,
    },
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("failed to serialize output: {}", e),
    }
}

/// Unreadable files are I/O errors; unparseable JSON is malformed input.
fn read_input(path: &Path) -> Result<Value, PipelineError> {
    let content = fs::read_to_string(path)?;
    let value = serde_json::from_str(&content).map_err(|e| ValidationError::Malformed {
        path: "$".to_string(),
        message: e.to_string(),
    })?;
    Ok(value)
}

/// Prints the error and maps it to the exit code.
fn fail(e: &PipelineError) -> ExitCode {
    match e {
        PipelineError::Validation(v) => {
            print_json(&json!({
                "valid": false,
                "structural": v.is_structural(),
                "error": v.to_string(),
                "violation": v.violation(),
            }));
            ExitCode::from(2)
        }
        other => {
            print_json(&json!({"success": false, "error": other.to_string()}));
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "resumeforge_core=info");
    }
    env_logger::init();

    let cli = Cli::parse();

    let config = match AppConfig::load_or_default(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            print_json(&json!({"success": false, "error": e.to_string()}));
            return ExitCode::FAILURE;
        }
    };

    let registry = match config.registry() {
        Ok(r) => r,
        Err(e) => {
            print_json(&json!({"success": false, "error": format!("Failed to load templates: {}", e)}));
            return ExitCode::FAILURE;
        }
    };

    let pipeline = RenderPipeline::new(registry);

    match cli.command {
        Commands::Templates => {
            let templates: Vec<_> = pipeline
                .list_templates()
                .iter()
                .map(|t| {
                    json!({
                        "id": t.id,
                        "name": t.name,
                        "version": t.template_version,
                        "page": t.page.format,
                        "deprecated": t.deprecated,
                    })
                })
                .collect();
            print_json(&Value::Array(templates));
            ExitCode::SUCCESS
        }

        Commands::Validate { input } => {
            let result = read_input(&input).and_then(|raw| Ok(pipeline.validate(&raw)?));
            match result {
                Ok(resume) => {
                    print_json(&json!({
                        "valid": true,
                        "name": resume.general.name,
                        "entries": {
                            "jobs": resume.jobs.len(),
                            "education": resume.education.len(),
                            "certifications": resume.certifications.len(),
                            "volunteering": resume.volunteering.len(),
                            "projects": resume.projects.len(),
                            "awards": resume.awards.len(),
                            "languages": resume.languages.len(),
                            "articles": resume.articles.len(),
                        },
                    }));
                    ExitCode::SUCCESS
                }
                Err(e) => fail(&e),
            }
        }

        Commands::Render { input, template, output, format, margin, commands } => {
            if template.is_none() {
                if let Err(e) = config.check_template(pipeline.registry()) {
                    print_json(&json!({"success": false, "error": e.to_string()}));
                    return ExitCode::FAILURE;
                }
            }

            let raw = match read_input(&input) {
                Ok(v) => v,
                Err(e) => return fail(&e),
            };

            let page = format.map(|format| PageSetup {
                format,
                margins: margin.map(Margins::uniform).unwrap_or_default(),
                ..PageSetup::default()
            });

            let request = RenderRequest {
                template_id: template.unwrap_or_else(|| config.template.clone()),
                sections: config.sections.clone(),
                page,
                resume: raw,
            };

            // The naming scheme needs validated names, so the path is resolved after rendering.
            let result = pipeline.render(&request).and_then(|rendered| {
                let path = match &output {
                    Some(p) => p.clone(),
                    None => {
                        let today = chrono::Local::now().date_naive();
                        config.output_path(&rendered.resume.application, &rendered.resume.general, today)
                    }
                };
                pipeline.write_pdf(&rendered, &path)?;
                Ok((rendered, path))
            });

            match result {
                Ok((rendered, path)) => {
                    let mut out = json!({
                        "success": true,
                        "output": path,
                        "manifest": rendered.manifest,
                    });
                    if commands {
                        out["commands"] = json!(rendered.commands);
                    }
                    print_json(&out);
                    ExitCode::SUCCESS
                }
                Err(e) => fail(&e),
            }
        }
    }
}

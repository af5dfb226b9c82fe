#![deny(missing_docs)]

//! # Generate Command
//!
//! Reads a descriptor file, assembles the API document and writes it as
//! Swagger 2.0 JSON or YAML.

use endpoint_doc_core::document::wire;
use endpoint_doc_core::error::{AppError, AppResult};
use endpoint_doc_core::{assemble, DescriptorSet, Settings};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Descriptor file (.yaml/.yml or .json).
    #[clap(long, env = "ENDPOINT_DOC_INPUT")]
    pub input: PathBuf,

    /// Optional settings file (.yaml/.yml or .json).
    #[clap(long, env = "ENDPOINT_DOC_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Output path for the document.
    /// Supports .json and .yaml/.yml extensions.
    /// If not provided, prints JSON to stdout.
    #[clap(long)]
    pub output: Option<PathBuf>,

    /// Route template for methods without an explicit route.
    /// Example: `"api/{controller}/{action}/{id}"`
    #[clap(long, env = "ENDPOINT_DOC_URL_TEMPLATE")]
    pub url_template: Option<String>,

    /// Method name excluded from the document.
    #[clap(long, env = "ENDPOINT_DOC_EXCLUDED_METHOD")]
    pub excluded_method: Option<String>,

    /// Document title.
    #[clap(long)]
    pub title: Option<String>,

    /// Document version.
    #[clap(long)]
    pub api_version: Option<String>,
}

impl GenerateArgs {
    /// Loads the settings file, if any, and applies command line overrides.
    pub fn resolve_settings(&self) -> AppResult<Settings> {
        let mut settings = match &self.settings {
            Some(path) => Settings::from_file(path)?,
            None => Settings::default(),
        };
        if let Some(template) = &self.url_template {
            settings = settings.with_url_template(template);
        }
        if let Some(name) = &self.excluded_method {
            settings = settings.with_excluded_method_name(name);
        }
        if let Some(title) = &self.title {
            settings.title = title.clone();
        }
        if let Some(version) = &self.api_version {
            settings.version = version.clone();
        }
        Ok(settings)
    }
}

/// Executes the document generation.
///
/// # Arguments
///
/// * `args` - Command arguments.
pub fn execute(args: &GenerateArgs) -> AppResult<()> {
    if !args.input.exists() {
        return Err(AppError::General(format!(
            "Descriptor file not found: {:?}",
            args.input
        )));
    }

    let settings = args.resolve_settings()?;
    let descriptors = DescriptorSet::from_file(&args.input)?;
    let document = assemble(&descriptors, &settings)?;

    let output_str = match &args.output {
        Some(out_path) if is_yaml(out_path) => wire::to_yaml(&document)?,
        _ => wire::to_json_string(&document)?,
    };

    if let Some(out_path) = &args.output {
        if let Some(parent) = out_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    AppError::General(format!("Failed to create output directory: {}", e))
                })?;
            }
        }
        fs::write(out_path, output_str)
            .map_err(|e| AppError::General(format!("Failed to write output file: {}", e)))?;
        info!(
            output = %out_path.display(),
            operations = document.operation_count(),
            "Document generated"
        );
    } else {
        println!("{}", output_str);
    }

    Ok(())
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

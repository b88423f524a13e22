use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use engine_logging::engine_info;
use minijinja::{context, Environment};
use thiserror::Error;

use crate::error::ConfigurationError;
use crate::harvest::HarvestOutcome;
use crate::persist::{ReportWriter, PersistError};

/// Template variable holding the list of report fragments.
pub const FRAGMENTS_VARIABLE: &str = "html_chunks";
pub const DEFAULT_OUTPUT_FILENAME: &str = "ssawg_trending.html";

const DEFAULT_TEMPLATE: &str = include_str!("../templates/trending.html");

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("cannot render report template")]
    Render(#[from] minijinja::Error),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Jinja-style report skeleton. `html_chunks` is a list of ready-made markup
/// fragments and is inserted without escaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    text: String,
}

impl Default for Template {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl Template {
    pub fn new(text: impl Into<String>) -> Result<Self, ConfigurationError> {
        let text = text.into();
        let uses_fragments = environment()
            .template_from_str(&text)
            .map_err(|err| ConfigurationError::Template {
                message: err.to_string(),
            })?
            .undeclared_variables(false)
            .contains(FRAGMENTS_VARIABLE);
        if !uses_fragments {
            return Err(ConfigurationError::Template {
                message: format!("template never uses `{FRAGMENTS_VARIABLE}`"),
            });
        }
        Ok(Self { text })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigurationError::TemplateFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(text)
    }

    pub fn render(&self, fragments: &[String], metadata: &RenderMetadata) -> Result<String, ReportError> {
        let rendered = environment().render_str(
            &self.text,
            context! {
                html_chunks => fragments,
                update_time => metadata.update_time(),
            },
        )?;
        Ok(rendered)
    }
}

// Auto-escaping is keyed on the template name and `*_str` templates have none.
fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_keep_trailing_newline(true);
    env
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderMetadata {
    pub generated_at: DateTime<Utc>,
}

impl RenderMetadata {
    pub fn new(generated_at: DateTime<Utc>) -> Self {
        Self { generated_at }
    }

    /// `ctime`-style stamp, e.g. `Wed Oct 16 09:05:00 2024 UTC`.
    pub fn update_time(&self) -> String {
        self.generated_at.format("%a %b %e %H:%M:%S %Y UTC").to_string()
    }
}

/// Concatenates the fragments of every page in harvest order.
pub fn assemble(outcomes: Vec<HarvestOutcome>) -> Vec<String> {
    outcomes
        .into_iter()
        .flat_map(HarvestOutcome::into_fragments)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub output_path: PathBuf,
    pub succeeded: usize,
    pub failed: usize,
}

/// Renders the outcomes into `writer`'s directory under `filename`.
pub fn write_report(
    writer: &ReportWriter,
    filename: &str,
    template: &Template,
    outcomes: Vec<HarvestOutcome>,
    metadata: &RenderMetadata,
) -> Result<ReportSummary, ReportError> {
    let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
    let failed = outcomes.len() - succeeded;
    let fragments = assemble(outcomes);
    let document = template.render(&fragments, metadata)?;
    let output_path = writer.write(filename, &document)?;
    engine_info!(
        "Wrote {} ({} fragments, {} pages ok, {} failed)",
        output_path.display(),
        fragments.len(),
        succeeded,
        failed
    );
    Ok(ReportSummary {
        output_path,
        succeeded,
        failed,
    })
}

//! Local file system input loader
//!
//! Text sources are either literal text or `file:<path>`. Remote sources
//! (`http...`) are rejected. Source files are always read from disk and
//! rendered as `<path>` followed by their content.

use curlgen_domain::TaskPrompt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const FILE_PREFIX: &str = "file:";

/// Errors that can occur while loading prompt inputs
#[derive(Error, Debug)]
pub enum InputError {
    #[error("A task is required (literal text or file:<path>)")]
    MissingTask,

    #[error("At least one file is required (--files)")]
    MissingFiles,

    #[error("{what} from a URL is not supported: {source_ref}")]
    RemoteSource {
        what: &'static str,
        source_ref: String,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What the user pointed us at, before anything is read
#[derive(Debug, Clone, Default)]
pub struct PromptSources {
    pub task: Option<String>,
    pub files: Vec<PathBuf>,
    pub examples: Option<String>,
    pub api_gateway_schema: Option<String>,
    pub additional_info: Option<String>,
    pub requires_login: bool,
}

/// Reads prompt inputs from the local file system
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalInputLoader;

impl LocalInputLoader {
    pub fn new() -> Self {
        Self
    }

    /// Read every source and build the prompt inputs.
    pub fn load(&self, sources: &PromptSources) -> Result<TaskPrompt, InputError> {
        let task = match sources.task.as_deref() {
            Some(task) => self.load_text("Task", task)?,
            None => String::new(),
        };
        if task.trim().is_empty() {
            return Err(InputError::MissingTask);
        }

        let files = self.load_files(&sources.files)?;

        let mut prompt = TaskPrompt::new(task, files).with_requires_login(sources.requires_login);
        if let Some(examples) = sources.examples.as_deref() {
            prompt = prompt.with_examples(self.load_text("Examples", examples)?);
        }
        if let Some(schema) = sources.api_gateway_schema.as_deref() {
            prompt = prompt.with_api_gateway_schema(self.load_schema(schema)?);
        }
        if let Some(info) = &sources.additional_info {
            prompt = prompt.with_additional_info(info.clone());
        }
        Ok(prompt)
    }

    /// Literal text, or the contents of `file:<path>`.
    pub fn load_text(&self, what: &'static str, source: &str) -> Result<String, InputError> {
        if let Some(path) = source.strip_prefix(FILE_PREFIX) {
            return read(Path::new(path));
        }
        if source.starts_with("http") {
            return Err(InputError::RemoteSource {
                what,
                source_ref: source.to_string(),
            });
        }
        Ok(source.to_string())
    }

    /// Like [`load_text`](Self::load_text), but a bare path to an existing file is read too.
    pub fn load_schema(&self, source: &str) -> Result<String, InputError> {
        let path = Path::new(source);
        if !source.starts_with(FILE_PREFIX) && path.is_file() {
            return read(path);
        }
        self.load_text("API gateway schema", source)
    }

    /// Each file as `<path>\n<content>`, joined by newlines.
    pub fn load_files(&self, files: &[PathBuf]) -> Result<String, InputError> {
        if files.is_empty() {
            return Err(InputError::MissingFiles);
        }
        let rendered = files
            .iter()
            .map(|path| Ok(format!("<{}>\n{}", path.display(), read(path)?)))
            .collect::<Result<Vec<_>, InputError>>()?;
        Ok(rendered.join("\n"))
    }
}

fn read(path: &Path) -> Result<String, InputError> {
    debug!("Reading {}", path.display());
    fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })
}

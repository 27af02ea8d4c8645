//! In-place edits of a TOML config file (`config set` / `config reset`)

use super::file_config::{FileConfig, Severity};
use super::loader::ConfigLoader;
use curlgen_domain::util::mask_secret;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use toml::{Table, Value};

/// Dotted keys accepted by `config set`.
pub const SETTABLE_KEYS: &[&str] = &[
    "providers.openai.api_key_env",
    "providers.openai.api_key",
    "providers.openai.base_url",
    "providers.openai.max_tokens",
    "providers.anthropic.api_key_env",
    "providers.anthropic.api_key",
    "providers.anthropic.base_url",
    "providers.anthropic.max_tokens",
    "providers.anthropic.api_version",
    "run.max_turns",
    "run.execute_commands",
    "run.provider_timeout_secs",
    "run.command_timeout_secs",
    "run.max_retries",
    "output.format",
    "output.color",
    "logging.conversation_log",
];

#[derive(Error, Debug)]
pub enum ConfigEditError {
    #[error("Unknown config key `{0}`")]
    UnknownKey(String),

    #[error("Invalid value for `{key}`: {message}")]
    InvalidValue { key: String, message: String },

    #[error("No config directory on this platform")]
    NoConfigDir,

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Edits one config file, leaving keys it does not touch as they were.
pub struct ConfigEditor {
    path: PathBuf,
}

impl ConfigEditor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Editor for the global config file.
    pub fn global() -> Result<Self, ConfigEditError> {
        ConfigLoader::global_config_path()
            .map(Self::new)
            .ok_or(ConfigEditError::NoConfigDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Set `key` to `raw` and write the file back.
    ///
    /// `raw` is read as a TOML value when it parses as one (`10`, `false`)
    /// and as a plain string otherwise. The edited file must still
    /// deserialize and must not introduce a validation error on `key`.
    pub fn set(&self, key: &str, raw: &str) -> Result<Value, ConfigEditError> {
        if !SETTABLE_KEYS.contains(&key) {
            return Err(ConfigEditError::UnknownKey(key.to_string()));
        }

        let mut table = self.read_table()?;
        let typed = parse_value(raw);
        insert_dotted(&mut table, key, typed.clone())?;

        let value = match check(&table, key) {
            Ok(()) => typed,
            // `12345` as an API key is still a string
            Err(err) if !typed.is_str() => {
                let text = Value::String(raw.to_string());
                insert_dotted(&mut table, key, text.clone())?;
                check(&table, key).map_err(|_| err)?;
                text
            }
            Err(err) => return Err(err),
        };

        self.write_table(&table)?;
        Ok(value)
    }

    /// Reset one key, or the whole file when `key` is `None`.
    ///
    /// Returns `false` when there was nothing to remove.
    pub fn reset(&self, key: Option<&str>) -> Result<bool, ConfigEditError> {
        let Some(key) = key else {
            return match fs::remove_file(&self.path) {
                Ok(()) => Ok(true),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
                Err(source) => Err(ConfigEditError::Io {
                    path: self.path.clone(),
                    source,
                }),
            };
        };

        if !SETTABLE_KEYS.contains(&key) {
            return Err(ConfigEditError::UnknownKey(key.to_string()));
        }
        let mut table = self.read_table()?;
        if !remove_dotted(&mut table, key) {
            return Ok(false);
        }
        self.write_table(&table)?;
        Ok(true)
    }

    fn read_table(&self) -> Result<Table, ConfigEditError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Table::new()),
            Err(source) => {
                return Err(ConfigEditError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        toml::from_str(&text).map_err(|source| ConfigEditError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn write_table(&self, table: &Table) -> Result<(), ConfigEditError> {
        let io_err = |source: std::io::Error| ConfigEditError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = toml::to_string_pretty(table)?;
        fs::write(&self.path, text).map_err(io_err)
    }
}

/// How a set value is echoed back; API keys are masked.
pub fn display_value(key: &str, value: &Value) -> String {
    let shown = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if key.ends_with(".api_key") {
        mask_secret(&shown)
    } else {
        shown
    }
}

fn parse_value(raw: &str) -> Value {
    toml::from_str::<Table>(&format!("value = {}", raw))
        .ok()
        .and_then(|mut t| t.remove("value"))
        .unwrap_or_else(|| Value::String(raw.to_string()))
}

fn check(table: &Table, key: &str) -> Result<(), ConfigEditError> {
    let config: FileConfig =
        Value::Table(table.clone())
            .try_into()
            .map_err(|e: toml::de::Error| ConfigEditError::InvalidValue {
                key: key.to_string(),
                message: e.to_string().trim().to_string(),
            })?;

    match config
        .validate()
        .into_iter()
        .find(|issue| issue.severity == Severity::Error && issue.field == key)
    {
        Some(issue) => Err(ConfigEditError::InvalidValue {
            key: key.to_string(),
            message: issue.message,
        }),
        None => Ok(()),
    }
}

fn insert_dotted(table: &mut Table, key: &str, value: Value) -> Result<(), ConfigEditError> {
    let mut parts: Vec<&str> = key.split('.').collect();
    let leaf = parts.pop().unwrap_or(key);

    let mut current = table;
    for part in parts {
        let entry = current
            .entry(part.to_string())
            .or_insert(Value::Table(Table::new()));
        current = match entry {
            Value::Table(inner) => inner,
            _ => {
                return Err(ConfigEditError::InvalidValue {
                    key: key.to_string(),
                    message: format!("`{}` is not a table in the existing file", part),
                });
            }
        };
    }
    current.insert(leaf.to_string(), value);
    Ok(())
}

fn remove_dotted(table: &mut Table, key: &str) -> bool {
    match key.split_once('.') {
        None => table.remove(key).is_some(),
        Some((head, rest)) => {
            let Some(Value::Table(inner)) = table.get_mut(head) else {
                return false;
            };
            let removed = remove_dotted(inner, rest);
            if inner.is_empty() {
                table.remove(head);
            }
            removed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor(dir: &tempfile::TempDir) -> ConfigEditor {
        ConfigEditor::new(dir.path().join("curlgen").join("config.toml"))
    }

    fn load(editor: &ConfigEditor) -> FileConfig {
        toml::from_str(&fs::read_to_string(editor.path()).unwrap()).unwrap()
    }

    #[test]
    fn test_set_creates_file_with_nested_tables() {
        let dir = tempfile::tempdir().unwrap();
        let editor = editor(&dir);

        let value = editor.set("run.max_turns", "4").unwrap();
        assert_eq!(value, Value::Integer(4));
        editor.set("providers.openai.base_url", "http://localhost:11434").unwrap();
        editor.set("output.color", "false").unwrap();

        let text = fs::read_to_string(editor.path()).unwrap();
        assert!(text.contains("[run]"));
        assert!(text.contains("[providers.openai]"));

        let config = load(&editor);
        assert_eq!(config.run.max_turns, 4);
        assert_eq!(config.providers.openai.base_url, "http://localhost:11434");
        assert!(!config.output.color);
    }

    #[test]
    fn test_set_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let editor = editor(&dir);
        editor.set("run.max_retries", "2").unwrap();
        editor.set("run.max_turns", "7").unwrap();

        let config = load(&editor);
        assert_eq!(config.run.max_retries, 2);
        assert_eq!(config.run.max_turns, 7);
    }

    #[test]
    fn test_numeric_api_key_is_stored_as_string() {
        let dir = tempfile::tempdir().unwrap();
        let editor = editor(&dir);

        let value = editor.set("providers.anthropic.api_key", "1234567890").unwrap();
        assert_eq!(value, Value::String("1234567890".to_string()));
        assert_eq!(
            load(&editor).providers.anthropic.api_key.as_deref(),
            Some("1234567890")
        );
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let dir = tempfile::tempdir().unwrap();
        let editor = editor(&dir);

        assert!(matches!(
            editor.set("run.max_turns", "many"),
            Err(ConfigEditError::InvalidValue { .. })
        ));
        assert!(matches!(
            editor.set("run.max_turns", "0"),
            Err(ConfigEditError::InvalidValue { .. })
        ));
        assert!(matches!(
            editor.set("output.format", "yaml"),
            Err(ConfigEditError::InvalidValue { .. })
        ));
        assert!(matches!(
            editor.set("run.turns", "3"),
            Err(ConfigEditError::UnknownKey(_))
        ));
        assert!(!editor.path().exists());
    }

    #[test]
    fn test_reset_single_key() {
        let dir = tempfile::tempdir().unwrap();
        let editor = editor(&dir);
        editor.set("run.max_turns", "3").unwrap();
        editor.set("output.color", "false").unwrap();

        assert!(editor.reset(Some("run.max_turns")).unwrap());
        assert!(!editor.reset(Some("run.max_turns")).unwrap());

        let text = fs::read_to_string(editor.path()).unwrap();
        assert!(!text.contains("[run]"));
        let config = load(&editor);
        assert_eq!(config.run.max_turns, 10);
        assert!(!config.output.color);
    }

    #[test]
    fn test_reset_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let editor = editor(&dir);
        editor.set("run.max_turns", "3").unwrap();

        assert!(editor.reset(None).unwrap());
        assert!(!editor.path().exists());
        assert!(!editor.reset(None).unwrap());
    }

    #[test]
    fn test_display_value_masks_api_keys() {
        let key = Value::String("sk-proj-1234567890abcd".to_string());
        let shown = display_value("providers.openai.api_key", &key);
        assert!(!shown.contains("1234567890abcd"));
        assert_eq!(display_value("run.max_turns", &Value::Integer(3)), "3");
        assert_eq!(
            display_value("output.format", &Value::String("json".to_string())),
            "json"
        );
    }
}

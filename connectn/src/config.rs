//! `key: value` game configuration, read once at startup.
use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, GameError};
use crate::grid::{Grid, Symbol, MAX_CELLS};

const KNOWN_KEYS: [&str; 4] = ["num_rows", "num_cols", "blank_char", "num_pieces_to_win"];

/// A raw value from the config file: integers where the text parses as one,
/// otherwise the trimmed text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigValue {
    Int(i64),
    Text(String),
}

impl ConfigValue {
    fn parse(raw: &str) -> Self {
        match raw.parse() {
            Ok(n) => ConfigValue::Int(n),
            Err(_) => ConfigValue::Text(raw.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub num_rows: usize,
    pub num_cols: usize,
    pub blank_char: Symbol,
    pub num_pieces_to_win: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            num_rows: 6,
            num_cols: 7,
            blank_char: Symbol::new('*'),
            num_pieces_to_win: 4,
        }
    }
}

impl GameConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let entries = parse_entries(text)?;
        for key in entries.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                warn!(key = key.as_str(), "ignoring unknown config key");
            }
        }
        let config = GameConfig {
            num_rows: positive(&entries, "num_rows")?,
            num_cols: positive(&entries, "num_cols")?,
            blank_char: symbol(&entries, "blank_char")?,
            num_pieces_to_win: positive(&entries, "num_pieces_to_win")?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_rows == 0 || self.num_cols == 0 {
            return Err(ConfigError::Validation(
                "num_rows and num_cols must be > 0".into(),
            ));
        }
        match self.num_rows.checked_mul(self.num_cols) {
            Some(cells) if cells <= MAX_CELLS => {}
            _ => {
                return Err(ConfigError::Validation(format!(
                    "a {}x{} grid exceeds the {MAX_CELLS} cell limit",
                    self.num_rows, self.num_cols
                )))
            }
        }
        if self.num_pieces_to_win == 0 {
            return Err(ConfigError::Validation(
                "num_pieces_to_win must be > 0".into(),
            ));
        }
        Ok(())
    }

    pub fn build_grid(&self) -> Result<Grid, GameError> {
        Grid::new(self.num_rows, self.num_cols, self.blank_char)
    }
}

/// Splits each non-empty line on its first `:`. Later duplicates win.
pub fn parse_entries(text: &str) -> Result<HashMap<String, ConfigValue>, ConfigError> {
    let mut entries = HashMap::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (key, value) = line.split_once(':').ok_or_else(|| ConfigError::MalformedLine {
            line_no: idx + 1,
            line: line.to_string(),
        })?;
        entries.insert(key.trim().to_string(), ConfigValue::parse(value.trim()));
    }
    Ok(entries)
}

fn lookup<'a>(
    entries: &'a HashMap<String, ConfigValue>,
    key: &'static str,
) -> Result<&'a ConfigValue, ConfigError> {
    entries.get(key).ok_or(ConfigError::MissingKey(key))
}

fn positive(entries: &HashMap<String, ConfigValue>, key: &'static str) -> Result<usize, ConfigError> {
    match lookup(entries, key)? {
        ConfigValue::Int(n) if *n > 0 => Ok(*n as usize),
        _ => Err(ConfigError::WrongType {
            key,
            expected: "a positive integer",
        }),
    }
}

fn symbol(entries: &HashMap<String, ConfigValue>, key: &'static str) -> Result<Symbol, ConfigError> {
    let text = match lookup(entries, key)? {
        ConfigValue::Text(text) => text.clone(),
        ConfigValue::Int(n) => n.to_string(),
    };
    Symbol::parse(&text).map_err(|_| ConfigError::WrongType {
        key,
        expected: "a single character",
    })
}

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use toml::{Table, Value};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// One declared setting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigEntry {
    name: String,
    default_value: String,
    value: String,
}

impl ConfigEntry {
    /// A new entry whose current value is its default.
    pub fn new(name: impl Into<String>, default_value: impl Into<String>) -> Self {
        let default_value = default_value.into();
        Self {
            name: name.into(),
            value: default_value.clone(),
            default_value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_default(&self) -> bool {
        self.value == self.default_value
    }
}

/// A configuration file with a fixed set of declared settings.
#[derive(Clone, Debug)]
pub struct ConfigFile {
    path: PathBuf,
    header: String,
    entries: BTreeMap<String, ConfigEntry>,
}

impl ConfigFile {
    /// Open (or create) the config file at `path`.
    ///
    /// `defaults` declares every setting and its default value. Settings in
    /// the file that were not declared are ignored and dropped on the next
    /// [`write`](Self::write). If any declared setting is missing from the
    /// file, the file is rewritten with the defaults filled in.
    pub fn open<I, K, V>(
        path: impl Into<PathBuf>,
        header: impl Into<String>,
        defaults: I,
    ) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let path = path.into();
        ensure_file(&path)?;

        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let table: Table = text.parse().map_err(|source| ConfigError::Syntax {
            path: path.clone(),
            source,
        })?;

        let mut entries = BTreeMap::new();
        let mut complete = true;
        for (name, default_value) in defaults {
            let mut entry = ConfigEntry::new(name, default_value);
            match table.get(&entry.name) {
                Some(value) => entry.value = scalar_to_string(&entry.name, value)?,
                None => complete = false,
            }
            entries.insert(entry.name.clone(), entry);
        }

        let config = Self {
            path,
            header: header.into(),
            entries,
        };
        if !complete {
            debug!(path = %config.path.display(), "config incomplete; writing defaults");
            config.write()?;
        }
        Ok(config)
    }

    /// Current value of a declared setting.
    pub fn get(&self, name: &str) -> ConfigResult<&str> {
        self.entry(name).map(ConfigEntry::value)
    }

    /// Current value of a declared setting, parsed as `T`.
    pub fn get_parsed<T>(&self, name: &str) -> ConfigResult<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let value = self.get(name)?;
        value.parse().map_err(|e: T::Err| ConfigError::Parse {
            key: name.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
    }

    /// Change a declared setting in memory. Call [`write`](Self::write) to
    /// persist it.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> ConfigResult<()> {
        let entry = self
            .entries
            .get_mut(name)
            .ok_or_else(|| ConfigError::NotFound(name.to_string()))?;
        entry.value = value.into();
        Ok(())
    }

    pub fn entry(&self, name: &str) -> ConfigResult<&ConfigEntry> {
        self.entries
            .get(name)
            .ok_or_else(|| ConfigError::NotFound(name.to_string()))
    }

    /// All declared settings, sorted by name.
    pub fn entries(&self) -> impl Iterator<Item = &ConfigEntry> {
        self.entries.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the file with the header comment and every declared setting.
    pub fn write(&self) -> ConfigResult<()> {
        fs::write(&self.path, self.render()?).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), settings = self.entries.len(), "config written");
        Ok(())
    }

    fn render(&self) -> ConfigResult<String> {
        let mut out = String::new();
        for line in self.header.lines() {
            out.push_str("# ");
            out.push_str(line);
            out.push('\n');
        }

        let table: Table = self
            .entries
            .values()
            .map(|e| (e.name.clone(), Value::String(e.value.clone())))
            .collect();
        out.push_str(&toml::to_string(&table)?);
        Ok(out)
    }
}

fn scalar_to_string(key: &str, value: &Value) -> ConfigResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        Value::Datetime(d) => Ok(d.to_string()),
        Value::Array(_) | Value::Table(_) => Err(ConfigError::NotScalar {
            key: key.to_string(),
        }),
    }
}

fn ensure_file(path: &Path) -> ConfigResult<()> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;
    Ok(())
}

//! INI file configuration adapter.

use crate::domain::error::CrossoverError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }

    fn parsed<T: std::str::FromStr>(
        &self,
        section: &str,
        key: &str,
        expected: &str,
    ) -> Result<Option<T>, CrossoverError> {
        match self.get_string(section, key) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|_| CrossoverError::ConfigInvalid {
                    section: section.to_string(),
                    key: key.to_string(),
                    reason: format!("expected {}, got `{}`", expected, raw),
                }),
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key).filter(|v| !v.trim().is_empty())
    }

    fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, CrossoverError> {
        self.parsed(section, key, "an integer")
    }

    fn get_double(&self, section: &str, key: &str) -> Result<Option<f64>, CrossoverError> {
        self.parsed(section, key, "a number")
    }

    fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>, CrossoverError> {
        match self.get_string(section, key) {
            None => Ok(None),
            Some(raw) => Self::parse_bool(raw.trim()).map(Some).ok_or_else(|| {
                CrossoverError::ConfigInvalid {
                    section: section.to_string(),
                    key: key.to_string(),
                    reason: format!("expected true/false, got `{}`", raw),
                }
            }),
        }
    }
}

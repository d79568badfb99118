//! Configuration access port trait.
//!
//! Typed getters return `Ok(None)` for an absent key and an error for a key
//! whose value cannot be parsed.

use crate::domain::error::CrossoverError;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, CrossoverError>;
    fn get_double(&self, section: &str, key: &str) -> Result<Option<f64>, CrossoverError>;
    fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>, CrossoverError>;
}

//! Report generation port trait.

use std::path::Path;

use crate::domain::error::CrossoverError;
use crate::domain::pipeline::CrossoverRun;

/// Port for writing the per-day portfolio table of a run.
pub trait ReportPort {
    fn write(&self, run: &CrossoverRun, output_path: &Path) -> Result<(), CrossoverError>;
}

//! Chart rendering port trait.

use std::path::{Path, PathBuf};

use crate::domain::error::CrossoverError;
use crate::domain::pipeline::CrossoverRun;

/// Port for drawing the two run charts. Each method writes one artifact into
/// `output_dir` and returns its path.
pub trait ChartPort {
    /// Price with both unshifted moving averages and buy/sell markers.
    fn render_signal_chart(
        &self,
        run: &CrossoverRun,
        output_dir: &Path,
    ) -> Result<PathBuf, CrossoverError>;

    /// Portfolio total value with bought/sold markers.
    fn render_portfolio_chart(
        &self,
        run: &CrossoverRun,
        output_dir: &Path,
    ) -> Result<PathBuf, CrossoverError>;
}

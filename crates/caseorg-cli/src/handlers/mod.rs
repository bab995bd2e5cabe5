pub mod browse;
pub mod case_law;
pub mod cases;
pub mod config;
pub mod delete;
pub mod note;
pub mod search;
pub mod tree;

use anyhow::{Result, bail};
use caseorg_core::{ResultRow, ResultsRenderer};

/// One-shot commands exit non-zero when the surface ended on an error row
pub(crate) fn fail_on_error_row(renderer: &ResultsRenderer) -> Result<()> {
    if let [ResultRow::Error(message)] = renderer.rows() {
        bail!("{}", message);
    }
    Ok(())
}

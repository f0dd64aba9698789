//! Error types raised while assembling the PDF.

use thiserror::Error;

/// Failure while turning planned pages into PDF bytes.
///
/// Layout itself cannot fail: pagination guarantees the planner never runs out
/// of vertical space, so the only error sources are the PDF library and the
/// in-memory writer.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The underlying PDF library rejected an operation.
    #[error("pdf assembly failed: {0}")]
    Pdf(String),
    /// The in-memory writer could not be flushed into the output buffer.
    #[error("could not finalize document buffer: {0}")]
    Finalize(String),
}

//! Error types shared by every stage of the export pipeline.

use thiserror::Error;

use crate::repository::RepositoryError;
use crate::style::StyleClass;

/// Failures that abort a resume render.
///
/// No stage returns partial output: once any of these is produced the whole
/// export is abandoned and the caller may simply retry.
#[derive(Debug, Error)]
pub enum ResumeError {
    /// A mandatory field of the input record is missing.
    #[error("validation error: {0}")]
    Validation(String),

    /// The style table cannot provide usable font metrics for a style class.
    #[error("no usable font metrics for style class `{class}`: {reason}")]
    Measurement {
        /// Style class whose lookup failed.
        class: StyleClass,
        /// Human-readable explanation.
        reason: String,
    },

    /// The PDF backend failed while emitting the document.
    #[error("failed to emit PDF: {0}")]
    Render(String),

    /// Loading the record from the injected repository failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Section outlines could not be embedded.
    #[cfg(feature = "bookmarks")]
    #[error(transparent)]
    Bookmarks(#[from] crate::bookmarks::BookmarkError),
}

impl ResumeError {
    pub(crate) fn measurement(class: StyleClass, reason: impl Into<String>) -> Self {
        Self::Measurement {
            class,
            reason: reason.into(),
        }
    }
}

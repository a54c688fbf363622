//! Layout and pagination engine that renders structured resumes to PDF.
//!
//! The pipeline runs in three stages:
//!
//! 1. [`blocks::build_blocks`] turns a [`ResumeRecord`] into an ordered list of
//!    abstract content blocks;
//! 2. [`layout::layout`] wraps and flows those blocks into fixed-size pages;
//! 3. [`render::render`] draws the placed blocks with `printpdf`.
//!
//! [`ResumeExporter`] wires the stages together:
//!
//! ```no_run
//! use resume_pdf::{Profile, ResumeExporter, ResumeRecord};
//!
//! let record = ResumeRecord::new(Profile::new("Jane Doe").with_email("jane@example.com"));
//! let exported = ResumeExporter::new().with_template("classic").export(&record)?;
//! std::fs::write(&exported.file_name, &exported.bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod blocks;
pub mod builder;
pub mod error;
pub mod fonts;
pub mod layout;
pub mod model;
pub mod render;
pub mod repository;
pub mod style;
pub mod templates;
pub mod wrap;

#[cfg(feature = "bookmarks")]
pub mod bookmarks;

pub use builder::{suggested_file_name, ExportedResume, RenderedDocument, ResumeExporter};
pub use error::ResumeError;
pub use layout::{LayoutSettings, PageCanvas, PageGeometry, PageMargins};
pub use model::{EducationEntry, ExperienceEntry, Profile, ProjectEntry, ResumeRecord};
pub use repository::{InMemoryRepository, RepositoryError, ResumeRepository};
pub use style::{StyleClass, StyleTable};

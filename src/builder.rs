//! High-level export pipeline: record in, PDF bytes out.

use genpdf::{PaperSize, Size};
use log::info;

use crate::blocks::build_blocks;
use crate::error::ResumeError;
use crate::fonts::BuiltinMetrics;
use crate::layout::{layout, LayoutSettings, PageCanvas, PageGeometry, PageMargins};
use crate::model::{present, ResumeRecord};
use crate::render::render;
use crate::repository::ResumeRepository;
use crate::style::StyleTable;
use crate::templates::{self, Template, DEFAULT_TEMPLATE_ID};

const FALLBACK_FILE_STEM: &str = "Resume";
/// Longest file name most file systems accept, in bytes.
const MAX_FILE_NAME_BYTES: usize = 255;

/// Pages of a laid-out resume, before emission.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedDocument {
    pub pages: Vec<PageCanvas>,
    pub file_name: String,
}

/// A finished PDF export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedResume {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub page_count: usize,
    /// Id of the template actually used, after fallback.
    pub template: String,
}

/// Builder for resume exports.
///
/// Defaults to A4 paper with 20mm margins, the `modern` template, the default
/// style table and default layout settings.
#[derive(Clone, Debug, Default)]
pub struct ResumeExporter {
    paper_size: Option<Size>,
    margins: Option<PageMargins>,
    template_id: Option<String>,
    settings: LayoutSettings,
    styles: StyleTable,
    #[cfg(feature = "bookmarks")]
    bookmarks: bool,
}

impl ResumeExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the paper size of every page.
    pub fn with_paper_size(mut self, paper_size: impl Into<Size>) -> Self {
        self.paper_size = Some(paper_size.into());
        self
    }

    /// Sets the page margins, in millimetres.
    pub fn with_margins(mut self, margins: impl Into<PageMargins>) -> Self {
        self.margins = Some(margins.into());
        self
    }

    /// Selects a template by id; unknown ids fall back to the default template.
    pub fn with_template(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = Some(template_id.into());
        self
    }

    pub fn with_settings(mut self, settings: LayoutSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_styles(mut self, styles: StyleTable) -> Self {
        self.styles = styles;
        self
    }

    /// Adds a PDF outline entry for every section title.
    #[cfg(feature = "bookmarks")]
    pub fn with_bookmarks(mut self, enabled: bool) -> Self {
        self.bookmarks = enabled;
        self
    }

    /// Page geometry the exporter lays out against.
    pub fn geometry(&self) -> PageGeometry {
        let paper_size = self.paper_size.unwrap_or_else(|| PaperSize::A4.into());
        PageGeometry::new(paper_size, self.margins.unwrap_or_default())
    }

    fn template(&self) -> &'static Template {
        templates::resolve(self.template_id.as_deref().unwrap_or(DEFAULT_TEMPLATE_ID))
    }

    /// Builds and paginates the blocks of `record` without emitting a PDF.
    pub fn layout_document(&self, record: &ResumeRecord) -> Result<RenderedDocument, ResumeError> {
        self.layout_with(record, self.template())
    }

    fn layout_with(
        &self,
        record: &ResumeRecord,
        template: &'static Template,
    ) -> Result<RenderedDocument, ResumeError> {
        let blocks = build_blocks(record)?;
        let pages = layout(
            &blocks,
            &self.geometry(),
            &self.styles,
            &BuiltinMetrics,
            &self.settings,
        )?;

        Ok(RenderedDocument {
            pages,
            file_name: suggested_file_name(record.profile.full_name.as_deref(), template.id),
        })
    }

    /// Renders `record` to PDF bytes.
    pub fn export(&self, record: &ResumeRecord) -> Result<ExportedResume, ResumeError> {
        let template = self.template();
        let document = self.layout_with(record, template)?;
        let title = present(&record.profile.full_name).unwrap_or(FALLBACK_FILE_STEM);

        let bytes = render(
            &document.pages,
            &self.styles,
            &BuiltinMetrics,
            &self.settings,
            title,
        )?;

        #[cfg(feature = "bookmarks")]
        let bytes = if self.bookmarks {
            let anchors = crate::bookmarks::section_anchors(&document.pages);
            crate::bookmarks::apply_section_bookmarks(&bytes, &anchors)?
        } else {
            bytes
        };

        let page_count = document.pages.len();
        info!(
            "exported {} with template `{}`: {} page(s), {} bytes",
            document.file_name,
            template.id,
            page_count,
            bytes.len()
        );

        Ok(ExportedResume {
            bytes,
            file_name: document.file_name,
            page_count,
            template: template.id.to_string(),
        })
    }

    /// Loads the record of `user_id` from `repository` and exports it.
    pub fn export_from(
        &self,
        repository: &dyn ResumeRepository,
        user_id: &str,
    ) -> Result<ExportedResume, ResumeError> {
        let record = repository.get(user_id)?;
        self.export(&record)
    }
}

/// File name offered for a download: `{name}_{template}.pdf`.
///
/// Whitespace runs in the name become a single underscore and characters that
/// are unsafe in file names are removed. A missing or blank name yields
/// `Resume`. Overlong names are cut so the template suffix always survives.
pub fn suggested_file_name(full_name: Option<&str>, template_id: &str) -> String {
    let suffix = sanitize_filename::sanitize(format!("_{template_id}.pdf"));
    let budget = MAX_FILE_NAME_BYTES.saturating_sub(suffix.len());

    let mut stem = full_name
        .map(|name| name.split_whitespace().collect::<Vec<_>>().join("_"))
        .map(sanitize_filename::sanitize)
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| FALLBACK_FILE_STEM.to_string());
    if stem.len() > budget {
        let cut = (0..=budget)
            .rev()
            .find(|&index| stem.is_char_boundary(index))
            .unwrap_or(0);
        stem.truncate(cut);
    }

    stem + &suffix
}

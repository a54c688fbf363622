//! Flow of content blocks into fixed-size pages.
//!
//! [`layout`] walks the block sequence once, keeping a single vertical cursor.
//! Each block is measured (wrapped against the content width), checked against
//! the space left on the current page and either placed there or moved to a
//! fresh page.  The result is a list of [`PageCanvas`] values whose blocks carry
//! absolute offsets, ready for the renderer.
//!
//! Besides the plain fit test the engine applies two orphan-avoidance rules:
//!
//! - blocks flagged with [`ContentBlock::keeps_with_next`] are fit-tested
//!   together with the block that follows them, so headings never end a page;
//! - before the experience, education and projects titles the engine starts a
//!   new page early once the cursor has passed a fraction of the page height
//!   (see [`LayoutSettings`]).

use genpdf::{PaperSize, Size};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::blocks::{BlockKind, ContentBlock, Section};
use crate::error::ResumeError;
use crate::fonts::TextMeasure;
use crate::style::{StyleClass, StyleTable};
use crate::wrap;

const DEFAULT_MARGIN_MM: f64 = 20.0;

fn mm_to_f64(value: genpdf::Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

/// Page margins in millimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageMargins {
    pub top_mm: f64,
    pub right_mm: f64,
    pub bottom_mm: f64,
    pub left_mm: f64,
}

impl PageMargins {
    pub fn new(top_mm: f64, right_mm: f64, bottom_mm: f64, left_mm: f64) -> Self {
        Self {
            top_mm,
            right_mm,
            bottom_mm,
            left_mm,
        }
    }

    /// The same margin on all four sides.
    pub fn all(mm: f64) -> Self {
        Self::new(mm, mm, mm, mm)
    }
}

impl Default for PageMargins {
    fn default() -> Self {
        Self::all(DEFAULT_MARGIN_MM)
    }
}

impl From<f64> for PageMargins {
    fn from(mm: f64) -> Self {
        Self::all(mm)
    }
}

/// `(top, right, bottom, left)`, in CSS order.
impl From<(f64, f64, f64, f64)> for PageMargins {
    fn from((top_mm, right_mm, bottom_mm, left_mm): (f64, f64, f64, f64)) -> Self {
        Self::new(top_mm, right_mm, bottom_mm, left_mm)
    }
}

/// Page size and margins of one layout pass, in millimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width_mm: f64,
    pub height_mm: f64,
    pub margin_top_mm: f64,
    pub margin_right_mm: f64,
    pub margin_bottom_mm: f64,
    pub margin_left_mm: f64,
}

impl PageGeometry {
    /// Creates a geometry from a `genpdf` paper size and margins.
    pub fn new(paper_size: impl Into<Size>, margins: impl Into<PageMargins>) -> Self {
        let size = paper_size.into();
        let margins = margins.into();
        Self {
            width_mm: mm_to_f64(size.width),
            height_mm: mm_to_f64(size.height),
            margin_top_mm: margins.top_mm,
            margin_right_mm: margins.right_mm,
            margin_bottom_mm: margins.bottom_mm,
            margin_left_mm: margins.left_mm,
        }
    }

    /// Creates a geometry with the same margin on all four sides.
    pub fn uniform(width_mm: f64, height_mm: f64, margin_mm: f64) -> Self {
        Self {
            width_mm,
            height_mm,
            margin_top_mm: margin_mm,
            margin_right_mm: margin_mm,
            margin_bottom_mm: margin_mm,
            margin_left_mm: margin_mm,
        }
    }

    pub fn margins(&self) -> PageMargins {
        PageMargins::new(
            self.margin_top_mm,
            self.margin_right_mm,
            self.margin_bottom_mm,
            self.margin_left_mm,
        )
    }

    /// Horizontal budget for text and chips.
    pub fn content_width(&self) -> f64 {
        self.width_mm - self.margin_left_mm - self.margin_right_mm
    }

    /// Lowest vertical offset (from the top edge) content may reach.
    pub fn content_bottom(&self) -> f64 {
        self.height_mm - self.margin_bottom_mm
    }

    fn validate(&self) -> Result<(), ResumeError> {
        let fields = [
            ("width_mm", self.width_mm),
            ("height_mm", self.height_mm),
            ("margin_top_mm", self.margin_top_mm),
            ("margin_right_mm", self.margin_right_mm),
            ("margin_bottom_mm", self.margin_bottom_mm),
            ("margin_left_mm", self.margin_left_mm),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ResumeError::Validation(format!(
                    "page geometry `{name}` must be a finite non-negative length, got {value}"
                )));
            }
        }
        if self.content_width() <= 0.0 || self.content_bottom() <= self.margin_top_mm {
            return Err(ResumeError::Validation(format!(
                "page geometry {}x{}mm leaves no content area inside its margins",
                self.width_mm, self.height_mm
            )));
        }
        Ok(())
    }
}

impl Default for PageGeometry {
    /// A4 with 20mm margins.
    fn default() -> Self {
        Self::new(PaperSize::A4, PageMargins::default())
    }
}

/// Tunable constants of the flow engine.
///
/// All fields have defaults, so a settings file only needs to name the values
/// it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Line height in millimetres per point of font size.
    pub line_height_mm_per_pt: f64,
    /// Vertical advance after a divider.
    pub divider_gap_mm: f64,
    /// Stroke width of dividers, in points.
    pub rule_thickness_pt: f64,
    pub chip_padding_x_mm: f64,
    pub chip_padding_y_mm: f64,
    /// Horizontal distance between chips on a row.
    pub chip_gap_mm: f64,
    /// Vertical distance between chip rows.
    pub chip_row_gap_mm: f64,
    /// Break before the experience title once the cursor passes this share of the page height.
    pub experience_break_fraction: f64,
    /// Same for the education title.
    pub education_break_fraction: f64,
    /// Same for the projects title.
    pub projects_break_fraction: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            line_height_mm_per_pt: 0.4,
            divider_gap_mm: 6.0,
            rule_thickness_pt: 0.75,
            chip_padding_x_mm: 1.5,
            chip_padding_y_mm: 0.8,
            chip_gap_mm: 2.0,
            chip_row_gap_mm: 1.5,
            experience_break_fraction: 250.0 / 297.0,
            education_break_fraction: 230.0 / 297.0,
            projects_break_fraction: 230.0 / 297.0,
        }
    }
}

impl LayoutSettings {
    /// Parses settings from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Pre-emptive break threshold for the title of `section`, if any.
    pub fn section_break_fraction(&self, section: Section) -> Option<f64> {
        match section {
            Section::Experience => Some(self.experience_break_fraction),
            Section::Education => Some(self.education_break_fraction),
            Section::Projects => Some(self.projects_break_fraction),
            Section::Summary | Section::Skills => None,
        }
    }

    fn line_height(&self, size_pt: f64) -> f64 {
        size_pt * self.line_height_mm_per_pt
    }

    fn chip_row_height(&self, size_pt: f64) -> f64 {
        self.line_height(size_pt) + 2.0 * self.chip_padding_y_mm
    }

    fn validate(&self) -> Result<(), ResumeError> {
        let invalid = |name: &str, requirement: &str, value: f64| {
            ResumeError::Validation(format!(
                "layout setting `{name}` must be {requirement}, got {value}"
            ))
        };

        let positive = [
            ("line_height_mm_per_pt", self.line_height_mm_per_pt),
            ("divider_gap_mm", self.divider_gap_mm),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(name, "positive", value));
            }
        }

        let non_negative = [
            ("rule_thickness_pt", self.rule_thickness_pt),
            ("chip_padding_x_mm", self.chip_padding_x_mm),
            ("chip_padding_y_mm", self.chip_padding_y_mm),
            ("chip_gap_mm", self.chip_gap_mm),
            ("chip_row_gap_mm", self.chip_row_gap_mm),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(name, "non-negative", value));
            }
        }

        let fractions = [
            ("experience_break_fraction", self.experience_break_fraction),
            ("education_break_fraction", self.education_break_fraction),
            ("projects_break_fraction", self.projects_break_fraction),
        ];
        for (name, value) in fractions {
            if !(value.is_finite() && value > 0.0 && value <= 1.0) {
                return Err(invalid(name, "a fraction in (0, 1]", value));
            }
        }
        Ok(())
    }
}

/// Rendered content of a placed block.
#[derive(Clone, Debug, PartialEq)]
pub enum PlacedContent {
    /// Wrapped text, one entry per line.
    Lines(Vec<String>),
    /// Chip labels, one entry per row.
    Chips(Vec<Vec<String>>),
    /// Horizontal rule.
    Rule,
}

/// A block with its final position on a page.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedBlock {
    pub kind: BlockKind,
    pub style: StyleClass,
    /// Section opened by the block, for section titles.
    pub section: Option<Section>,
    /// Distance from the top edge of the page to the top of the block.
    pub top_mm: f64,
    pub height_mm: f64,
    pub content: PlacedContent,
}

impl PlacedBlock {
    /// Distance from the top edge to the bottom of the block.
    pub fn bottom_mm(&self) -> f64 {
        self.top_mm + self.height_mm
    }
}

/// One page worth of placed blocks.
#[derive(Clone, Debug, PartialEq)]
pub struct PageCanvas {
    geometry: PageGeometry,
    cursor_mm: f64,
    blocks: Vec<PlacedBlock>,
}

impl PageCanvas {
    fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            cursor_mm: geometry.margin_top_mm,
            blocks: Vec::new(),
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Cursor position after the last placed block.
    pub fn cursor_mm(&self) -> f64 {
        self.cursor_mm
    }

    pub fn blocks(&self) -> &[PlacedBlock] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// A block after measurement, before placement.
struct Measured {
    content: PlacedContent,
    height: f64,
    space_before: f64,
    space_after: f64,
}

/// Flows `blocks` into pages of the given geometry.
///
/// Deterministic for identical inputs.  Fails with
/// [`ResumeError::Measurement`] when the style table cannot resolve a block's
/// style and with [`ResumeError::Validation`] for unusable geometry or
/// settings; no pages are returned in either case.
pub fn layout(
    blocks: &[ContentBlock],
    geometry: &PageGeometry,
    styles: &StyleTable,
    measure: &dyn TextMeasure,
    settings: &LayoutSettings,
) -> Result<Vec<PageCanvas>, ResumeError> {
    geometry.validate()?;
    settings.validate()?;
    styles.validate()?;

    let measured = blocks
        .iter()
        .map(|block| measure_block(block, geometry, styles, measure, settings))
        .collect::<Result<Vec<_>, _>>()?;

    let mut flow = Flow::new(*geometry);

    for (index, block) in blocks.iter().enumerate() {
        if let Some(fraction) = block
            .section()
            .and_then(|section| settings.section_break_fraction(section))
        {
            let threshold = fraction * geometry.height_mm;
            if !flow.page().is_empty() && flow.cursor() > threshold {
                debug!(
                    "pre-emptive break before {:?}: cursor {:.1}mm past {:.1}mm",
                    block.section(),
                    flow.cursor(),
                    threshold
                );
                flow.new_page();
            }
        }

        if block.keeps_with_next() && !flow.page().is_empty() {
            let extent = chain_extent(blocks, &measured, index);
            if !flow.fits(extent) {
                debug!(
                    "moving {:?} \"{}\" to a new page to keep it with the following block",
                    block.kind(),
                    block.text()
                );
                flow.new_page();
            }
        }

        flow.place(block, &measured[index]);
    }

    Ok(flow.finish())
}

/// Vertical extent of a keep-with-next chain starting at `start`.
///
/// The chain runs through every consecutive block that keeps with its
/// successor and ends with the first block that does not.  The trailing gap of
/// the last block is excluded since nothing needs to fit after it.
fn chain_extent(blocks: &[ContentBlock], measured: &[Measured], start: usize) -> f64 {
    let mut extent = 0.0;
    for index in start..blocks.len() {
        let item = &measured[index];
        extent += item.space_before + item.height;
        if !blocks[index].keeps_with_next() {
            break;
        }
        if index + 1 < blocks.len() {
            extent += item.space_after;
        }
    }
    extent
}

fn measure_block(
    block: &ContentBlock,
    geometry: &PageGeometry,
    styles: &StyleTable,
    measure: &dyn TextMeasure,
    settings: &LayoutSettings,
) -> Result<Measured, ResumeError> {
    let font = styles.descriptor(block.style())?;
    let width = geometry.content_width();

    let (content, height, space_after) = match block.kind() {
        BlockKind::Divider => (PlacedContent::Rule, 0.0, settings.divider_gap_mm),
        BlockKind::ChipGroup => {
            let rows = wrap::pack_chips(
                block.chip_labels(),
                font,
                measure,
                settings.chip_padding_x_mm,
                settings.chip_gap_mm,
                width,
            );
            let row_count = rows.len() as f64;
            let height = if rows.is_empty() {
                0.0
            } else {
                row_count * settings.chip_row_height(font.size_pt)
                    + (row_count - 1.0) * settings.chip_row_gap_mm
            };
            (PlacedContent::Chips(rows), height, font.space_after_mm)
        }
        BlockKind::Heading | BlockKind::SectionTitle | BlockKind::BodyText | BlockKind::MetaLine => {
            let lines = wrap::wrap_text(block.text(), font, measure, width);
            let height = lines.len() as f64 * settings.line_height(font.size_pt);
            (PlacedContent::Lines(lines), height, font.space_after_mm)
        }
    };

    Ok(Measured {
        content,
        height,
        space_before: font.space_before_mm,
        space_after,
    })
}

/// Cursor state machine over the pages being built.
struct Flow {
    geometry: PageGeometry,
    done: Vec<PageCanvas>,
    current: PageCanvas,
}

impl Flow {
    fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            done: Vec::new(),
            current: PageCanvas::new(geometry),
        }
    }

    fn page(&self) -> &PageCanvas {
        &self.current
    }

    fn cursor(&self) -> f64 {
        self.current.cursor_mm
    }

    fn fits(&self, extent: f64) -> bool {
        self.cursor() + extent <= self.geometry.content_bottom()
    }

    fn new_page(&mut self) {
        let finished = std::mem::replace(&mut self.current, PageCanvas::new(self.geometry));
        self.done.push(finished);
    }

    fn place(&mut self, block: &ContentBlock, measured: &Measured) {
        if !self.current.is_empty() && !self.fits(measured.space_before + measured.height) {
            self.new_page();
        }

        let lead = if self.current.is_empty() {
            0.0
        } else {
            measured.space_before
        };

        if self.current.is_empty() && !self.fits(measured.height) {
            debug!(
                "{:?} block of {:.1}mm exceeds the content area; placing it anyway",
                block.kind(),
                measured.height
            );
        }

        let top = self.cursor() + lead;
        self.current.blocks.push(PlacedBlock {
            kind: block.kind(),
            style: block.style(),
            section: block.section(),
            top_mm: top,
            height_mm: measured.height,
            content: measured.content.clone(),
        });
        self.current.cursor_mm = top + measured.height + measured.space_after;
    }

    fn finish(mut self) -> Vec<PageCanvas> {
        self.done.push(self.current);
        debug!("layout produced {} page(s)", self.done.len());
        self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::BuiltinMetrics;
    use crate::wrap::tests::FixedWidth;

    fn geometry() -> PageGeometry {
        PageGeometry::uniform(210.0, 297.0, 20.0)
    }

    fn run(blocks: &[ContentBlock]) -> Vec<PageCanvas> {
        layout(
            blocks,
            &geometry(),
            &StyleTable::default(),
            &FixedWidth,
            &LayoutSettings::default(),
        )
        .expect("layout succeeds")
    }

    fn body_of_lines(lines: usize) -> ContentBlock {
        // FixedWidth makes every character 1mm; content width is 170mm.
        let line = "x".repeat(170);
        ContentBlock::body(vec![line; lines].join(" "))
    }

    #[test]
    fn default_geometry_is_a4_with_20mm_margins() {
        let geometry = PageGeometry::default();
        assert!((geometry.width_mm - 210.0).abs() < 1e-9);
        assert!((geometry.height_mm - 297.0).abs() < 1e-9);
        assert!((geometry.content_width() - 170.0).abs() < 1e-9);
        assert_eq!(geometry.margins(), PageMargins::all(20.0));
    }

    #[test]
    fn asymmetric_margins_shape_the_content_area() {
        let geometry = PageGeometry::new(PaperSize::A4, (10.0, 15.0, 25.0, 30.0));
        assert_eq!(geometry.margin_top_mm, 10.0);
        assert_eq!(geometry.margin_right_mm, 15.0);
        assert_eq!(geometry.margin_bottom_mm, 25.0);
        assert_eq!(geometry.margin_left_mm, 30.0);
        assert!((geometry.content_width() - 165.0).abs() < 1e-9);
        assert!((geometry.content_bottom() - 272.0).abs() < 1e-9);

        let pages = layout(
            &[ContentBlock::title("Jane Doe")],
            &geometry,
            &StyleTable::default(),
            &FixedWidth,
            &LayoutSettings::default(),
        )
        .unwrap();
        assert_eq!(pages[0].blocks()[0].top_mm, 10.0);
    }

    #[test]
    fn first_block_starts_at_top_margin() {
        let pages = run(&[ContentBlock::title("Jane Doe")]);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].blocks()[0].top_mm, 20.0);
    }

    #[test]
    fn block_height_is_lines_times_line_height() {
        let pages = run(&[body_of_lines(3)]);
        let block = &pages[0].blocks()[0];
        assert_eq!(block.content, PlacedContent::Lines(vec!["x".repeat(170); 3]));
        assert!((block.height_mm - 3.0 * 11.0 * 0.4).abs() < 1e-9);
    }

    #[test]
    fn breaks_when_block_does_not_fit() {
        // Each block is 10 lines * 4.4mm = 44mm; 257mm of content fits five.
        let blocks: Vec<ContentBlock> = (0..7).map(|_| body_of_lines(10)).collect();
        let pages = run(&blocks);

        assert_eq!(pages.len(), 2);
        for page in &pages {
            for block in page.blocks().iter().skip(1) {
                assert!(block.bottom_mm() <= page.geometry().content_bottom() + 1e-9);
            }
            assert_eq!(page.blocks()[0].top_mm, 20.0);
        }
    }

    #[test]
    fn oversized_block_is_placed_on_its_own_page() {
        let pages = run(&[
            ContentBlock::meta("short"),
            body_of_lines(80),
            ContentBlock::meta("after"),
        ]);

        assert_eq!(pages.len(), 3);
        assert!(pages[1].blocks()[0].bottom_mm() > geometry().content_bottom());
        assert_eq!(pages[1].blocks().len(), 1);
    }

    #[test]
    fn cursor_is_strictly_increasing_within_a_page() {
        let mut blocks = vec![ContentBlock::title("Jane Doe"), ContentBlock::divider()];
        for _ in 0..30 {
            blocks.push(ContentBlock::heading("Engineer"));
            blocks.push(ContentBlock::meta("2020 - 2021"));
            blocks.push(body_of_lines(2));
        }
        for page in run(&blocks) {
            for pair in page.blocks().windows(2) {
                assert!(pair[1].top_mm > pair[0].top_mm);
            }
        }
    }

    #[test]
    fn heading_moves_with_its_meta_line() {
        // 55 lines leave the cursor at 263.5mm: the heading alone (7.8mm)
        // would fit above 277mm, heading plus meta line (13.8mm) would not.
        let filler = body_of_lines(55);
        let pages = run(&[
            filler,
            ContentBlock::heading("Engineer at Acme"),
            ContentBlock::meta("2020 - Present"),
        ]);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].blocks().len(), 1);
        assert_eq!(pages[1].blocks()[0].kind, BlockKind::Heading);
        assert_eq!(pages[1].blocks()[1].kind, BlockKind::MetaLine);
    }

    #[test]
    fn experience_title_breaks_early_past_threshold() {
        // 52 lines leave the cursor at 250.3mm, past 250/297 of the page,
        // while title plus heading (20.4mm) would still physically fit.
        let pages = run(&[
            body_of_lines(52),
            ContentBlock::section_title(Section::Experience),
            ContentBlock::heading("Engineer"),
        ]);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].blocks()[0].section, Some(Section::Experience));
    }

    #[test]
    fn education_and_projects_titles_break_at_lower_threshold() {
        // 49 lines leave the cursor at 237.1mm: past 230/297 of the page but
        // short of 250/297, with room for title plus heading below it.
        for section in [Section::Education, Section::Projects] {
            let pages = run(&[
                body_of_lines(49),
                ContentBlock::section_title(section),
                ContentBlock::heading("Entry"),
            ]);
            assert_eq!(pages.len(), 2, "{section:?} should start a new page");
            assert_eq!(pages[1].blocks()[0].section, Some(section));
        }
    }

    #[test]
    fn experience_title_stays_below_its_threshold() {
        let pages = run(&[
            body_of_lines(49),
            ContentBlock::section_title(Section::Experience),
            ContentBlock::heading("Engineer"),
        ]);
        assert_eq!(pages.len(), 1);
        assert!((pages[0].blocks()[1].top_mm - 241.1).abs() < 1e-9);
    }

    #[test]
    fn summary_title_does_not_break_early() {
        let pages = run(&[
            body_of_lines(52),
            ContentBlock::section_title(Section::Summary),
            ContentBlock::body("Short summary."),
        ]);
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn summary_title_has_no_threshold() {
        let settings = LayoutSettings::default();
        assert_eq!(settings.section_break_fraction(Section::Summary), None);
        assert!(settings.section_break_fraction(Section::Experience).unwrap() > 0.8);
        assert!(settings.section_break_fraction(Section::Projects).unwrap() < 0.8);
    }

    #[test]
    fn divider_advances_by_fixed_gap() {
        let pages = run(&[
            ContentBlock::title("Jane Doe"),
            ContentBlock::divider(),
            ContentBlock::meta("next"),
        ]);
        let blocks = pages[0].blocks();
        assert_eq!(blocks[1].content, PlacedContent::Rule);
        assert_eq!(blocks[1].height_mm, 0.0);
        assert!((blocks[2].top_mm - (blocks[1].top_mm + 6.0)).abs() < 1e-9);
    }

    #[test]
    fn chip_rows_determine_height() {
        let labels: Vec<String> = (0..50).map(|i| format!("s{:02}", i)).collect();
        let pages = run(&[ContentBlock::chips(labels)]);
        let block = &pages[0].blocks()[0];
        let PlacedContent::Chips(rows) = &block.content else {
            panic!("expected chips");
        };

        // Chip width 3 + 2 * 1.5 = 6mm, gap 2mm: 21 per 170mm row.
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].len(), 21);
        let row_height = 9.0 * 0.4 + 2.0 * 0.8;
        assert!((block.height_mm - (3.0 * row_height + 2.0 * 1.5)).abs() < 1e-9);
    }

    #[test]
    fn missing_style_aborts_layout() {
        let styles = StyleTable::empty();
        let err = layout(
            &[ContentBlock::title("Jane Doe")],
            &geometry(),
            &styles,
            &BuiltinMetrics,
            &LayoutSettings::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ResumeError::Measurement { .. }));
    }

    #[test]
    fn layout_is_deterministic() {
        let blocks: Vec<ContentBlock> = (0..12)
            .flat_map(|i| {
                [
                    ContentBlock::heading(format!("Role {i}")),
                    ContentBlock::body("Designed and shipped a paginated layout engine for printable documents."),
                ]
            })
            .collect();
        let first = layout(
            &blocks,
            &geometry(),
            &StyleTable::default(),
            &BuiltinMetrics,
            &LayoutSettings::default(),
        )
        .unwrap();
        let second = layout(
            &blocks,
            &geometry(),
            &StyleTable::default(),
            &BuiltinMetrics,
            &LayoutSettings::default(),
        )
        .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn settings_parse_with_partial_overrides() {
        let settings = LayoutSettings::from_json(r#"{ "education_break_fraction": 0.7 }"#).unwrap();
        assert_eq!(settings.education_break_fraction, 0.7);
        assert_eq!(settings.divider_gap_mm, 6.0);
    }

    #[test]
    fn degenerate_geometry_is_rejected() {
        let err = layout(
            &[ContentBlock::title("Jane Doe")],
            &PageGeometry::uniform(30.0, 30.0, 20.0),
            &StyleTable::default(),
            &BuiltinMetrics,
            &LayoutSettings::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ResumeError::Validation(_)));
    }

    fn validation_error(geometry: &PageGeometry, settings: &LayoutSettings) -> String {
        match layout(
            &[ContentBlock::title("Jane Doe")],
            geometry,
            &StyleTable::default(),
            &BuiltinMetrics,
            settings,
        ) {
            Err(ResumeError::Validation(message)) => message,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn non_finite_geometry_is_rejected() {
        let mut page = geometry();
        page.width_mm = f64::NAN;
        let message = validation_error(&page, &LayoutSettings::default());
        assert!(message.contains("width_mm"));

        let mut page = geometry();
        page.margin_bottom_mm = f64::INFINITY;
        let message = validation_error(&page, &LayoutSettings::default());
        assert!(message.contains("margin_bottom_mm"));
    }

    #[test]
    fn negative_margin_is_rejected() {
        let geometry = PageGeometry::new(PaperSize::A4, (20.0, 20.0, 20.0, -5.0));
        let message = validation_error(&geometry, &LayoutSettings::default());
        assert!(message.contains("margin_left_mm"));
    }

    #[test]
    fn negative_chip_gap_is_rejected() {
        let settings = LayoutSettings {
            chip_gap_mm: -1.0,
            ..LayoutSettings::default()
        };
        let message = validation_error(&geometry(), &settings);
        assert!(message.contains("chip_gap_mm"));
    }

    #[test]
    fn break_fraction_must_be_a_finite_share_of_the_page() {
        for fraction in [f64::NAN, 0.0, 1.5, f64::INFINITY] {
            let settings = LayoutSettings {
                education_break_fraction: fraction,
                ..LayoutSettings::default()
            };
            let message = validation_error(&geometry(), &settings);
            assert!(message.contains("education_break_fraction"), "{fraction}");
        }
    }

    #[test]
    fn non_finite_line_height_is_rejected() {
        let settings = LayoutSettings {
            line_height_mm_per_pt: f64::NAN,
            ..LayoutSettings::default()
        };
        let message = validation_error(&geometry(), &settings);
        assert!(message.contains("line_height_mm_per_pt"));
    }
}

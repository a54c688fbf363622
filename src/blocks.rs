//! Conversion of a [`ResumeRecord`] into an ordered sequence of content blocks.
//!
//! Blocks are abstract: they carry text and a [`StyleClass`] but no position.
//! Wrapping and pagination happen later in [`crate::layout`], which has access
//! to font metrics and page geometry.

use crate::error::ResumeError;
use crate::model::{present, EducationEntry, ExperienceEntry, Profile, ProjectEntry, ResumeRecord};
use crate::style::StyleClass;

/// Kind of a content block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    Heading,
    SectionTitle,
    BodyText,
    MetaLine,
    ChipGroup,
    Divider,
}

/// Major resume sections, in rendering order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Summary,
    Skills,
    Experience,
    Education,
    Projects,
}

impl Section {
    /// Upper-case title printed at the top of the section.
    pub fn title(self) -> &'static str {
        match self {
            Section::Summary => "PROFESSIONAL SUMMARY",
            Section::Skills => "TECHNICAL SKILLS",
            Section::Experience => "PROFESSIONAL EXPERIENCE",
            Section::Education => "EDUCATION",
            Section::Projects => "PROJECTS",
        }
    }
}

/// One semantic unit of document content prior to placement.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentBlock {
    kind: BlockKind,
    style: StyleClass,
    text: String,
    chips: Vec<String>,
    section: Option<Section>,
    keep_with_next: bool,
}

impl ContentBlock {
    fn new(kind: BlockKind, style: StyleClass, text: impl Into<String>) -> Self {
        Self {
            kind,
            style,
            text: text.into(),
            chips: Vec::new(),
            section: None,
            keep_with_next: false,
        }
    }

    /// The resume owner's name at the top of the first page.
    pub fn title(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Heading, StyleClass::Title, text).keep_with_next()
    }

    /// Heading of an individual entry (position, degree, project name).
    pub fn heading(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Heading, StyleClass::Subheading, text).keep_with_next()
    }

    /// Title opening `section`.
    pub fn section_title(section: Section) -> Self {
        let mut block = Self::new(BlockKind::SectionTitle, StyleClass::SectionHeader, section.title())
            .keep_with_next();
        block.section = Some(section);
        block
    }

    /// Running paragraph text.
    pub fn body(text: impl Into<String>) -> Self {
        Self::new(BlockKind::BodyText, StyleClass::BodyText, text)
    }

    /// Secondary single-purpose line (dates, contact details, links).
    pub fn meta(text: impl Into<String>) -> Self {
        Self::new(BlockKind::MetaLine, StyleClass::MetaText, text)
    }

    /// Group of short labels rendered as boxed tags.
    pub fn chips<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut block = Self::new(BlockKind::ChipGroup, StyleClass::Chip, String::new());
        block.chips = labels.into_iter().map(Into::into).collect();
        block
    }

    /// Horizontal rule across the content width.
    pub fn divider() -> Self {
        Self::new(BlockKind::Divider, StyleClass::Rule, String::new())
    }

    fn keep_with_next(mut self) -> Self {
        self.keep_with_next = true;
        self
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn style(&self) -> StyleClass {
        self.style
    }

    /// Text content; empty for chip groups and dividers.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Chip labels; empty unless the block is a chip group.
    pub fn chip_labels(&self) -> &[String] {
        &self.chips
    }

    /// Section opened by this block, set on section titles only.
    pub fn section(&self) -> Option<Section> {
        self.section
    }

    /// Whether the block must share a page with the block that follows it.
    pub fn keeps_with_next(&self) -> bool {
        self.keep_with_next
    }
}

/// Maps a resume record to its block sequence.
///
/// Fails only when the profile has no full name; every other absent field is
/// silently left out.  Entries keep their input order.
pub fn build_blocks(record: &ResumeRecord) -> Result<Vec<ContentBlock>, ResumeError> {
    let full_name = present(&record.profile.full_name)
        .ok_or_else(|| ResumeError::Validation("profile full name is required".to_string()))?;

    let mut header = vec![ContentBlock::title(full_name)];
    push_contact_line(&mut header, &record.profile);

    let mut blocks = Vec::new();

    if let Some(summary) = present(&record.profile.summary) {
        blocks.push(ContentBlock::section_title(Section::Summary));
        blocks.push(ContentBlock::body(summary));
    }

    let skills = non_blank(&record.profile.skills);
    if !skills.is_empty() {
        blocks.push(ContentBlock::section_title(Section::Skills));
        blocks.push(ContentBlock::chips(skills));
    }

    if !record.experience.is_empty() {
        blocks.push(ContentBlock::section_title(Section::Experience));
        for entry in &record.experience {
            push_experience(&mut blocks, entry);
        }
    }

    if !record.education.is_empty() {
        blocks.push(ContentBlock::section_title(Section::Education));
        for entry in &record.education {
            push_education(&mut blocks, entry);
        }
    }

    if !record.projects.is_empty() {
        blocks.push(ContentBlock::section_title(Section::Projects));
        for entry in &record.projects {
            push_project(&mut blocks, entry);
        }
    }

    // The divider only separates the header from sections that follow it.
    if !blocks.is_empty() {
        header.push(ContentBlock::divider());
    }
    header.append(&mut blocks);
    Ok(header)
}

fn push_contact_line(blocks: &mut Vec<ContentBlock>, profile: &Profile) {
    let parts: Vec<String> = [
        ("Email", &profile.email),
        ("Phone", &profile.phone),
        ("Location", &profile.location),
        ("LinkedIn", &profile.linkedin),
        ("GitHub", &profile.github),
        ("Website", &profile.website),
    ]
    .into_iter()
    .filter_map(|(label, value)| present(value).map(|value| format!("{label}: {value}")))
    .collect();

    if !parts.is_empty() {
        blocks.push(ContentBlock::meta(parts.join(" | ")));
    }
}

fn push_experience(blocks: &mut Vec<ContentBlock>, entry: &ExperienceEntry) {
    let position = entry.position.trim();
    let company = entry.company.trim();
    let heading = match (position.is_empty(), company.is_empty()) {
        (false, false) => format!("{position} at {company}"),
        (false, true) => position.to_string(),
        (true, _) => company.to_string(),
    };
    push_heading(blocks, &heading);

    let end = if entry.current {
        Some("Present")
    } else {
        present(&entry.end_date)
    };
    if let Some(period) = period(present(&entry.start_date), end) {
        blocks.push(ContentBlock::meta(period));
    }

    if let Some(description) = present(&entry.description) {
        blocks.push(ContentBlock::body(description));
    }

    let achievements = non_blank(&entry.achievements);
    if !achievements.is_empty() {
        blocks.push(ContentBlock::chips(achievements));
    }
}

fn push_education(blocks: &mut Vec<ContentBlock>, entry: &EducationEntry) {
    let degree = entry.degree.trim();
    let heading = match present(&entry.field) {
        Some(field) if !degree.is_empty() => format!("{degree} in {field}"),
        Some(field) => field.to_string(),
        None => degree.to_string(),
    };
    push_heading(blocks, &heading);

    let mut meta = Vec::new();
    let institution = entry.institution.trim();
    if !institution.is_empty() {
        meta.push(institution.to_string());
    }
    if let Some(period) = period(present(&entry.start_date), present(&entry.end_date)) {
        meta.push(period);
    }
    if let Some(gpa) = present(&entry.gpa) {
        meta.push(format!("GPA: {gpa}"));
    }
    if !meta.is_empty() {
        blocks.push(ContentBlock::meta(meta.join(" | ")));
    }

    if let Some(description) = present(&entry.description) {
        blocks.push(ContentBlock::body(description));
    }
}

fn push_project(blocks: &mut Vec<ContentBlock>, entry: &ProjectEntry) {
    push_heading(blocks, entry.name.trim());

    let mut meta = Vec::new();
    if let Some(period) = period(present(&entry.start_date), present(&entry.end_date)) {
        meta.push(period);
    }
    if let Some(url) = present(&entry.github_url) {
        meta.push(format!("GitHub: {url}"));
    }
    if let Some(url) = present(&entry.live_url) {
        meta.push(format!("Live: {url}"));
    }
    if !meta.is_empty() {
        blocks.push(ContentBlock::meta(meta.join(" | ")));
    }

    if let Some(description) = present(&entry.description) {
        blocks.push(ContentBlock::body(description));
    }

    let technologies = non_blank(&entry.technologies);
    if !technologies.is_empty() {
        blocks.push(ContentBlock::chips(technologies));
    }
}

// An entry whose heading fields are all blank still gets its other blocks.
fn push_heading(blocks: &mut Vec<ContentBlock>, heading: &str) {
    if !heading.is_empty() {
        blocks.push(ContentBlock::heading(heading));
    }
}

fn period(start: Option<&str>, end: Option<&str>) -> Option<String> {
    match (start, end) {
        (Some(start), Some(end)) => Some(format!("{start} - {end}")),
        (Some(start), None) => Some(start.to_string()),
        (None, Some(end)) => Some(end.to_string()),
        (None, None) => None,
    }
}

fn non_blank(values: &[String]) -> Vec<&str> {
    values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EducationEntry, ExperienceEntry, Profile, ProjectEntry};

    fn kinds(blocks: &[ContentBlock]) -> Vec<BlockKind> {
        blocks.iter().map(ContentBlock::kind).collect()
    }

    #[test]
    fn missing_full_name_is_a_validation_error() {
        let record = ResumeRecord::new(Profile::default());
        assert!(matches!(
            build_blocks(&record),
            Err(ResumeError::Validation(_))
        ));

        let blank = ResumeRecord::new(Profile::new("   "));
        assert!(build_blocks(&blank).is_err());
    }

    #[test]
    fn name_only_produces_header_blocks() {
        let blocks = build_blocks(&ResumeRecord::new(Profile::new("Jane Doe"))).unwrap();
        assert_eq!(kinds(&blocks), vec![BlockKind::Heading]);
        assert_eq!(blocks[0].text(), "Jane Doe");
        assert_eq!(blocks[0].style(), StyleClass::Title);
    }

    #[test]
    fn contact_line_skips_absent_fields() {
        let mut profile = Profile::new("Jane Doe").with_email("jane@example.com");
        profile.github = Some("  ".to_string());
        profile.website = Some("jane.dev".to_string());
        let blocks = build_blocks(&ResumeRecord::new(profile)).unwrap();

        assert_eq!(blocks[1].kind(), BlockKind::MetaLine);
        assert_eq!(blocks[1].text(), "Email: jane@example.com | Website: jane.dev");
    }

    #[test]
    fn sections_follow_fixed_order() {
        let record = ResumeRecord::new(
            Profile::new("Jane Doe")
                .with_summary("Systems engineer.")
                .with_skills(["Rust", "", "SQL"]),
        )
        .with_project(ProjectEntry::new("layout engine"))
        .with_education(EducationEntry::new("MIT", "BSc"))
        .with_experience(ExperienceEntry::new("Acme", "Engineer"));

        let sections: Vec<Section> = build_blocks(&record)
            .unwrap()
            .iter()
            .filter_map(ContentBlock::section)
            .collect();
        assert_eq!(
            sections,
            vec![
                Section::Summary,
                Section::Skills,
                Section::Experience,
                Section::Education,
                Section::Projects,
            ]
        );

        let blocks = build_blocks(&record).unwrap();
        let chips = blocks
            .iter()
            .find(|block| block.kind() == BlockKind::ChipGroup)
            .unwrap();
        assert_eq!(chips.chip_labels(), ["Rust", "SQL"]);
    }

    #[test]
    fn experience_entry_maps_to_heading_meta_body_and_chips() {
        let record = ResumeRecord::new(Profile::new("Jane Doe")).with_experience(
            ExperienceEntry::new("Acme", "Engineer")
                .with_period("2020", None)
                .current()
                .with_description("Built things.")
                .with_achievements(["Shipped v1"]),
        );
        let blocks = build_blocks(&record).unwrap();
        let entry = &blocks[3..];

        assert_eq!(
            kinds(entry),
            vec![
                BlockKind::Heading,
                BlockKind::MetaLine,
                BlockKind::BodyText,
                BlockKind::ChipGroup,
            ]
        );
        assert_eq!(entry[0].text(), "Engineer at Acme");
        assert_eq!(entry[1].text(), "2020 - Present");
        assert!(entry[0].keeps_with_next());
    }

    #[test]
    fn education_meta_joins_present_parts() {
        let record = ResumeRecord::new(Profile::new("Jane Doe")).with_education(
            EducationEntry::new("MIT", "BSc")
                .with_field("Physics")
                .with_gpa("3.9"),
        );
        let blocks = build_blocks(&record).unwrap();
        assert_eq!(blocks[3].text(), "BSc in Physics");
        assert_eq!(blocks[4].text(), "MIT | GPA: 3.9");
        assert_eq!(blocks.len(), 5);
    }

    #[test]
    fn project_without_links_or_dates_has_no_meta_line() {
        let record = ResumeRecord::new(Profile::new("Jane Doe"))
            .with_project(ProjectEntry::new("pager").with_technologies(["Rust"]));
        let blocks = build_blocks(&record).unwrap();
        assert_eq!(
            kinds(&blocks[3..]),
            vec![BlockKind::Heading, BlockKind::ChipGroup]
        );
    }

    #[test]
    fn empty_sections_emit_nothing() {
        let blocks = build_blocks(&ResumeRecord::new(Profile::new("Jane Doe").with_skills(
            Vec::<String>::new(),
        )))
        .unwrap();
        assert!(blocks.iter().all(|block| block.section().is_none()));
    }
}

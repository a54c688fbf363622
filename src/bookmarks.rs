//! PDF outline entries for resume sections, written with `lopdf`.
//!
//! `printpdf` cannot emit an outline, so the exporter post-processes the
//! rendered bytes: the document is reloaded, one outline item per section
//! title is appended under a fresh `/Outlines` root, and the file is saved
//! again.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId};
use thiserror::Error;

use crate::layout::PageCanvas;

/// Errors raised while embedding section outlines.
#[derive(Debug, Error)]
pub enum BookmarkError {
    #[error("failed to parse rendered PDF: {0}")]
    Parse(#[from] lopdf::Error),

    #[error("PDF trailer has no catalog reference")]
    MissingCatalog,

    #[error("PDF catalog is not a dictionary")]
    InvalidCatalog,

    /// An anchor points past the last page of the document.
    #[error("bookmark `{title}` refers to missing page {page_number}")]
    MissingPage { title: String, page_number: usize },
}

impl From<std::io::Error> for BookmarkError {
    fn from(err: std::io::Error) -> Self {
        Self::Parse(err.into())
    }
}

/// Outline target: a section title and the 1-based page it starts on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionAnchor {
    pub title: String,
    pub page_number: usize,
}

/// Collects one anchor per placed section title, in document order.
pub fn section_anchors(pages: &[PageCanvas]) -> Vec<SectionAnchor> {
    pages
        .iter()
        .enumerate()
        .flat_map(|(index, page)| {
            page.blocks().iter().filter_map(move |block| {
                block.section.map(|section| SectionAnchor {
                    title: section.title().to_string(),
                    page_number: index + 1,
                })
            })
        })
        .collect()
}

/// Adds a flat outline with one `/Dest [page /Fit]` item per anchor.
///
/// Returns the input unchanged when `anchors` is empty.
pub fn apply_section_bookmarks(
    pdf_bytes: &[u8],
    anchors: &[SectionAnchor],
) -> Result<Vec<u8>, BookmarkError> {
    if anchors.is_empty() {
        return Ok(pdf_bytes.to_vec());
    }

    let mut document = Document::load_mem(pdf_bytes)?;
    let pages = document.get_pages();
    let items = outline_items(&mut document, anchors, &pages)?;

    let outlines_id = document.new_object_id();
    write_items(&mut document, outlines_id, &items);
    attach_outlines(&mut document, outlines_id, &items)?;

    let mut buffer = Vec::new();
    document.save_to(&mut buffer)?;
    Ok(buffer)
}

struct OutlineItem {
    object_id: ObjectId,
    page_ref: ObjectId,
    title: String,
}

fn outline_items(
    document: &mut Document,
    anchors: &[SectionAnchor],
    pages: &BTreeMap<u32, ObjectId>,
) -> Result<Vec<OutlineItem>, BookmarkError> {
    anchors
        .iter()
        .map(|anchor| {
            let page_ref = u32::try_from(anchor.page_number)
                .ok()
                .and_then(|number| pages.get(&number).copied())
                .ok_or_else(|| BookmarkError::MissingPage {
                    title: anchor.title.clone(),
                    page_number: anchor.page_number,
                })?;
            Ok(OutlineItem {
                object_id: document.new_object_id(),
                page_ref,
                title: anchor.title.clone(),
            })
        })
        .collect()
}

fn write_items(document: &mut Document, outlines_id: ObjectId, items: &[OutlineItem]) {
    for (index, item) in items.iter().enumerate() {
        let mut dictionary = Dictionary::new();
        dictionary.set("Title", Object::string_literal(item.title.as_str()));
        dictionary.set(
            "Dest",
            Object::Array(vec![Object::Reference(item.page_ref), Object::Name("Fit".into())]),
        );
        dictionary.set("Parent", Object::Reference(outlines_id));
        if let Some(previous) = index.checked_sub(1).and_then(|i| items.get(i)) {
            dictionary.set("Prev", Object::Reference(previous.object_id));
        }
        if let Some(next) = items.get(index + 1) {
            dictionary.set("Next", Object::Reference(next.object_id));
        }
        document
            .objects
            .insert(item.object_id, Object::Dictionary(dictionary));
    }
}

fn attach_outlines(
    document: &mut Document,
    outlines_id: ObjectId,
    items: &[OutlineItem],
) -> Result<(), BookmarkError> {
    let mut root = Dictionary::new();
    root.set("Type", Object::Name("Outlines".into()));
    root.set("Count", Object::Integer(items.len() as i64));
    if let (Some(first), Some(last)) = (items.first(), items.last()) {
        root.set("First", Object::Reference(first.object_id));
        root.set("Last", Object::Reference(last.object_id));
    }
    document.objects.insert(outlines_id, Object::Dictionary(root));

    let catalog_id = document
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| BookmarkError::MissingCatalog)?;
    let catalog = document
        .objects
        .get_mut(&catalog_id)
        .ok_or(BookmarkError::MissingCatalog)?
        .as_dict_mut()
        .map_err(|_| BookmarkError::InvalidCatalog)?;
    catalog.set("Outlines", Object::Reference(outlines_id));
    Ok(())
}

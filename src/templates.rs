//! Catalog of the built-in resume templates.
//!
//! Every template currently shares the same single-column layout; the id only
//! feeds the suggested file name and the export metadata.

use log::warn;
use serde::Serialize;

/// Template used when none is requested or the requested id is unknown.
pub const DEFAULT_TEMPLATE_ID: &str = "modern";

/// A selectable resume template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    /// Whether the layout is known to parse cleanly in applicant tracking systems.
    pub is_ats: bool,
}

static TEMPLATES: [Template; 8] = [
    Template {
        id: "modern",
        name: "Modern Professional",
        description: "Clean single-column layout with modern typography.",
        category: "professional",
        is_ats: true,
    },
    Template {
        id: "classic",
        name: "Classic ATS",
        description: "Traditional, conservative format for tracking systems.",
        category: "traditional",
        is_ats: true,
    },
    Template {
        id: "creative",
        name: "Creative ATS",
        description: "Subtle creative accents on a machine-readable layout.",
        category: "creative",
        is_ats: true,
    },
    Template {
        id: "minimal",
        name: "Minimalist",
        description: "Ultra-clean design that keeps attention on the content.",
        category: "minimal",
        is_ats: true,
    },
    Template {
        id: "executive",
        name: "Executive",
        description: "Senior leadership layout emphasising achievements.",
        category: "executive",
        is_ats: true,
    },
    Template {
        id: "tech",
        name: "Tech Focused",
        description: "Highlights technical skills for engineering roles.",
        category: "technology",
        is_ats: true,
    },
    Template {
        id: "academic",
        name: "Academic",
        description: "Structured format for research and teaching positions.",
        category: "academic",
        is_ats: true,
    },
    Template {
        id: "international",
        name: "Consultant",
        description: "Results-focused layout for consultants and analysts.",
        category: "international",
        is_ats: true,
    },
];

/// All templates in catalog order.
pub fn all() -> &'static [Template] {
    &TEMPLATES
}

/// Looks up a template by id.
pub fn find(id: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|template| template.id == id)
}

/// Looks up `id`, falling back to [`DEFAULT_TEMPLATE_ID`] when it is unknown.
pub fn resolve(id: &str) -> &'static Template {
    match find(id) {
        Some(template) => template,
        None => {
            warn!("unknown template `{id}`, falling back to `{DEFAULT_TEMPLATE_ID}`");
            default_template()
        }
    }
}

fn default_template() -> &'static Template {
    // The default id is the first catalog entry.
    &TEMPLATES[0]
}

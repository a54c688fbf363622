//! Style classes and the static table that maps them to concrete fonts.
//!
//! Every block produced by the builder is tagged with a [`StyleClass`].  The
//! [`StyleTable`] resolves those tags to a [`FontDescriptor`] (face, size,
//! colour and vertical spacing).  The table is validated once before layout so
//! that a misconfigured entry surfaces as [`ResumeError::Measurement`] instead
//! of producing a half-rendered document.

use std::collections::BTreeMap;
use std::fmt;

use genpdf::style::Color;
use serde::{Deserialize, Serialize};

use crate::error::ResumeError;
use crate::fonts::FontFace;

/// Closed set of semantic style tags carried by content blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleClass {
    /// The resume owner's name.
    Title,
    /// Upper-case section titles such as "EDUCATION".
    SectionHeader,
    /// Entry headings inside a section.
    Subheading,
    /// Running text.
    BodyText,
    /// Dates, contact details and other secondary lines.
    MetaText,
    /// Boxed tags in chip groups.
    Chip,
    /// Horizontal dividers.
    Rule,
}

impl StyleClass {
    /// Every style class, in declaration order.
    pub const ALL: [StyleClass; 7] = [
        StyleClass::Title,
        StyleClass::SectionHeader,
        StyleClass::Subheading,
        StyleClass::BodyText,
        StyleClass::MetaText,
        StyleClass::Chip,
        StyleClass::Rule,
    ];

    /// Stable identifier used in configuration files and messages.
    pub fn as_str(self) -> &'static str {
        match self {
            StyleClass::Title => "title",
            StyleClass::SectionHeader => "section_header",
            StyleClass::Subheading => "subheading",
            StyleClass::BodyText => "body_text",
            StyleClass::MetaText => "meta_text",
            StyleClass::Chip => "chip",
            StyleClass::Rule => "rule",
        }
    }
}

impl fmt::Display for StyleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concrete font attributes and spacing for one style class.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FontDescriptor {
    pub face: FontFace,
    pub size_pt: f64,
    #[serde(with = "hex_color")]
    pub color: Color,
    /// Background of boxed content (chips); `None` leaves it transparent.
    #[serde(default, with = "hex_color::option")]
    pub fill: Option<Color>,
    /// Space reserved above the block unless it opens a page.
    #[serde(default)]
    pub space_before_mm: f64,
    /// Gap added below the block once it is placed.
    #[serde(default)]
    pub space_after_mm: f64,
}

impl FontDescriptor {
    /// Creates a descriptor without fill or spacing.
    pub fn new(face: FontFace, size_pt: f64, color: Color) -> Self {
        Self {
            face,
            size_pt,
            color,
            fill: None,
            space_before_mm: 0.0,
            space_after_mm: 0.0,
        }
    }

    /// Sets the background fill and returns the updated descriptor.
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    /// Sets the spacing above and below and returns the updated descriptor.
    pub fn with_spacing(mut self, before_mm: f64, after_mm: f64) -> Self {
        self.space_before_mm = before_mm;
        self.space_after_mm = after_mm;
        self
    }
}

/// Mapping from every [`StyleClass`] to its [`FontDescriptor`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleTable {
    entries: BTreeMap<StyleClass, FontDescriptor>,
}

impl StyleTable {
    /// Creates an empty table; use [`StyleTable::with`] to populate it.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Inserts or replaces the descriptor for `class`.
    pub fn with(mut self, class: StyleClass, descriptor: FontDescriptor) -> Self {
        self.entries.insert(class, descriptor);
        self
    }

    /// Looks up the descriptor for `class`.
    pub fn descriptor(&self, class: StyleClass) -> Result<&FontDescriptor, ResumeError> {
        let descriptor = self
            .entries
            .get(&class)
            .ok_or_else(|| ResumeError::measurement(class, "style class missing from table"))?;

        if !(descriptor.size_pt.is_finite() && descriptor.size_pt > 0.0) {
            return Err(ResumeError::measurement(
                class,
                format!("font size must be positive, got {}", descriptor.size_pt),
            ));
        }

        if descriptor.space_before_mm < 0.0 || descriptor.space_after_mm < 0.0 {
            return Err(ResumeError::measurement(class, "spacing must not be negative"));
        }

        Ok(descriptor)
    }

    /// Checks that every style class resolves to a usable descriptor.
    pub fn validate(&self) -> Result<(), ResumeError> {
        for class in StyleClass::ALL {
            self.descriptor(class)?;
        }
        Ok(())
    }

    /// Parses a table from JSON and validates it.
    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let table: Self = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        let ink = Color::Rgb(0x1f, 0x29, 0x37);
        let accent = Color::Rgb(0x25, 0x63, 0xeb);
        let body = Color::Rgb(0x37, 0x41, 0x51);
        let muted = Color::Rgb(0x6b, 0x72, 0x80);

        Self::empty()
            .with(
                StyleClass::Title,
                FontDescriptor::new(FontFace::HelveticaBold, 20.0, ink).with_spacing(0.0, 3.0),
            )
            .with(
                StyleClass::SectionHeader,
                FontDescriptor::new(FontFace::HelveticaBold, 14.0, accent).with_spacing(4.0, 3.0),
            )
            .with(
                StyleClass::Subheading,
                FontDescriptor::new(FontFace::HelveticaBold, 12.0, ink).with_spacing(3.0, 2.0),
            )
            .with(
                StyleClass::BodyText,
                FontDescriptor::new(FontFace::Helvetica, 11.0, body).with_spacing(0.0, 1.5),
            )
            .with(
                StyleClass::MetaText,
                FontDescriptor::new(FontFace::Helvetica, 10.0, muted).with_spacing(0.0, 1.5),
            )
            .with(
                StyleClass::Chip,
                FontDescriptor::new(FontFace::Helvetica, 9.0, body)
                    .with_fill(Color::Rgb(0xf3, 0xf4, 0xf6))
                    .with_spacing(1.0, 2.0),
            )
            .with(
                StyleClass::Rule,
                FontDescriptor::new(FontFace::Helvetica, 1.0, accent).with_spacing(0.0, 0.0),
            )
    }
}

/// Serde adapter storing [`Color`] values as `#RRGGBB` strings.
mod hex_color {
    use genpdf::style::Color;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_hex(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_hex(&raw).map_err(D::Error::custom)
    }

    pub(super) fn to_hex(color: Color) -> String {
        let (r, g, b) = super::rgb_components(color);
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    pub(super) fn parse_hex(raw: &str) -> Result<Color, String> {
        let hex = raw
            .strip_prefix('#')
            .ok_or_else(|| format!("expected `#RRGGBB`, got `{raw}`"))?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("invalid RGB colour `{raw}`"));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|err| err.to_string())
        };
        Ok(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub mod option {
        use genpdf::style::Color;
        use serde::de::Error as _;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            color: &Option<Color>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match color {
                Some(color) => serializer.serialize_some(&super::to_hex(*color)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Color>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| super::parse_hex(&raw).map_err(D::Error::custom))
                .transpose()
        }
    }
}

/// Reduces any colour model to 8-bit RGB channels.
pub(crate) fn rgb_components(color: Color) -> (u8, u8, u8) {
    match color {
        Color::Rgb(r, g, b) => (r, g, b),
        Color::Greyscale(value) => (value, value, value),
        Color::Cmyk(c, m, y, k) => {
            let convert = |channel: u8| {
                let value = 255.0 * (1.0 - f64::from(channel) / 255.0) * (1.0 - f64::from(k) / 255.0);
                value.round() as u8
            };
            (convert(c), convert(m), convert(y))
        }
    }
}

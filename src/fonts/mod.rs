//! Built-in font faces and their text metrics.
//!
//! The renderer only uses the PDF base-14 Helvetica family, which every viewer
//! ships, so nothing has to be embedded.  Widths come from the Adobe font metric
//! (AFM) tables of those faces, expressed in thousandths of an em.  Using static
//! tables keeps measurement deterministic: the same text always wraps the same
//! way regardless of platform or locale.

use serde::{Deserialize, Serialize};

use crate::style::FontDescriptor;

/// Millimetres per typographic point.
pub const MM_PER_PT: f64 = 25.4 / 72.0;

/// Built-in faces available to the style table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFace {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
}

impl FontFace {
    /// Returns the matching `printpdf` base-14 font.
    pub fn builtin(self) -> printpdf::BuiltinFont {
        match self {
            FontFace::Helvetica => printpdf::BuiltinFont::Helvetica,
            FontFace::HelveticaBold => printpdf::BuiltinFont::HelveticaBold,
            FontFace::HelveticaOblique => printpdf::BuiltinFont::HelveticaOblique,
            FontFace::HelveticaBoldOblique => printpdf::BuiltinFont::HelveticaBoldOblique,
        }
    }

    fn is_bold(self) -> bool {
        matches!(self, FontFace::HelveticaBold | FontFace::HelveticaBoldOblique)
    }

    fn widths(self) -> &'static AdvanceTable {
        // Oblique faces share the upright advances.
        if self.is_bold() {
            &HELVETICA_BOLD
        } else {
            &HELVETICA
        }
    }
}

/// Measures rendered text width.
///
/// The flow engine and the wrapping helpers only talk to this trait, so tests
/// can substitute a fixed-width implementation with easy arithmetic.
pub trait TextMeasure {
    /// Width of `text` set on a single line in `font`, in millimetres.
    fn text_width_mm(&self, text: &str, font: &FontDescriptor) -> f64;
}

/// Metrics backed by the static AFM tables of the built-in faces.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinMetrics;

impl TextMeasure for BuiltinMetrics {
    fn text_width_mm(&self, text: &str, font: &FontDescriptor) -> f64 {
        let table = font.face.widths();
        let units: u32 = text.chars().map(|ch| table.advance(ch)).sum();
        f64::from(units) / 1000.0 * font.size_pt * MM_PER_PT
    }
}

/// Advance widths for ASCII 0x20..=0x7E; index = `(char as usize) - 32`.
struct AdvanceTable {
    widths: [u16; 95],
    /// Width used for characters outside the printable ASCII range.
    fallback: u16,
}

impl AdvanceTable {
    fn advance(&self, ch: char) -> u32 {
        let code = ch as usize;
        if (32..=126).contains(&code) {
            u32::from(self.widths[code - 32])
        } else {
            u32::from(self.fallback)
        }
    }
}

static HELVETICA: AdvanceTable = AdvanceTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        278, 278, 584, 584, 584, 556, 1015,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        278, 278, 278, 469, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        // {    |    }    ~
        334, 260, 334, 584,
    ],
    fallback: 556,
};

static HELVETICA_BOLD: AdvanceTable = AdvanceTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        333, 333, 584, 584, 584, 611, 975,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        333, 278, 333, 584, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        // {    |    }    ~
        389, 280, 389, 584,
    ],
    fallback: 611,
};

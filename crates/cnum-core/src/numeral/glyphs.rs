//! Glyph classification and the magnitude table.

use lazy_static::lazy_static;

/// Digit glyphs indexed by value: ASCII, fullwidth, common and formal forms.
const DIGIT_GLYPHS: [&str; 10] = [
    "0０零〇",
    "1１一壹",
    "2２二两兩貳贰",
    "3３三叁參",
    "4４四肆",
    "5５五伍",
    "6６六陸陆",
    "7７七柒",
    "8８八捌",
    "9９九玖",
];

/// Markers that introduce a fraction ("point", or colloquial currency units).
const DECIMAL_MARKERS: &str = ".点點块元";

/// Markers that negate the numeral that follows.
const NEGATIVE_MARKERS: &str = "负負-－";

/// Index of the implicit units level, one past the last magnitude.
pub const UNITS: usize = 5;

/// Magnitude keywords, largest first. The discriminant is the level index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Magnitude {
    HundredMillion = 0,
    TenThousand = 1,
    Thousand = 2,
    Hundred = 3,
    Ten = 4,
}

impl Magnitude {
    pub const ALL: [Magnitude; 5] = [
        Magnitude::HundredMillion,
        Magnitude::TenThousand,
        Magnitude::Thousand,
        Magnitude::Hundred,
        Magnitude::Ten,
    ];

    /// Magnitude at a level index, `None` for the units level and beyond.
    pub fn from_level(level: usize) -> Option<Self> {
        Self::ALL.get(level).copied()
    }

    pub fn level(self) -> usize {
        self as usize
    }

    pub fn glyphs(self) -> &'static str {
        match self {
            Magnitude::HundredMillion => "億亿",
            Magnitude::TenThousand => "万萬",
            Magnitude::Thousand => "千仟",
            Magnitude::Hundred => "佰百",
            Magnitude::Ten => "十拾",
        }
    }

    pub fn scale(self) -> i64 {
        match self {
            Magnitude::HundredMillion => 100_000_000,
            Magnitude::TenThousand => 10_000,
            Magnitude::Thousand => 1_000,
            Magnitude::Hundred => 100,
            Magnitude::Ten => 10,
        }
    }

    pub fn matches(self, ch: char) -> bool {
        self.glyphs().contains(ch)
    }
}

/// Semantic class of a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Digit(u8),
    Magnitude(Magnitude),
    DecimalMarker,
    NegativeMarker,
    Other,
}

/// Classify a character.
pub fn classify(ch: char) -> Glyph {
    if let Some(value) = digit_value(ch) {
        Glyph::Digit(value)
    } else if let Some(magnitude) = Magnitude::ALL.into_iter().find(|m| m.matches(ch)) {
        Glyph::Magnitude(magnitude)
    } else if DECIMAL_MARKERS.contains(ch) {
        Glyph::DecimalMarker
    } else if NEGATIVE_MARKERS.contains(ch) {
        Glyph::NegativeMarker
    } else {
        Glyph::Other
    }
}

/// Digit value of a digit glyph.
pub fn digit_value(ch: char) -> Option<u8> {
    DIGIT_GLYPHS
        .iter()
        .position(|glyphs| glyphs.contains(ch))
        .map(|value| value as u8)
}

pub fn is_digit(ch: char) -> bool {
    digit_value(ch).is_some()
}

pub fn is_zero(ch: char) -> bool {
    digit_value(ch) == Some(0)
}

pub fn is_decimal_marker(ch: char) -> bool {
    DECIMAL_MARKERS.contains(ch)
}

pub fn is_negative_marker(ch: char) -> bool {
    NEGATIVE_MARKERS.contains(ch)
}

/// Value of a one-character numeral: a digit's value or a magnitude's scale.
pub fn single_value(ch: char) -> Option<i64> {
    match classify(ch) {
        Glyph::Digit(value) => Some(i64::from(value)),
        Glyph::Magnitude(magnitude) => Some(magnitude.scale()),
        _ => None,
    }
}

/// Search limits for one magnitude level.
#[derive(Debug, Clone, Copy)]
pub struct LevelSpec {
    pub magnitude: Magnitude,
    /// How far past the window start the keyword may sit when reading right.
    /// `None` means the whole window.
    pub right_reach: Option<usize>,
    /// How far before the window end the keyword may sit when reading left.
    pub left_reach: Option<usize>,
}

/// The fixed magnitude levels with their search limits.
#[derive(Debug, Clone)]
pub struct MagnitudeTable {
    levels: [LevelSpec; 5],
}

lazy_static! {
    /// Table shared by every extractor.
    pub static ref MAGNITUDES: MagnitudeTable = MagnitudeTable::standard();
}

impl MagnitudeTable {
    fn standard() -> Self {
        let spec = |magnitude, right_reach, left_reach| LevelSpec {
            magnitude,
            right_reach,
            left_reach,
        };
        Self {
            levels: [
                spec(Magnitude::HundredMillion, None, None),
                // 九千九百九十九万九千九百九十九
                spec(Magnitude::TenThousand, Some(8), Some(8)),
                spec(Magnitude::Thousand, Some(3), Some(6)),
                spec(Magnitude::Hundred, Some(3), Some(3)),
                spec(Magnitude::Ten, Some(3), Some(2)),
            ],
        }
    }

    /// Spec for a level index; `None` at the units level.
    pub fn level(&self, level: usize) -> Option<&LevelSpec> {
        self.levels.get(level)
    }

    pub fn levels(&self) -> impl Iterator<Item = &LevelSpec> {
        self.levels.iter()
    }

    /// Whether `ch` may sit between an anchor and the next keyword of
    /// `level`: digits, decimal markers, and keywords of smaller levels.
    pub fn is_companion(&self, level: usize, ch: char) -> bool {
        match classify(ch) {
            Glyph::Digit(_) | Glyph::DecimalMarker => true,
            Glyph::Magnitude(magnitude) => magnitude.level() > level,
            _ => false,
        }
    }
}

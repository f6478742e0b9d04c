use std::collections::HashMap;
use std::sync::LazyLock;

/// GD&T characteristic glyphs as they appear in drawing text, mapped to
/// their characteristic names.
static CHARACTERISTICS: LazyLock<HashMap<char, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ('⏥', "flatness"),
        ('⏊', "perpendicularity"),
        ('⌭', "cylindricity"),
        ('◎', "concentricity"),
        ('⌖', "position"),
        ('⏇', "profile of a surface"),
        ('⏆', "profile of a line"),
        ('⏃', "circular runout"),
        ('⏄', "total runout"),
        ('⫽', "parallelism"),
        ('∠', "angularity"),
        ('⏤', "straightness"),
        ('⌯', "symmetry"),
    ])
});

/// Material-condition modifier glyphs found inside feature-control frames.
static CONDITION_MODIFIERS: LazyLock<HashMap<char, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ('Ⓜ', "MMC"),
        ('Ⓛ', "LMC"),
        ('Ⓟ', "projected tolerance zone"),
    ])
});

pub fn characteristic_name(c: char) -> Option<&'static str> {
    CHARACTERISTICS.get(&c).copied()
}

pub fn is_characteristic(c: char) -> bool {
    CHARACTERISTICS.contains_key(&c)
}

pub fn condition_modifier_name(c: char) -> Option<&'static str> {
    CONDITION_MODIFIERS.get(&c).copied()
}

/// Diameter prefixes are value markers, not characteristics: `⌀ 12.1 +0.1 0`
/// is a hole dimension, not a feature-control frame.
pub fn is_diameter_glyph(c: char) -> bool {
    c == '⌀' || c == 'Ø' || c == 'ø'
}

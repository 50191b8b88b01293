//! Piece (costume component) constants.

/// Maximum length of a piece category label.
pub const MAX_CATEGORY_LEN: usize = 100;

/// Categories offered to clients as suggestions. Categories are free text;
/// this list is not enforced.
pub const SUGGESTED_CATEGORIES: &[&str] = &[
    "wig",
    "dress",
    "prop",
    "shoes",
    "accessory",
    "makeup",
    "other",
];

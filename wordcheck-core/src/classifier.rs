use crate::types::*;

/// Minimum letters before an all-caps line counts as a heading
const MIN_HEADING_LETTERS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockClass {
    /// Headings are exempt from capitalization checks
    Heading,
    Body,
}

pub struct BlockClassifier;

impl Default for BlockClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, block: &Block) -> BlockClass {
        if is_heading_like(&block.text, block.location.style_name.as_deref()) {
            BlockClass::Heading
        } else {
            BlockClass::Body
        }
    }
}

/// A block reads as a heading when its style says so, or when it is an
/// all-caps line of at least six letters.
pub fn is_heading_like(text: &str, style_name: Option<&str>) -> bool {
    if style_name.is_some_and(|name| name.to_lowercase().contains("heading")) {
        return true;
    }

    let (mut letters, mut upper, mut lower) = (0usize, 0usize, 0usize);
    for c in text.chars().filter(|c| c.is_alphabetic()) {
        letters += 1;
        if c.is_uppercase() {
            upper += 1;
        } else if c.is_lowercase() {
            lower += 1;
        }
    }

    letters >= MIN_HEADING_LETTERS && lower == 0 && upper > 0
}

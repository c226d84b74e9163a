//! Document segmentation into sections.

use crate::types::Section;

/// Separator between sections: one blank line.
pub const SECTION_SEPARATOR: &str = "\n\n";

/// Split document text into trimmed, non-empty sections.
///
/// Order is preserved and duplicates are kept. Empty or whitespace-only text
/// yields no sections.
pub fn segment(text: &str) -> Vec<Section> {
    let sections: Vec<Section> = text
        .split(SECTION_SEPARATOR)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .enumerate()
        .map(|(position, block)| Section::new(position, block))
        .collect();

    tracing::debug!("Segmented document into {} sections", sections.len());

    sections
}

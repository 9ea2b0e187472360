//! Extraction of meal suggestions from free-form model output.
//!
//! The model is asked to follow the format in [`crate::prompt`], but the text
//! that comes back is only loosely structured. Parsing never fails: a block
//! that yields nothing usable is dropped, and the caller gets an empty list
//! when no block survives.

use log::debug;

use crate::model::Suggestion;
use crate::prompt::{DESCRIPTION_LABEL, NAME_LABEL, SUGGESTION_DELIMITER};

/// Name used when a block carries no name field.
pub const PLACEHOLDER_NAME: &str = "AIからの献立提案";

/// Description used when a block carries no description text.
pub const PLACEHOLDER_DESCRIPTION: &str = "詳しい説明はありませんでした。";

// Models frequently swap the full-width colon for an ASCII one.
const NAME_LABELS: [&str; 2] = [NAME_LABEL, "料理名:"];
const DESCRIPTION_LABELS: [&str; 2] = [DESCRIPTION_LABEL, "説明:"];

/// Parse the raw text returned by the service into suggestions, in order.
pub fn parse_suggestions(raw_text: &str) -> Vec<Suggestion> {
    let suggestions: Vec<Suggestion> = raw_text
        .split(SUGGESTION_DELIMITER)
        .map(|block| extract_one(block.trim()))
        .filter(is_usable)
        .collect();

    if !suggestions.is_empty() {
        debug!("Extracted {} suggestions", suggestions.len());
        return suggestions;
    }

    let whole = raw_text.trim();
    if whole.is_empty() {
        return Vec::new();
    }

    // The delimiter may be missing entirely for a single suggestion.
    debug!("No block yielded a suggestion, retrying with the whole response");
    let single = extract_one(whole);
    if has_real_name(&single) {
        vec![single]
    } else {
        debug!("Whole response yielded no named suggestion");
        Vec::new()
    }
}

/// Extract one suggestion from a single block of text.
///
/// Falls back to [`PLACEHOLDER_NAME`] and [`PLACEHOLDER_DESCRIPTION`] instead
/// of failing.
pub fn extract_one(block: &str) -> Suggestion {
    let (name, description) = match find_label(block, &NAME_LABELS) {
        Some((_, name_start)) => {
            let rest = &block[name_start..];
            let (name, remainder) = match rest.find('\n') {
                Some(newline) => (&rest[..newline], &rest[newline + 1..]),
                None => (rest, ""),
            };
            let remainder = remainder.trim();

            let description = match find_label(remainder, &DESCRIPTION_LABELS) {
                Some((_, desc_start)) => remainder[desc_start..].trim(),
                None => remainder,
            };

            (name.trim().to_string(), description.to_string())
        }
        None => match find_label(block, &DESCRIPTION_LABELS) {
            Some((label_start, desc_start)) => {
                let before = block[..label_start].trim();
                let name = if before.is_empty() {
                    PLACEHOLDER_NAME
                } else {
                    before
                };
                (name.to_string(), block[desc_start..].trim().to_string())
            }
            None => (PLACEHOLDER_NAME.to_string(), block.to_string()),
        },
    };

    let description = strip_leading_label(&description, &DESCRIPTION_LABELS);
    let description = if description.is_empty() || description == name {
        PLACEHOLDER_DESCRIPTION.to_string()
    } else {
        description.to_string()
    };

    Suggestion { name, description }
}

fn is_usable(suggestion: &Suggestion) -> bool {
    !suggestion.description.is_empty() && has_real_name(suggestion)
}

fn has_real_name(suggestion: &Suggestion) -> bool {
    !suggestion.name.is_empty() && suggestion.name != PLACEHOLDER_NAME
}

/// Earliest occurrence of any label, as (label start, content start).
fn find_label(text: &str, labels: &[&str]) -> Option<(usize, usize)> {
    labels
        .iter()
        .filter_map(|label| text.find(label).map(|pos| (pos, pos + label.len())))
        .min_by_key(|(pos, _)| *pos)
}

fn strip_leading_label<'a>(text: &'a str, labels: &[&str]) -> &'a str {
    let text = text.trim();
    labels
        .iter()
        .find_map(|label| text.strip_prefix(label))
        .map(str::trim)
        .unwrap_or(text)
}

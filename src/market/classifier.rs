//! Binary Yes/No market classification
//!
//! Reduces a record's outcome labels and quote identifiers to a canonical
//! pair with Yes first. Identifiers are positional to the raw labels, so a
//! reorder always moves labels and identifiers together.

use super::{parse_list, CanonicalOutcomePair, MarketRecord};
use thiserror::Error;

/// Lowercase labels treated as Yes
pub const YES_ALIASES: [&str; 4] = ["yes", "y", "true", "1"];
/// Lowercase labels treated as No
pub const NO_ALIASES: [&str; 4] = ["no", "n", "false", "0"];

/// Why a record is not a binary Yes/No market
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotBinary {
    /// No parseable outcome labels
    #[error("outcome labels missing")]
    MissingOutcomes,
    /// Anything other than two non-empty labels
    #[error("expected 2 outcome labels, found {0}")]
    OutcomeCount(usize),
    /// Two labels that do not form a Yes/No pair
    #[error("outcome labels {0:?} are not a Yes/No pair")]
    NotYesNo(Vec<String>),
}

/// First character upper case, the rest lower case
pub fn title_case(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn is_yes(label: &str) -> bool {
    YES_ALIASES.contains(&label.to_lowercase().as_str())
}

fn is_no(label: &str) -> bool {
    NO_ALIASES.contains(&label.to_lowercase().as_str())
}

/// Exactly two trimmed, title-cased labels
pub fn outcome_labels(record: &MarketRecord) -> Result<[String; 2], NotBinary> {
    let raw = record.outcomes.as_ref().ok_or(NotBinary::MissingOutcomes)?;
    let labels: Vec<String> = parse_list(raw).iter().map(|l| title_case(l)).collect();
    match <[String; 2]>::try_from(labels) {
        Ok(pair) => Ok(pair),
        Err(labels) if labels.is_empty() => Err(NotBinary::MissingOutcomes),
        Err(labels) => Err(NotBinary::OutcomeCount(labels.len())),
    }
}

/// Classify a record as a binary Yes/No market
pub fn classify(record: &MarketRecord) -> Result<CanonicalOutcomePair, NotBinary> {
    let [first, second] = outcome_labels(record)?;

    let yes_index = if is_yes(&first) && is_no(&second) {
        0
    } else if is_no(&first) && is_yes(&second) {
        1
    } else {
        return Err(NotBinary::NotYesNo(vec![first, second]));
    };

    let mut ids = record.token_ids();
    ids.truncate(2);

    let mut labels = [first, second];
    let mut ids: [Option<String>; 2] = {
        let mut it = ids.into_iter();
        [it.next(), it.next()]
    };
    if yes_index == 1 {
        labels.swap(0, 1);
        ids.swap(0, 1);
    }
    let [yes_label, no_label] = labels;
    let [yes_token_id, no_token_id] = ids;

    Ok(CanonicalOutcomePair {
        yes_label,
        no_label,
        yes_token_id,
        no_token_id,
        yes_index,
    })
}

/// Whether a record qualifies as a binary Yes/No market
pub fn is_binary_yes_no(record: &MarketRecord) -> bool {
    classify(record).is_ok()
}

//! Message priority classification.

use waggle_types::decision::Priority;

/// Classify a message by keyword scan.
///
/// Mentions are always urgent, regardless of text. Otherwise the urgent list
/// is scanned before the high list, case-insensitively on both sides, and
/// the first hit wins. Everything else is normal; `Priority::Low` is
/// reserved for callers and never produced here.
pub fn classify_priority(
    text: &str,
    is_mention: bool,
    urgent_keywords: &[String],
    high_priority_keywords: &[String],
) -> Priority {
    if is_mention {
        return Priority::Urgent;
    }

    let lower = text.to_lowercase();
    if urgent_keywords
        .iter()
        .any(|k| lower.contains(&k.to_lowercase()))
    {
        return Priority::Urgent;
    }
    if high_priority_keywords
        .iter()
        .any(|k| lower.contains(&k.to_lowercase()))
    {
        return Priority::High;
    }

    Priority::Normal
}

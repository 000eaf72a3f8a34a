//! Cycle extraction from the search landing page
//!
//! The landing page carries a `<select id="cycle">` whose options read like
//! `Current 1801` or `Next 1802`, with the cycle code as the option value.

use super::{normalize_label, Cycle, CycleKind};
use scraper::{Html, Selector};

/// Finds the cycle option whose text contains the requested kind's label
///
/// # Returns
///
/// * `Some(Cycle)` - The option was found and carries a `value`
/// * `None` - No such option (e.g. the next cycle is not published yet), or
///   the selector markup is missing or malformed
///
/// # Example
///
/// ```
/// use terminal_procedures::cycle::extract_cycle;
/// use terminal_procedures::CycleKind;
/// use scraper::Html;
///
/// let html = r#"<select id="cycle"><option value="1801">Current 1801</option></select>"#;
/// let cycle = extract_cycle(&Html::parse_document(html), CycleKind::Current).unwrap();
/// assert_eq!(cycle.code, "1801");
/// ```
pub fn extract_cycle(document: &Html, kind: CycleKind) -> Option<Cycle> {
    let option_selector = Selector::parse("select#cycle > option").ok()?;

    document
        .select(&option_selector)
        .map(|option| (option, normalize_label(&option.text().collect::<String>())))
        .find(|(_, label)| label.contains(kind.label()))
        .and_then(|(option, label)| {
            let code = option.value().attr("value")?.trim().to_string();
            Some(Cycle { label, code })
        })
}

//! HTML parser for search result pages
//!
//! This module turns one results page into records:
//! - Detecting the explicit "No results found." message
//! - Locating the `#resultsTable` and mapping its rows to `ProcedureRecord`s
//! - Reading the highest page number from the pagination control
//! - Reading the effective date range from the results summary
//!
//! Column positions are a fixed contract with the upstream page (1-indexed):
//!
//! | # | Column |
//! |---|--------|
//! | 1 | State |
//! | 2 | City |
//! | 3 | Airport |
//! | 4 | Ident |
//! | 5 | Volume |
//! | 6 | Flag |
//! | 7 | Type |
//! | 8 | Procedure name / link |
//! | 9 | Compare name / link |

use crate::cycle::{locate_date_range, normalize_label, parse_effective_dates, EffectiveDateRange};
use crate::procedure::{FlagMeaning, Link, ProcedureRecord};
use scraper::{ElementRef, Html, Selector};
use url::Url;

const STATE_COLUMN: usize = 1;
const CITY_COLUMN: usize = 2;
const AIRPORT_COLUMN: usize = 3;
const IDENT_COLUMN: usize = 4;
const VOLUME_COLUMN: usize = 5;
const FLAG_COLUMN: usize = 6;
const TYPE_COLUMN: usize = 7;
const PROCEDURE_COLUMN: usize = 8;
const COMPARE_COLUMN: usize = 9;

const NO_RESULTS_MARKER: &str = "No results found.";
const RESULTS_TABLE_SELECTOR: &str = "#resultsTable";
const PAGINATION_LINK_SELECTOR: &str = ".pagination a[href]";
const SUMMARY_SELECTOR: &str = "#resultsSummary, .resultsSummary";

/// Pagination arrows; these never carry the highest page number
const PAGINATION_ARROWS: &[&str] = &[
    "«", "»", "‹", "›", "<", ">", "<<", ">>", "Prev", "Previous", "Next",
];

/// How a results page was interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// A results table was found
    Results,

    /// The page explicitly said "No results found."
    NoResults,

    /// Neither a results table nor the no-results message was found
    MissingTable,
}

/// Records and pagination of one results page
#[derive(Debug, Clone)]
pub struct PageResult {
    pub records: Vec<ProcedureRecord>,

    /// Highest page number in the pagination control; 0 when there is none
    pub page_count: u32,

    pub outcome: PageOutcome,

    /// Range printed in the results summary and stamped on every record
    pub effective_dates: Option<EffectiveDateRange>,
}

impl PageResult {
    fn empty(outcome: PageOutcome) -> Self {
        Self {
            records: Vec::new(),
            page_count: 0,
            outcome,
            effective_dates: None,
        }
    }
}

/// Parses a results page
///
/// A results table always wins. Without one, a page whose message block reads
/// "No results found." is [`PageOutcome::NoResults`]; anything else is not an
/// error but is logged and reported as [`PageOutcome::MissingTable`].
///
/// # Arguments
///
/// * `html` - The page body
/// * `page_url` - The URL the page was fetched from, for resolving relative links
pub fn parse_results_page(html: &str, page_url: &Url) -> PageResult {
    let document = Html::parse_document(html);

    let table = Selector::parse(RESULTS_TABLE_SELECTOR)
        .ok()
        .and_then(|selector| document.select(&selector).next());
    let Some(table) = table else {
        if has_no_results_marker(&document) {
            tracing::debug!("No results at {}", page_url);
            return PageResult::empty(PageOutcome::NoResults);
        }
        tracing::warn!("Results table missing from {}", page_url);
        return PageResult::empty(PageOutcome::MissingTable);
    };

    let page_count = extract_page_count(&document, page_url);
    let effective_dates = extract_effective_dates(&document);

    let records = match Selector::parse("tr") {
        Ok(row_selector) => table
            .select(&row_selector)
            .filter_map(|row| extract_row(row, effective_dates.as_ref(), page_url))
            .collect(),
        Err(_) => Vec::new(),
    };

    tracing::debug!(
        "Parsed {} records from {} ({} pages reported)",
        records.len(),
        page_url,
        page_count
    );

    PageResult {
        records,
        page_count,
        outcome: PageOutcome::Results,
        effective_dates,
    }
}

/// Converts one table row into a record
///
/// Rows whose type column is empty or absent (headers, section dividers) are
/// not procedures and yield `None`.
pub fn extract_row(
    row: ElementRef<'_>,
    effective_dates: Option<&EffectiveDateRange>,
    page_url: &Url,
) -> Option<ProcedureRecord> {
    let procedure_type = column_text(row, TYPE_COLUMN).unwrap_or_default();
    if procedure_type.is_empty() {
        return None;
    }

    let flag = column_text(row, FLAG_COLUMN).unwrap_or_default();

    Some(ProcedureRecord {
        state: column_text(row, STATE_COLUMN).unwrap_or_default(),
        city: column_text(row, CITY_COLUMN).unwrap_or_default(),
        airport: column_text(row, AIRPORT_COLUMN).unwrap_or_default(),
        ident: column_text(row, IDENT_COLUMN).unwrap_or_default(),
        volume: column_text(row, VOLUME_COLUMN).unwrap_or_default(),
        flag_meaning: FlagMeaning::from_flag(&flag),
        flag,
        procedure_type,
        procedure: column_link(row, PROCEDURE_COLUMN, page_url).unwrap_or_default(),
        compare: column_link(row, COMPARE_COLUMN, page_url).unwrap_or_default(),
        effective_start_date: effective_dates.map(|range| range.start),
        effective_end_date: effective_dates.map(|range| range.end),
    })
}

/// Returns the `index`-th (1-based) child element of a row if it is a `<td>`
fn column(row: ElementRef<'_>, index: usize) -> Option<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .nth(index.checked_sub(1)?)
        .filter(|cell| cell.value().name() == "td")
}

/// Whitespace-normalized text of a column; `None` when the row has no such cell
pub fn column_text(row: ElementRef<'_>, index: usize) -> Option<String> {
    column(row, index).map(|cell| normalize_label(&cell.text().collect::<String>()))
}

/// Text of a column plus the target of the first anchor in it
pub fn column_link(row: ElementRef<'_>, index: usize, page_url: &Url) -> Option<Link> {
    let cell = column(row, index)?;
    let name = normalize_label(&cell.text().collect::<String>());

    let url = Selector::parse("a[href]").ok().and_then(|anchor| {
        cell.select(&anchor)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| resolve_link(href, page_url))
    });

    Some(Link { name, url })
}

/// Resolves an href against the page URL, keeping it verbatim if it cannot be joined
fn resolve_link(href: &str, page_url: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    match page_url.join(href) {
        Ok(absolute_url) => Some(absolute_url.to_string()),
        Err(_) => Some(href.to_string()),
    }
}

/// True when some element's whole text is the no-results message
fn has_no_results_marker(document: &Html) -> bool {
    let Ok(any) = Selector::parse("body *") else {
        return false;
    };

    document
        .select(&any)
        .any(|element| normalize_label(&element.text().collect::<String>()) == NO_RESULTS_MARKER)
}

/// Highest `page` query parameter among non-arrow pagination links
fn extract_page_count(document: &Html, page_url: &Url) -> u32 {
    let Ok(link_selector) = Selector::parse(PAGINATION_LINK_SELECTOR) else {
        return 0;
    };

    document
        .select(&link_selector)
        .filter(|link| {
            let text = normalize_label(&link.text().collect::<String>());
            !PAGINATION_ARROWS.contains(&text.as_str())
        })
        .filter_map(|link| link.value().attr("href"))
        .filter_map(|href| page_url.join(href.trim()).ok())
        .filter_map(|url| {
            url.query_pairs()
                .find(|(key, _)| key == "page")
                .and_then(|(_, value)| value.trim().parse::<u32>().ok())
        })
        .max()
        .unwrap_or(0)
}

/// Date range printed in the results summary
fn extract_effective_dates(document: &Html) -> Option<EffectiveDateRange> {
    let selector = Selector::parse(SUMMARY_SELECTOR).ok()?;
    let summary = document.select(&selector).next()?;
    let text = normalize_label(&summary.text().collect::<String>());

    let range = locate_date_range(&text).and_then(|range| parse_effective_dates(range));
    if range.is_none() {
        tracing::warn!("Could not read effective dates from summary '{}'", text);
    }
    range
}

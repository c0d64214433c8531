//! Grade extraction from the portal's home page HTML
//!
//! Items are read in document order (newest first). An item missing one of its
//! elements is skipped and counted; it never fails the batch.

use scraper::{ElementRef, Html, Selector};

use crate::consts::{DATE_SELECTOR, GRADE_SELECTOR, ITEM_SELECTOR, SUBJECT_SELECTOR};
use crate::core::GradeRecord;
use crate::error::{ExtractError, ItemParseError};

/// Result of one extraction pass
#[derive(Debug, Default)]
pub(crate) struct Extraction {
    pub(crate) records: Vec<GradeRecord>,
    pub(crate) skipped: usize,
}

struct GradeSelectors {
    item: Selector,
    subject: Selector,
    date: Selector,
    grade: Selector,
}

impl GradeSelectors {
    fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            item: parse_selector(ITEM_SELECTOR)?,
            subject: parse_selector(SUBJECT_SELECTOR)?,
            date: parse_selector(DATE_SELECTOR)?,
            grade: parse_selector(GRADE_SELECTOR)?,
        })
    }
}

fn parse_selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Selector(format!("{css}: {e:?}")))
}

pub(crate) fn extract_grades(html: &str) -> Result<Extraction, ExtractError> {
    let selectors = GradeSelectors::new()?;
    let document = Html::parse_document(html);

    let mut extraction = Extraction::default();
    for (index, item) in document.select(&selectors.item).enumerate() {
        match parse_item(item, &selectors) {
            Ok(record) => extraction.records.push(record),
            Err(e) => {
                log::debug!("Skipping grade item {index}: {e}");
                extraction.skipped += 1;
            }
        }
    }

    Ok(extraction)
}

fn parse_item(item: ElementRef<'_>, selectors: &GradeSelectors) -> Result<GradeRecord, ItemParseError> {
    let subject = first_text(item, &selectors.subject, "subject")?;
    let date = first_text(item, &selectors.date, "date")?;
    let grade = item
        .select(&selectors.grade)
        .next()
        .ok_or(ItemParseError::MissingField("grade"))?;

    Ok(GradeRecord::new(subject, date, visible_text(grade)))
}

fn first_text(
    item: ElementRef<'_>,
    selector: &Selector,
    field: &'static str,
) -> Result<String, ItemParseError> {
    let element = item
        .select(selector)
        .next()
        .ok_or(ItemParseError::MissingField(field))?;
    Ok(visible_text(element))
}

/// Text as the page renders it: each run of whitespace, line breaks included,
/// becomes a single space. A grade split over two lines ("15" / "/20") reads
/// "15 /20".
fn visible_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

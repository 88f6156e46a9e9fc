use std::collections::HashSet;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::text::{inline_text, joined_text};
use super::{Extraction, Tactic};
use crate::constants::{RAW_TEXT_SEPARATOR, TEXT_BLOCK_MIN_CHARS, TEXT_BLOCK_SCAN_LIMIT};
use crate::types::RawRecord;

/// Likely partner-entry containers, most specific first
pub const CONTAINER_SELECTORS: [&str; 9] = [
    ".partner-item",
    ".partners-list li",
    ".partner-card",
    ".partner",
    "[class*='partner']",
    ".company-item",
    ".company",
    ".list-item",
    ".item",
];

const NAME_SELECTOR: &str = "h2, h3, h4, .name, .title, strong";
const ADDRESS_SELECTORS: [&str; 3] = [".address", "[class*='address']", ".location"];
const PHONE_SELECTORS: [&str; 4] = [".phone", "[class*='phone']", ".tel", "a[href^='tel']"];
const REGION_SELECTORS: [&str; 4] = [".region", ".city", "[class*='region']", "[class*='city']"];
const CATEGORY_SELECTORS: [&str; 4] = [".category", ".type", "[class*='category']", "[class*='type']"];

fn css(selector: &str) -> Selector {
    Selector::parse(selector).expect("static selector must parse")
}

fn css_list(selectors: &[&str]) -> Vec<Selector> {
    selectors.iter().map(|s| css(s)).collect()
}

static TABLE: Lazy<Selector> = Lazy::new(|| css("table"));
static ROW: Lazy<Selector> = Lazy::new(|| css("tr"));
static CELL: Lazy<Selector> = Lazy::new(|| css("th, td"));
static TEXT_BLOCK: Lazy<Selector> = Lazy::new(|| css("p, li, div"));
static NAME: Lazy<Selector> = Lazy::new(|| css(NAME_SELECTOR));

static CONTAINERS: Lazy<Vec<(&'static str, Selector)>> =
    Lazy::new(|| CONTAINER_SELECTORS.iter().map(|s| (*s, css(s))).collect());
static ADDRESS: Lazy<Vec<Selector>> = Lazy::new(|| css_list(&ADDRESS_SELECTORS));
static PHONE: Lazy<Vec<Selector>> = Lazy::new(|| css_list(&PHONE_SELECTORS));
static REGION: Lazy<Vec<Selector>> = Lazy::new(|| css_list(&REGION_SELECTORS));
static CATEGORY: Lazy<Vec<Selector>> = Lazy::new(|| css_list(&CATEGORY_SELECTORS));

/// First `<table>`: header row names the fields, each later row with cells is a record.
pub fn table(document: &Html) -> Extraction {
    let Some(table) = document.select(&TABLE).next() else {
        return Extraction::NotFound;
    };
    let rows: Vec<ElementRef> = table.select(&ROW).collect();
    let Some((header_row, data_rows)) = rows.split_first() else {
        return Extraction::NotFound;
    };

    let header: Vec<String> = header_row.select(&CELL).map(inline_text).collect();
    let mut records = Vec::new();

    for row in data_rows {
        let cells: Vec<String> = row.select(&CELL).map(inline_text).collect();
        if cells.is_empty() {
            continue;
        }

        let record: RawRecord = if header.is_empty() {
            cells
                .into_iter()
                .enumerate()
                .map(|(i, cell)| (format!("col_{}", i), cell))
                .collect()
        } else {
            if header.len() != cells.len() {
                debug!(
                    header = header.len(),
                    cells = cells.len(),
                    "row width differs from header, truncating to the shorter"
                );
            }
            header.iter().cloned().zip(cells).collect()
        };
        records.push(record);
    }

    Extraction::found(Tactic::Table, records)
}

/// First container selector with any match decides the record set.
pub fn containers(document: &Html) -> Extraction {
    for (selector_text, selector) in CONTAINERS.iter() {
        let items: Vec<ElementRef> = document.select(selector).collect();
        if items.is_empty() {
            continue;
        }
        debug!(selector = selector_text, count = items.len(), "container selector matched");

        let records = items.into_iter().map(container_record).collect();
        return Extraction::found(Tactic::Container(*selector_text), records);
    }
    Extraction::NotFound
}

fn container_record(item: ElementRef<'_>) -> RawRecord {
    let name = item
        .select(&NAME)
        .next()
        .map_or_else(|| inline_text(item), inline_text);

    let mut record = RawRecord::new();
    record.insert("name", name);
    record.insert("address", first_match_text(item, &ADDRESS));
    record.insert("phone", first_match_text(item, &PHONE));
    record.insert("region", first_match_text(item, &REGION));
    record.insert("category", first_match_text(item, &CATEGORY));
    record.insert("raw_text", joined_text(item, RAW_TEXT_SEPARATOR));
    record
}

/// Text of the first element matched by the first selector that matches anything.
fn first_match_text(parent: ElementRef<'_>, selectors: &[Selector]) -> String {
    selectors
        .iter()
        .find_map(|selector| parent.select(selector).next())
        .map(inline_text)
        .unwrap_or_default()
}

/// Distinct, non-trivial text of the first paragraph-like elements.
pub fn text_blocks(document: &Html) -> Extraction {
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for block in document.select(&TEXT_BLOCK).take(TEXT_BLOCK_SCAN_LIMIT) {
        let text = joined_text(block, " ");
        if text.chars().count() > TEXT_BLOCK_MIN_CHARS && seen.insert(text.clone()) {
            records.push(RawRecord::from_iter([("raw_text", text)]));
        }
    }

    Extraction::found(Tactic::TextBlocks, records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(extraction: Extraction) -> Vec<RawRecord> {
        extraction.into_records()
    }

    #[test]
    fn test_all_static_selectors_parse() {
        Lazy::force(&TABLE);
        Lazy::force(&ROW);
        Lazy::force(&CELL);
        Lazy::force(&TEXT_BLOCK);
        Lazy::force(&NAME);
        assert_eq!(CONTAINERS.len(), CONTAINER_SELECTORS.len());
        assert_eq!(ADDRESS.len(), 3);
        assert_eq!(PHONE.len(), 4);
        assert_eq!(REGION.len(), 4);
        assert_eq!(CATEGORY.len(), 4);
    }

    #[test]
    fn test_table_zips_header_to_cells() {
        let document = Html::parse_document(
            "<table>
                <tr><th>Ad</th><th>Telefon</th></tr>
                <tr><td>Bank A</td><td>012-345</td></tr>
                <tr><td>Bank B</td><td>012-999</td></tr>
            </table>",
        );

        let found = records(table(&document));
        assert_eq!(
            found,
            vec![
                RawRecord::from_iter([("Ad", "Bank A"), ("Telefon", "012-345")]),
                RawRecord::from_iter([("Ad", "Bank B"), ("Telefon", "012-999")]),
            ]
        );
    }

    #[test]
    fn test_table_without_header_cells_uses_positional_names() {
        let document = Html::parse_document(
            "<table><tr></tr><tr><td>Alpha</td><td>Baku</td></tr></table>",
        );

        let found = records(table(&document));
        assert_eq!(
            found,
            vec![RawRecord::from_iter([("col_0", "Alpha"), ("col_1", "Baku")])]
        );
    }

    #[test]
    fn test_table_truncates_to_shorter_side() {
        let document = Html::parse_document(
            "<table>
                <tr><td>name</td><td>phone</td><td>site</td></tr>
                <tr><td>Alpha</td><td>111</td></tr>
                <tr><td>Beta</td><td>222</td><td>beta.az</td><td>extra</td></tr>
            </table>",
        );

        let found = records(table(&document));
        assert_eq!(found[0], RawRecord::from_iter([("name", "Alpha"), ("phone", "111")]));
        assert_eq!(
            found[1],
            RawRecord::from_iter([("name", "Beta"), ("phone", "222"), ("site", "beta.az")])
        );
    }

    #[test]
    fn test_table_with_only_a_header_is_not_found() {
        let document = Html::parse_document("<table><tr><th>Ad</th></tr></table>");
        assert!(matches!(table(&document), Extraction::NotFound));
    }

    #[test]
    fn test_container_record_fields() {
        let document = Html::parse_document(
            r#"<div class="company">
                <h3>Alpha Build</h3>
                <span class="address">Baku, Nizami 5</span>
                <a href="tel:+99412000">+994 12 000</a>
            </div>"#,
        );

        match containers(&document) {
            Extraction::Found { tactic, records } => {
                assert_eq!(tactic, Tactic::Container(".company"));
                assert_eq!(records.len(), 1);
                let record = &records[0];
                assert_eq!(record.get("name"), Some("Alpha Build"));
                assert_eq!(record.get("address"), Some("Baku, Nizami 5"));
                assert_eq!(record.get("phone"), Some("+994 12 000"));
                assert_eq!(record.get("region"), Some(""));
                assert_eq!(record.get("category"), Some(""));
                assert_eq!(
                    record.get("raw_text"),
                    Some("Alpha Build | Baku, Nizami 5 | +994 12 000")
                );
                assert_eq!(
                    record.keys().collect::<Vec<_>>(),
                    vec!["name", "address", "phone", "region", "category", "raw_text"]
                );
            }
            Extraction::NotFound => panic!("expected containers"),
        }
    }

    #[test]
    fn test_first_matching_container_selector_wins() {
        let document = Html::parse_document(
            r#"<div class="partner-card"><strong>Card One</strong></div>
               <div class="partner-card"><strong>Card Two</strong></div>
               <div class="item"><strong>Generic</strong></div>"#,
        );

        let found = records(containers(&document));
        let names: Vec<_> = found.iter().filter_map(|r| r.get("name")).collect();
        assert_eq!(names, vec!["Card One", "Card Two"]);
    }

    #[test]
    fn test_container_name_falls_back_to_container_text() {
        let document = Html::parse_document(
            r#"<ul class="partners-list"><li>Gamma <em>Construction</em></li></ul>"#,
        );

        let found = records(containers(&document));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get("name"), Some("Gamma Construction"));
        assert_eq!(found[0].get("raw_text"), Some("Gamma | Construction"));
    }

    #[test]
    fn test_sub_field_uses_first_selector_with_a_match() {
        let document = Html::parse_document(
            r#"<div class="partner-item">
                <span class="city">Sumqayit</span>
                <span class="region">Absheron</span>
                <span class="building-type">Residential</span>
            </div>"#,
        );

        let found = records(containers(&document));
        assert_eq!(found[0].get("region"), Some("Absheron"));
        assert_eq!(found[0].get("category"), Some("Residential"));
    }

    #[test]
    fn test_text_blocks_filter_short_and_duplicate_text() {
        let document = Html::parse_document(
            "<p>short</p>
             <p>exactly10c</p>
             <p>A long enough paragraph</p>
             <p>A long   enough paragraph</p>
             <li>Another list entry here</li>",
        );

        let found = records(text_blocks(&document));
        let texts: Vec<_> = found.iter().filter_map(|r| r.get("raw_text")).collect();
        assert_eq!(texts, vec!["A long enough paragraph", "Another list entry here"]);
        assert!(found.iter().all(|r| r.len() == 1));
    }

    #[test]
    fn test_text_blocks_scan_is_bounded() {
        let body: String = (0..310)
            .map(|i| format!("<p>Paragraph number {:03}</p>", i))
            .collect();
        let document = Html::parse_document(&body);

        let found = records(text_blocks(&document));
        assert_eq!(found.len(), TEXT_BLOCK_SCAN_LIMIT);
        assert_eq!(found[0].get("raw_text"), Some("Paragraph number 000"));
    }

    #[test]
    fn test_text_blocks_on_empty_page_is_not_found() {
        let document = Html::parse_document("<html><body></body></html>");
        assert!(matches!(text_blocks(&document), Extraction::NotFound));
    }
}

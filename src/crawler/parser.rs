//! HTML parser for catalog listing pages
//!
//! This module extracts from a listing page:
//! - One `Item` per `.product_pod` container
//! - The catalog's total page count, from the "Page 1 of N" pager text

use crate::state::{rating_from_label, Item};
use scraper::{ElementRef, Html, Selector};

const ITEM_CONTAINER: &str = ".product_pod";
const ITEM_TITLE: &str = "h3 a";
const ITEM_PRICE: &str = ".price_color";
const ITEM_RATING: &str = ".star-rating";
const PAGER_CURRENT: &str = ".current";

/// Extracted contents of one listing page
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPage {
    /// Items in document order
    pub items: Vec<Item>,

    /// Total page count, only when discovery was requested
    pub total_pages: Option<u32>,
}

/// Parses a listing page
///
/// # Arguments
///
/// * `html` - The page markup
/// * `discover_limit` - Also read the total page count from the pager
///
/// # Returns
///
/// * `Ok(ParsedPage)` - Items (and page count, if requested)
/// * `Err(String)` - The markup lacks the expected structure: no item
///   containers, a container missing its title/price/rating element, or a
///   missing pager when discovery was requested
///
/// # Example
///
/// ```
/// use catalog_harvest::crawler::parse_catalog_page;
///
/// let html = r#"<article class="product_pod">
///     <p class="star-rating Three"></p>
///     <h3><a title="A Light in the Attic">A Light in the ...</a></h3>
///     <p class="price_color">£51.77</p>
/// </article>"#;
/// let parsed = parse_catalog_page(html, false).unwrap();
/// assert_eq!(parsed.items[0].rating, 3);
/// ```
pub fn parse_catalog_page(html: &str, discover_limit: bool) -> Result<ParsedPage, String> {
    let document = Html::parse_document(html);

    let items = extract_items(&document)?;

    let total_pages = if discover_limit {
        Some(extract_total_pages(&document)?)
    } else {
        None
    };

    Ok(ParsedPage { items, total_pages })
}

fn selector(css: &str) -> Result<Selector, String> {
    Selector::parse(css).map_err(|e| format!("invalid selector '{}': {:?}", css, e))
}

/// Extracts every item container on the page
fn extract_items(document: &Html) -> Result<Vec<Item>, String> {
    let container = selector(ITEM_CONTAINER)?;
    let title = selector(ITEM_TITLE)?;
    let price = selector(ITEM_PRICE)?;
    let rating = selector(ITEM_RATING)?;

    let items = document
        .select(&container)
        .enumerate()
        .map(|(index, pod)| extract_item(pod, index, &title, &price, &rating))
        .collect::<Result<Vec<_>, _>>()?;

    if items.is_empty() {
        return Err(format!("no '{}' item containers found", ITEM_CONTAINER));
    }

    Ok(items)
}

fn extract_item(
    pod: ElementRef<'_>,
    index: usize,
    title_sel: &Selector,
    price_sel: &Selector,
    rating_sel: &Selector,
) -> Result<Item, String> {
    let position = index + 1;

    let title = pod
        .select(title_sel)
        .next()
        .and_then(|anchor| anchor.value().attr("title"))
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| format!("item {} has no title attribute", position))?;

    let price = pod
        .select(price_sel)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .ok_or_else(|| format!("item {} has no price element", position))?;

    let label = pod
        .select(rating_sel)
        .next()
        .ok_or_else(|| format!("item {} has no rating element", position))?
        .value()
        .classes()
        .find(|class| *class != "star-rating")
        .unwrap_or_default();

    Ok(Item::new(title, price, rating_from_label(label)))
}

/// Reads N from pager text of the form "Page 1 of N"
fn extract_total_pages(document: &Html) -> Result<u32, String> {
    let current = selector(PAGER_CURRENT)?;

    let text = document
        .select(&current)
        .next()
        .map(|element| element.text().collect::<String>())
        .ok_or_else(|| format!("no '{}' page indicator found", PAGER_CURRENT))?;

    parse_page_indicator(&text)
        .ok_or_else(|| format!("unrecognized page indicator '{}'", text.trim()))
}

/// Parses the page count out of "Page <current> of <total>"
fn parse_page_indicator(text: &str) -> Option<u32> {
    let total = text.split_whitespace().nth(3)?.parse::<u32>().ok()?;
    (total > 0).then_some(total)
}

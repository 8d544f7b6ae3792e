use std::sync::LazyLock;

use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;
use url::Url;

use super::links::{decode_anchor, LinkKind};
use super::normalize_ws;
use crate::error::ParseError;
use crate::model::Promotion;

static TABLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.InformationBoxTable").unwrap());
static TITLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.InformationBoxTitle").unwrap());
static CONTENTS_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.InformationBoxContents").unwrap());
static ANCHOR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

const KEY_NAME: &str = "Name of the event:";
const KEY_DATE: &str = "Date:";
const KEY_PROMOTION: &str = "Promotion:";
const KEY_ARENA: &str = "Arena:";

const DATE_FORMAT: &str = "%d.%m.%Y";

/// Header fields of a show page.
#[derive(Debug, Clone)]
pub struct ShowInfo {
    pub name: String,
    pub arena: String,
    pub date: NaiveDate,
    pub promotion: Promotion,
}

/// Pair info-box titles with their values in document order.
///
/// Both lists must be the same length; a page where they are not would pair
/// every later title with the wrong value.
pub fn pair_entries<'a>(doc: &'a Html) -> Result<Vec<(String, ElementRef<'a>)>, ParseError> {
    let table = doc
        .select(&TABLE_SEL)
        .next()
        .ok_or(ParseError::MissingField("information box"))?;

    let titles: Vec<String> = table
        .select(&TITLE_SEL)
        .map(|t| normalize_ws(&t.text().collect::<String>()))
        .collect();
    let values: Vec<ElementRef> = table.select(&CONTENTS_SEL).collect();

    if titles.len() != values.len() {
        return Err(ParseError::InfoBoxMismatch {
            titles: titles.len(),
            values: values.len(),
        });
    }

    Ok(titles.into_iter().zip(values).collect())
}

pub fn parse_info_box(doc: &Html, base: &Url) -> Result<ShowInfo, ParseError> {
    let entries = pair_entries(doc)?;
    let lookup = |key: &'static str| {
        entries
            .iter()
            .find(|(title, _)| title == key)
            .map(|(_, value)| *value)
            .ok_or(ParseError::MissingField(key))
    };

    let name = element_text(lookup(KEY_NAME)?);
    let arena = element_text(lookup(KEY_ARENA)?);
    let date = parse_date(&element_text(lookup(KEY_DATE)?))?;

    let promotion = match resolve_promotion(base, lookup(KEY_PROMOTION)?) {
        Ok(p) => p,
        Err(e) => {
            warn!("{} on show {:?}, using placeholder promotion", e, name);
            Promotion::unknown()
        }
    };

    Ok(ShowInfo {
        name,
        arena,
        date,
        promotion,
    })
}

/// Resolve the promotion cell to its promotion link.
///
/// The cell often carries a logo link ahead of the text link; the first
/// promotion link with visible text wins.
pub fn resolve_promotion(base: &Url, cell: ElementRef) -> Result<Promotion, ParseError> {
    let mut links: Vec<(u64, String)> = cell
        .select(&ANCHOR_SEL)
        .filter_map(|a| decode_anchor(base, a))
        .filter_map(|link| match (link.kind, link.nr) {
            (LinkKind::Promotion, Some(nr)) => Some((nr, link.text)),
            _ => None,
        })
        .collect();

    let pick = links
        .iter()
        .position(|(_, text)| !text.is_empty())
        .unwrap_or(0);
    if links.is_empty() {
        return Err(ParseError::AmbiguousPromotion);
    }
    let (nr, name) = links.swap_remove(pick);
    Ok(Promotion {
        id: nr as i64,
        name,
    })
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| ParseError::InvalidDate(raw.to_string()))
}

fn element_text(el: ElementRef) -> String {
    normalize_ws(&el.text().collect::<String>())
}

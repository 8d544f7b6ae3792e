pub mod infobox;
pub mod links;
pub mod results;
pub mod workers;

use scraper::Html;
use tracing::debug;
use url::Url;

use crate::error::ParseError;
use crate::model::{Show, ShowKind, Worker};
use crate::resolve;
use crate::translate::translate_if;
use results::MatchSegment;

pub struct ParseOptions {
    pub base_url: Url,
    pub translate_names: bool,
}

/// Everything recovered from one show page.
#[derive(Debug, Clone)]
pub struct ParsedShow {
    pub show: Show,
    pub workers: Vec<Worker>,
    pub segments: Vec<MatchSegment>,
    /// Participant fragments that produced no worker.
    pub dropped: usize,
}

/// Page pipeline: info box → match results → participant list → validated workers.
pub fn parse_show_page(
    html: &str,
    url: &str,
    kind: ShowKind,
    opts: &ParseOptions,
) -> Result<ParsedShow, ParseError> {
    let show_id = links::query_param(&opts.base_url, url, "nr")
        .filter(|nr| !nr.trim().is_empty())
        .ok_or_else(|| ParseError::MissingShowId(url.to_string()))?;

    let doc = Html::parse_document(html);
    let info = infobox::parse_info_box(&doc, &opts.base_url)?;
    let segments = results::parse_segments(&doc, &opts.base_url);
    let extraction = workers::extract_candidates(&doc, &opts.base_url);
    let (workers, rejected) = resolve::resolve_candidates(extraction.candidates, &segments);

    debug!(
        show_id = %show_id,
        matches = segments.len(),
        workers = workers.len(),
        dropped = extraction.dropped + rejected,
        "parsed show page"
    );

    Ok(ParsedShow {
        show: Show {
            show_id: show_id.trim().to_string(),
            arena: info.arena,
            date: info.date,
            name: translate_if(&info.name, opts.translate_names),
            promotion: info.promotion,
            url: url.to_string(),
            kind,
        },
        workers,
        segments,
        dropped: extraction.dropped + rejected,
    })
}

/// Collapse runs of whitespace (including `&nbsp;`) and trim.
pub fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WorkerId;
    use chrono::NaiveDate;

    const PROGRESS_URL: &str = "https://www.cagematch.net/?id=1&nr=226713";

    fn opts(translate_names: bool) -> ParseOptions {
        ParseOptions {
            base_url: Url::parse("https://www.cagematch.net/").unwrap(),
            translate_names,
        }
    }

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    #[test]
    fn progress_fixture() {
        let parsed =
            parse_show_page(&fixture("progress_chapter_95"), PROGRESS_URL, ShowKind::Normal, &opts(true))
                .unwrap();
        let show = &parsed.show;
        assert_eq!(show.show_id, "226713");
        assert_eq!(show.name, "PROGRESS Chapter 95: Still Chasing");
        assert_eq!(show.arena, "Electric Ballroom");
        assert_eq!(show.date, NaiveDate::from_ymd_opt(2019, 9, 29).unwrap());
        assert_eq!(show.promotion.id, 1167);
        assert_eq!(show.promotion.name, "PROGRESS Wrestling");
        assert_eq!(parsed.segments.len(), 3);

        let ids: Vec<String> = parsed.workers.iter().map(|w| w.id.to_string()).collect();
        assert_eq!(
            ids,
            vec![
                "16108",
                "El Motho",
                "4171",
                "Chuck Mambo",
                "11881",
                "Jack Sexsmith",
                "13311"
            ]
        );
        // tag team link + ring announcer
        assert_eq!(parsed.dropped, 2);
    }

    #[test]
    fn names_translated_unless_disabled() {
        let html = fixture("njpw_g1_day12");
        let url = "https://www.cagematch.net/?id=1&nr=233402";
        let on = parse_show_page(&html, url, ShowKind::Normal, &opts(true)).unwrap();
        let off = parse_show_page(&html, url, ShowKind::Normal, &opts(false)).unwrap();
        assert_eq!(on.show.name, "NJPW G1 Climax 2019 - Day 12");
        assert_eq!(off.show.name, "NJPW G1 Climax 2019 - Tag 12");
        assert!(on.workers.iter().all(|w| matches!(w.id, WorkerId::Site(_))));
        assert_eq!(on.workers.len(), 4);
    }

    #[test]
    fn missing_promotion_link_still_parses() {
        let parsed = parse_show_page(
            &fixture("no_promotion"),
            "https://www.cagematch.net/?id=1&nr=300001",
            ShowKind::Normal,
            &opts(true),
        )
        .unwrap();
        assert!(parsed.show.promotion.is_unknown());
        assert_eq!(parsed.show.promotion.name, "");
    }

    #[test]
    fn url_without_show_number() {
        let err = parse_show_page(
            &fixture("progress_chapter_95"),
            "https://www.cagematch.net/?id=1",
            ShowKind::Normal,
            &opts(true),
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::MissingShowId(_)));
    }

    #[test]
    fn whitespace_collapsed() {
        assert_eq!(normalize_ws("  Korakuen\n\t Hall \u{a0}"), "Korakuen Hall");
    }
}

use std::sync::LazyLock;

use scraper::{Html, Selector};
use url::Url;

use super::links::{decode_anchor, LinkKind};
use super::normalize_ws;

static RESULTS_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.MatchResults").unwrap());
static ANCHOR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// One match result line from the card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSegment {
    /// 1-based position on the card.
    pub number: usize,
    pub text: String,
    pub wrestler_ids: Vec<u64>,
}

impl MatchSegment {
    pub fn mentions_id(&self, nr: u64) -> bool {
        self.wrestler_ids.contains(&nr)
    }
}

pub fn parse_segments(doc: &Html, base: &Url) -> Vec<MatchSegment> {
    doc.select(&RESULTS_SEL)
        .enumerate()
        .map(|(i, el)| {
            let wrestler_ids = el
                .select(&ANCHOR_SEL)
                .filter_map(|a| decode_anchor(base, a))
                .filter(|link| link.kind == LinkKind::Wrestler)
                .filter_map(|link| link.nr)
                .collect();
            MatchSegment {
                number: i + 1,
                text: normalize_ws(&el.text().collect::<String>()),
                wrestler_ids,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_in_document_order() {
        let doc = Html::parse_document(
            r#"<div class="Matches">
                <div class="Match"><div class="MatchType">Singles</div>
                  <div class="MatchResults"><a href="?id=2&amp;nr=1">A</a> defeats <a href="?id=2&amp;nr=2">B</a></div></div>
                <div class="Match"><div class="MatchResults">C (w/<a href="?id=2&amp;nr=3">D</a>) defeats
                  <a href="?id=28&amp;nr=40">Team</a></div></div>
            </div>"#,
        );
        let base = Url::parse("https://www.cagematch.net/").unwrap();
        let segs = parse_segments(&doc, &base);
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].number, 1);
        assert_eq!(segs[0].text, "A defeats B");
        assert_eq!(segs[0].wrestler_ids, vec![1, 2]);
        assert_eq!(segs[1].text, "C (w/D) defeats Team");
        assert!(segs[1].mentions_id(3));
        assert!(!segs[1].mentions_id(40));
    }
}

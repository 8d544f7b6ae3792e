use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use super::links::{decode_anchor, LinkKind};
use super::normalize_ws;

static ALL_WORKERS_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.Comments.Font9").unwrap());
static ANCHOR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// A participant mention from the "All workers" list, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    Linked { nr: u64, name: String },
    Plain(String),
}

#[derive(Debug, Default)]
pub struct Extraction {
    pub candidates: Vec<Candidate>,
    /// Fragments that yielded no candidate (non-wrestler links, empty text).
    pub dropped: usize,
}

/// Split the "All workers" block on commas and classify each fragment.
///
/// Commas nested inside team groupings split those groupings too; the
/// resulting partial fragments go through the same rules as any other.
pub fn extract_candidates(doc: &Html, base: &Url) -> Extraction {
    let Some(block) = doc.select(&ALL_WORKERS_SEL).next() else {
        debug!("no participant block on page");
        return Extraction::default();
    };

    let raw = block.inner_html();
    let mut out = Extraction::default();

    for fragment in raw.split(',') {
        let frag = Html::parse_fragment(fragment);
        let links: Vec<_> = frag
            .select(&ANCHOR_SEL)
            .filter_map(|a| decode_anchor(base, a))
            .collect();

        if links.is_empty() {
            let text = normalize_ws(&frag.root_element().text().collect::<String>());
            if text.is_empty() {
                out.dropped += 1;
            } else {
                out.candidates.push(Candidate::Plain(text));
            }
            continue;
        }

        let before = out.candidates.len();
        for link in links {
            match (link.kind, link.nr) {
                (LinkKind::Wrestler, Some(nr)) => out.candidates.push(Candidate::Linked {
                    nr,
                    name: link.text,
                }),
                (kind, _) => debug!("skipping {:?} link {:?}", kind, link.text),
            }
        }
        if out.candidates.len() == before {
            out.dropped += 1;
        }
    }

    out
}

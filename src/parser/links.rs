use scraper::ElementRef;
use url::Url;

/// Entity type encoded in a profile link's `id` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Wrestler,
    Promotion,
    TagTeam,
    Stable,
    Unknown,
}

impl LinkKind {
    pub fn from_code(code: u32) -> Self {
        match code {
            2 => LinkKind::Wrestler,
            8 => LinkKind::Promotion,
            28 => LinkKind::TagTeam,
            29 => LinkKind::Stable,
            _ => LinkKind::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileLink {
    pub kind: LinkKind,
    pub nr: Option<u64>,
    pub text: String,
}

/// Read a single query parameter from an absolute or site-relative URL.
pub fn query_param(base: &Url, href: &str, key: &str) -> Option<String> {
    let url = base.join(href).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Decode `?id=<kind>&nr=<number>` from an href.
pub fn decode_href(base: &Url, href: &str) -> (LinkKind, Option<u64>) {
    let kind = query_param(base, href, "id")
        .and_then(|v| v.trim().parse::<u32>().ok())
        .map(LinkKind::from_code)
        .unwrap_or(LinkKind::Unknown);
    let nr = query_param(base, href, "nr").and_then(|v| v.trim().parse::<u64>().ok());
    (kind, nr)
}

/// Decode an `<a href>` element; `None` when it carries no href.
pub fn decode_anchor(base: &Url, anchor: ElementRef) -> Option<ProfileLink> {
    let href = anchor.value().attr("href")?;
    let (kind, nr) = decode_href(base, href);
    Some(ProfileLink {
        kind,
        nr,
        text: super::normalize_ws(&anchor.text().collect::<String>()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn base() -> Url {
        Url::parse("https://www.cagematch.net/").unwrap()
    }

    #[test]
    fn codes() {
        assert_eq!(LinkKind::from_code(2), LinkKind::Wrestler);
        assert_eq!(LinkKind::from_code(8), LinkKind::Promotion);
        assert_eq!(LinkKind::from_code(28), LinkKind::TagTeam);
        assert_eq!(LinkKind::from_code(29), LinkKind::Stable);
        assert_eq!(LinkKind::from_code(1), LinkKind::Unknown);
    }

    #[test]
    fn relative_href() {
        let (kind, nr) = decode_href(&base(), "?id=2&nr=9434&name=Kazuchika+Okada");
        assert_eq!(kind, LinkKind::Wrestler);
        assert_eq!(nr, Some(9434));
    }

    #[test]
    fn absolute_href() {
        let (kind, nr) = decode_href(&base(), "https://www.cagematch.net/?id=8&nr=7");
        assert_eq!(kind, LinkKind::Promotion);
        assert_eq!(nr, Some(7));
    }

    #[test]
    fn garbage_is_unknown() {
        let (kind, nr) = decode_href(&base(), "?id=abc");
        assert_eq!(kind, LinkKind::Unknown);
        assert_eq!(nr, None);
        assert_eq!(decode_href(&base(), "/wiki/Foo").0, LinkKind::Unknown);
    }

    #[test]
    fn anchor_text_collapsed() {
        let doc = Html::parse_fragment(r#"<a href="?id=2&amp;nr=1">  Will
            Ospreay </a>"#);
        let sel = Selector::parse("a").unwrap();
        let link = decode_anchor(&base(), doc.select(&sel).next().unwrap()).unwrap();
        assert_eq!(link.text, "Will Ospreay");
        assert_eq!(link.nr, Some(1));
    }
}

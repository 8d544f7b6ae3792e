use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

pub const DEFAULT_DB_PATH: &str = "data/shows.sqlite";
pub const DEFAULT_BASE_URL: &str = "https://www.cagematch.net/";
const DEFAULT_USER_AGENT: &str = concat!("show_scraper/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub db_path: PathBuf,
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Settings {
    /// Defaults, overridden by `SHOWS_*` environment variables.
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("db_path", DEFAULT_DB_PATH)?
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("user_agent", DEFAULT_USER_AGENT)?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS as i64)?
            .add_source(config::Environment::with_prefix("SHOWS").try_parsing(true))
            .build()
            .context("Failed to build settings")?;
        settings
            .try_deserialize()
            .context("Invalid SHOWS_* settings")
    }
}

/// One entry of the show list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowDescriptor {
    Single(String),
    /// Several pages recorded at one sitting, stored as one show.
    Merge(Vec<String>),
    Partial {
        url: String,
        exclude: BTreeSet<usize>,
        exclude_from_count: bool,
    },
}

impl ShowDescriptor {
    pub fn urls(&self) -> Vec<&str> {
        match self {
            ShowDescriptor::Single(url) => vec![url.as_str()],
            ShowDescriptor::Merge(urls) => urls.iter().map(String::as_str).collect(),
            ShowDescriptor::Partial { url, .. } => vec![url.as_str()],
        }
    }

    pub fn label(&self) -> String {
        match self {
            ShowDescriptor::Single(url) => url.clone(),
            ShowDescriptor::Merge(urls) => format!("merge of {} ({})", urls.len(), urls.join(", ")),
            ShowDescriptor::Partial { url, exclude, .. } => {
                let nums: Vec<String> = exclude.iter().map(|n| n.to_string()).collect();
                format!("{} (excluding matches {})", url, nums.join(", "))
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDescriptor {
    Url(String),
    Directive(RawDirective),
}

#[derive(Deserialize)]
struct RawDirective {
    merge: Option<Vec<String>>,
    taping: Option<Vec<String>>,
    squash: Option<Vec<String>>,
    partial: Option<RawPartial>,
}

#[derive(Deserialize)]
struct RawPartial {
    url: String,
    #[serde(default)]
    exclude: Vec<usize>,
    #[serde(default)]
    exclude_from_count: bool,
}

fn decode(index: usize, raw: RawDescriptor) -> Result<ShowDescriptor> {
    let directive = match raw {
        RawDescriptor::Url(url) => return Ok(ShowDescriptor::Single(url)),
        RawDescriptor::Directive(d) => d,
    };

    if let Some(urls) = directive.merge.or(directive.taping).or(directive.squash) {
        if urls.is_empty() {
            bail!("entry {}: merge list is empty", index);
        }
        return Ok(ShowDescriptor::Merge(urls));
    }

    if let Some(p) = directive.partial {
        if p.exclude.contains(&0) {
            bail!("entry {}: match numbers start at 1", index);
        }
        return Ok(ShowDescriptor::Partial {
            url: p.url,
            exclude: p.exclude.into_iter().collect(),
            exclude_from_count: p.exclude_from_count,
        });
    }

    bail!("entry {}: expected a url or one of merge/taping/squash/partial", index)
}

pub fn parse_descriptors(yaml: &str) -> Result<Vec<ShowDescriptor>> {
    let raw: Vec<RawDescriptor> =
        serde_yaml::from_str(yaml).context("Show list is not a YAML sequence of entries")?;
    raw.into_iter()
        .enumerate()
        .map(|(i, r)| decode(i, r))
        .collect()
}

pub fn load_descriptors(path: &Path) -> Result<Vec<ShowDescriptor>> {
    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {:?}", path))?;
    parse_descriptors(&yaml).with_context(|| format!("Failed to load {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn all_entry_forms() {
        let yaml = r#"
- https://www.cagematch.net/?id=1&nr=226713
- taping:
    - https://www.cagematch.net/?id=1&nr=100001
    - https://www.cagematch.net/?id=1&nr=100002
- squash:
    - https://www.cagematch.net/?id=1&nr=5
- partial:
    url: https://www.cagematch.net/?id=1&nr=7
    exclude: [2, 4]
- partial:
    url: https://www.cagematch.net/?id=1&nr=8
    exclude: [1]
    exclude_from_count: true
"#;
        let d = parse_descriptors(yaml).unwrap();
        assert_eq!(d.len(), 5);
        assert_eq!(d[0], ShowDescriptor::Single("https://www.cagematch.net/?id=1&nr=226713".into()));
        assert!(matches!(&d[1], ShowDescriptor::Merge(urls) if urls.len() == 2));
        assert!(matches!(&d[2], ShowDescriptor::Merge(urls) if urls.len() == 1));
        assert_eq!(
            d[3],
            ShowDescriptor::Partial {
                url: "https://www.cagematch.net/?id=1&nr=7".into(),
                exclude: BTreeSet::from([2, 4]),
                exclude_from_count: false,
            }
        );
        assert!(matches!(&d[4], ShowDescriptor::Partial { exclude_from_count: true, .. }));
    }

    #[test]
    fn merge_wins_over_partial() {
        let yaml = r#"
- merge: [a, b]
  partial:
    url: c
    exclude: [1]
"#;
        let d = parse_descriptors(yaml).unwrap();
        assert_eq!(d[0], ShowDescriptor::Merge(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn unknown_key_rejected() {
        let err = parse_descriptors("- foo: [a]\n").unwrap_err();
        assert!(err.to_string().contains("entry 0"), "{}", err);
    }

    #[test]
    fn zero_match_number_rejected() {
        let yaml = "- partial:\n    url: a\n    exclude: [0]\n";
        assert!(parse_descriptors(yaml).is_err());
    }

    #[test]
    fn empty_merge_rejected() {
        assert!(parse_descriptors("- taping: []\n").is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "- https://www.cagematch.net/?id=1&nr=1").unwrap();
        let d = load_descriptors(file.path()).unwrap();
        assert_eq!(d.len(), 1);
        assert!(load_descriptors(Path::new("does/not/exist.yaml")).is_err());
    }

    #[test]
    fn labels() {
        let p = ShowDescriptor::Partial {
            url: "u".into(),
            exclude: BTreeSet::from([3, 1]),
            exclude_from_count: false,
        };
        assert_eq!(p.label(), "u (excluding matches 1, 3)");
        assert_eq!(ShowDescriptor::Merge(vec!["a".into(), "b".into()]).urls(), vec!["a", "b"]);
    }
}

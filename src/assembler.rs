use std::collections::HashSet;

use rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::config::ShowDescriptor;
use crate::db::{self, SaveCounts};
use crate::error::{FetchError, PipelineError};
use crate::fetch::Fetcher;
use crate::model::{Show, ShowKind, Worker};
use crate::parser::{parse_show_page, ParseOptions, ParsedShow};
use crate::profile::{Phase, Profile};
use crate::resolve::filter_excluded;

/// One logical show ready to persist.
#[derive(Debug, Clone)]
pub struct AssembledShow {
    pub show: Show,
    pub workers: Vec<Worker>,
    pub dropped: usize,
}

fn kind_of(descriptor: &ShowDescriptor) -> ShowKind {
    match descriptor {
        ShowDescriptor::Partial {
            exclude_from_count: true,
            ..
        } => ShowKind::PartialExcluded,
        ShowDescriptor::Partial { .. } => ShowKind::Partial,
        _ => ShowKind::Normal,
    }
}

/// Fetch and parse every page of a descriptor and combine them.
///
/// Any page that cannot be fetched or parsed aborts the whole descriptor.
pub fn assemble(
    fetcher: &dyn Fetcher,
    descriptor: &ShowDescriptor,
    opts: &ParseOptions,
    profile: &mut Profile,
) -> Result<AssembledShow, PipelineError> {
    let kind = kind_of(descriptor);
    let mut parts = Vec::new();

    for url in descriptor.urls() {
        let html = profile
            .time(Phase::Fetch, || fetcher.fetch(url))
            .ok_or_else(|| FetchError::Unavailable(url.to_string()))?;

        let mut parsed = profile
            .time(Phase::Parse, || parse_show_page(&html, url, kind, opts))
            .map_err(|source| PipelineError::Parse {
                url: url.to_string(),
                source,
            })?;

        if let ShowDescriptor::Partial { exclude, .. } = descriptor {
            let before = parsed.workers.len();
            parsed.workers = filter_excluded(parsed.workers, &parsed.segments, exclude);
            debug!(
                "{}: {} workers left after excluding matches",
                parsed.show.show_id,
                parsed.workers.len()
            );
            parsed.dropped += before - parsed.workers.len();
        }
        parts.push(parsed);
    }

    let assembled = match descriptor {
        ShowDescriptor::Merge(_) => merge_parts(parts),
        _ => parts.into_iter().next().map(|p| AssembledShow {
            show: p.show,
            workers: p.workers,
            dropped: p.dropped,
        }),
    };
    assembled.ok_or(PipelineError::EmptyDescriptor)
}

/// Combine the pages of a taping into one show.
///
/// Id is `m` + the page ids, name is the page names joined by `/` with a
/// ` Taping` suffix; arena, date and promotion come from the first page.
pub fn merge_parts(parts: Vec<ParsedShow>) -> Option<AssembledShow> {
    let first = parts.first()?.show.clone();

    let ids: Vec<&str> = parts.iter().map(|p| p.show.show_id.as_str()).collect();
    let names: Vec<&str> = parts.iter().map(|p| p.show.name.as_str()).collect();
    let urls: Vec<&str> = parts.iter().map(|p| p.show.url.as_str()).collect();

    let show = Show {
        show_id: format!("m{}", ids.join(",")),
        name: format!("{} Taping", names.join("/")),
        url: urls.join(","),
        kind: ShowKind::Normal,
        ..first
    };

    let mut seen = HashSet::new();
    let mut workers = Vec::new();
    let mut dropped = 0;
    for part in parts {
        dropped += part.dropped;
        for w in part.workers {
            if seen.insert(w.id.clone()) {
                workers.push(w);
            }
        }
    }

    Some(AssembledShow {
        show,
        workers,
        dropped,
    })
}

/// Assemble one descriptor and persist it.
pub fn process(
    conn: &Connection,
    fetcher: &dyn Fetcher,
    descriptor: &ShowDescriptor,
    opts: &ParseOptions,
    profile: &mut Profile,
) -> Result<SaveCounts, PipelineError> {
    let assembled = assemble(fetcher, descriptor, opts, profile)?;
    let counts = profile.time(Phase::Persist, || {
        db::save_show(conn, &assembled.show, &assembled.workers)
    })?;

    if assembled.show.promotion.is_unknown() {
        warn!(show_id = %assembled.show.show_id, "stored with placeholder promotion");
    }
    info!(
        show_id = %assembled.show.show_id,
        workers = assembled.workers.len(),
        dropped = assembled.dropped,
        new_appearances = counts.appearances,
        "{} ({})",
        assembled.show.name,
        assembled.show.date
    );
    Ok(counts)
}

use std::collections::{BTreeSet, HashSet};

use regex::Regex;
use tracing::debug;

use crate::model::{Worker, WorkerId};
use crate::parser::results::MatchSegment;
use crate::parser::workers::Candidate;

/// Whole-word occurrence of `name` in `text`, followed by end of text, a
/// closing paren, ` (c)`, ` (w/`, or a space and anything but `(`.
///
/// A name followed by some other parenthetical (`El Motho (Martina)`) is a
/// team or entourage label, not the worker.
pub fn name_in_result(name: &str, text: &str) -> bool {
    let name = name.trim();
    if name.is_empty() {
        return false;
    }
    let pattern = format!(
        r"(?:^|\W){}(?: \(c\)| \(w/| [^(]|\)|$)",
        regex::escape(name)
    );
    Regex::new(&pattern)
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

/// Accept a plain-text mention only if some match result names it.
pub fn validate_worker(name: &str, segments: &[MatchSegment]) -> bool {
    segments.iter().any(|s| name_in_result(name, &s.text))
}

/// Turn extracted candidates into workers, dropping unvalidated plain names
/// and repeated mentions.
pub fn resolve_candidates(candidates: Vec<Candidate>, segments: &[MatchSegment]) -> (Vec<Worker>, usize) {
    let mut seen: HashSet<WorkerId> = HashSet::new();
    let mut workers = Vec::new();
    let mut rejected = 0;

    for candidate in candidates {
        let worker = match candidate {
            Candidate::Linked { nr, name } => Worker::linked(nr, &name),
            Candidate::Plain(name) => {
                if !validate_worker(&name, segments) {
                    debug!("rejected plain-text mention {:?}", name);
                    rejected += 1;
                    continue;
                }
                Worker::plain(&name)
            }
        };
        if seen.insert(worker.id.clone()) {
            workers.push(worker);
        }
    }

    (workers, rejected)
}

fn mentions(segment: &MatchSegment, worker: &Worker) -> bool {
    match &worker.id {
        WorkerId::Site(nr) => segment.mentions_id(*nr),
        WorkerId::Name(name) => segment.text.contains(name.as_str()),
    }
}

/// Drop workers who only appear in excluded matches.
///
/// `excluded` holds 1-based match numbers. A worker in both an excluded and
/// a counted match stays; a worker mentioned in no match at all stays.
pub fn filter_excluded(
    workers: Vec<Worker>,
    segments: &[MatchSegment],
    excluded: &BTreeSet<usize>,
) -> Vec<Worker> {
    let (out, kept): (Vec<&MatchSegment>, Vec<&MatchSegment>) =
        segments.iter().partition(|s| excluded.contains(&s.number));

    workers
        .into_iter()
        .filter(|w| {
            let in_excluded = out.iter().any(|s| mentions(s, w));
            let in_counted = kept.iter().any(|s| mentions(s, w));
            if in_excluded && !in_counted {
                debug!("excluding {} ({}): only in excluded matches", w.name, w.id);
                false
            } else {
                true
            }
        })
        .collect()
}

use std::fmt;

use chrono::NaiveDate;

/// Promotion id used when a show page carries no promotion link.
pub const UNKNOWN_PROMOTION_ID: i64 = -1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Promotion {
    pub id: i64,
    pub name: String,
}

impl Promotion {
    pub fn unknown() -> Self {
        Promotion {
            id: UNKNOWN_PROMOTION_ID,
            name: String::new(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.id == UNKNOWN_PROMOTION_ID
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowKind {
    Normal,
    Partial,
    PartialExcluded,
}

impl ShowKind {
    /// Value stored in `shows.is_partial`.
    pub fn code(self) -> i64 {
        match self {
            ShowKind::Normal => 0,
            ShowKind::Partial => 1,
            ShowKind::PartialExcluded => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Show {
    pub show_id: String,
    pub arena: String,
    pub date: NaiveDate,
    pub name: String,
    pub promotion: Promotion,
    pub url: String,
    pub kind: ShowKind,
}

impl Show {
    pub fn appearance(&self, worker: &Worker) -> Appearance {
        Appearance {
            worker_id: worker.id.to_string(),
            show_id: self.show_id.clone(),
        }
    }
}

/// Site-assigned profile number, or the stripped name when the mention was
/// plain text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WorkerId {
    Site(u64),
    Name(String),
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerId::Site(nr) => write!(f, "{}", nr),
            WorkerId::Name(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worker {
    pub id: WorkerId,
    pub name: String,
}

impl Worker {
    pub fn linked(nr: u64, name: &str) -> Self {
        Worker {
            id: WorkerId::Site(nr),
            name: name.to_string(),
        }
    }

    pub fn plain(name: &str) -> Self {
        let name = name.trim();
        Worker {
            id: WorkerId::Name(name.to_string()),
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Appearance {
    pub worker_id: String,
    pub show_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_id_renders_as_stored_key() {
        assert_eq!(WorkerId::Site(9434).to_string(), "9434");
        assert_eq!(Worker::plain("  El Motho ").id.to_string(), "El Motho");
    }

    #[test]
    fn kind_codes() {
        assert_eq!(ShowKind::Normal.code(), 0);
        assert_eq!(ShowKind::Partial.code(), 1);
        assert_eq!(ShowKind::PartialExcluded.code(), 2);
    }
}

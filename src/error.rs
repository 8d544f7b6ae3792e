use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("information box has {titles} titles but {values} values")]
    InfoBoxMismatch { titles: usize, values: usize },
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("no show number in url: {0}")]
    MissingShowId(String),
    #[error("no promotion link found")]
    AmbiguousPromotion,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("document unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("failed to parse {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: ParseError,
    },
    #[error("descriptor has no pages")]
    EmptyDescriptor,
    #[error("storage: {0}")]
    Storage(#[from] rusqlite::Error),
}

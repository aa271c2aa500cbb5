use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("invalid decimal hours: {value:?}")]
    InvalidHours { value: String },
    #[error("issue {issue} has no group key")]
    MissingGroupKey { issue: String },
    #[error("time totals for group {group:?} exceed the representable range")]
    Overflow { group: String },
    #[error("tracker returned HTTP {status} for {url}")]
    Http { status: u16, url: String },
    #[error("tracker request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed tracker response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid tracker url: {0}")]
    Url(#[from] url::ParseError),
    #[error("page surface rejected write: {0}")]
    Page(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;

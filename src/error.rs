use thiserror::Error;

pub type Result<T> = std::result::Result<T, RankError>;

#[derive(Error, Debug)]
pub enum RankError {
    #[error("External tool error: {0}")]
    ExternalTool(String),
    #[error("Malformed log line {line_no}: {line:?}")]
    MalformedLogLine { line_no: usize, line: String },
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
    #[error("Reference find error: {0}")]
    RefFind(#[from] Box<gix::reference::find::existing::Error>),
    #[error("Object find error: {0}")]
    ObjectFind(#[from] Box<gix::object::find::existing::Error>),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
}

impl RankError {
    pub fn malformed(line_no: usize, line: &str) -> Self {
        RankError::MalformedLogLine {
            line_no,
            line: line.to_string(),
        }
    }
}

// Manual From implementations for unboxed to boxed conversions
impl From<gix::discover::Error> for RankError {
    fn from(err: gix::discover::Error) -> Self {
        RankError::GitDiscover(Box::new(err))
    }
}

impl From<gix::reference::find::existing::Error> for RankError {
    fn from(err: gix::reference::find::existing::Error) -> Self {
        RankError::RefFind(Box::new(err))
    }
}

impl From<gix::object::find::existing::Error> for RankError {
    fn from(err: gix::object::find::existing::Error) -> Self {
        RankError::ObjectFind(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for RankError {
    fn from(err: gix::object::commit::Error) -> Self {
        RankError::Commit(Box::new(err))
    }
}

/// Category of a state-store failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller supplied an empty key.
    EmptyKey,
    /// Caller supplied an empty primary argument (text, array or path).
    EmptyPayload,
    /// Text is not valid serialized-document syntax.
    ParseFailure,
    /// Nothing has been written for this engine instance yet.
    StoreUnavailable,
    /// A file could not be opened, read or written.
    FileUnavailable,
    /// A number without a textual encoding (NaN or infinite).
    InvalidNumber,
}

impl ErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::EmptyKey => "empty key",
            ErrorKind::EmptyPayload => "empty payload",
            ErrorKind::ParseFailure => "parse failure",
            ErrorKind::StoreUnavailable => "store unavailable",
            ErrorKind::FileUnavailable => "file unavailable",
            ErrorKind::InvalidNumber => "invalid number",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateError {
    pub kind: ErrorKind,
    pub detail: String,
}

impl StateError {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn empty_key() -> Self {
        Self::new(ErrorKind::EmptyKey, "key is empty")
    }

    pub fn empty_payload(what: &str) -> Self {
        Self::new(ErrorKind::EmptyPayload, format!("{} is empty", what))
    }

    pub fn parse(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::ParseFailure, detail)
    }

    pub fn file(path: &std::path::Path, err: &std::io::Error) -> Self {
        Self::new(
            ErrorKind::FileUnavailable,
            format!("{}: {}", path.display(), err),
        )
    }
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.detail.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.detail)
        }
    }
}

impl std::error::Error for StateError {}

impl From<serde_json::Error> for StateError {
    fn from(e: serde_json::Error) -> Self {
        Self::parse(e.to_string())
    }
}

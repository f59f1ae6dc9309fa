// Crate-wide error model shared by the codec, the HTTP client, and the CLI.
use serde_json::Value;
use std::error::Error as StdError;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Internal,
    Usage,
    Parse,
    ShapeMismatch,
    UnexpectedSentinelValue,
    Auth,
    Api,
    Io,
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    hint: Option<String>,
    path: Option<String>,
    index: Option<usize>,
    value: Option<Value>,
    code: Option<i64>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            hint: None,
            path: None,
            index: None,
            value: None,
            code: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Field path of the offending JSON value, e.g. `cameras[0].stream1.fps`.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Element index inside a sentinel-coded list, when the failure is element-level.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Raw JSON value observed where a sentinel or record was expected.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Vendor error code from a `success: false` response envelope.
    pub fn code(&self) -> Option<i64> {
        self.code
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_code(mut self, code: i64) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {path})")?;
        }
        if let Some(index) = self.index {
            write!(f, " (index: {index})")?;
        }
        if let Some(value) = &self.value {
            write!(f, " (value: {value})")?;
        }
        if let Some(code) = self.code {
            write!(f, " (code: {code})")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Internal => 1,
        ErrorKind::Usage => 2,
        ErrorKind::Parse => 3,
        ErrorKind::ShapeMismatch => 4,
        ErrorKind::UnexpectedSentinelValue => 5,
        ErrorKind::Auth => 6,
        ErrorKind::Api => 7,
        ErrorKind::Io => 8,
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind, to_exit_code};
    use serde_json::json;

    #[test]
    fn exit_code_mapping_is_stable() {
        let cases = [
            (ErrorKind::Internal, 1),
            (ErrorKind::Usage, 2),
            (ErrorKind::Parse, 3),
            (ErrorKind::ShapeMismatch, 4),
            (ErrorKind::UnexpectedSentinelValue, 5),
            (ErrorKind::Auth, 6),
            (ErrorKind::Api, 7),
            (ErrorKind::Io, 8),
        ];

        for (kind, code) in cases {
            assert_eq!(to_exit_code(kind), code);
        }
    }

    #[test]
    fn display_includes_path_and_observed_value() {
        let err = Error::new(ErrorKind::UnexpectedSentinelValue)
            .with_message("unrecognized sentinel")
            .with_path("cameras")
            .with_value(json!("unexpected"));
        let text = err.to_string();
        assert!(text.starts_with("UnexpectedSentinelValue: unrecognized sentinel"));
        assert!(text.contains("(path: cameras)"));
        assert!(text.contains("(value: \"unexpected\")"));
    }
}

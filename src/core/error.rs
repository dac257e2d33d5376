use std::error::Error as StdError;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Malformed JSON at the token level.
    InvalidEncoding,
    /// A value cannot be coerced to the target kind under the current configuration.
    TypeMismatch,
    /// The coercion would be legal but the relevant config section is disabled.
    PolicyForbidden,
    /// Multiple input keys satisfied the same target field.
    Ambiguous,
    /// Configuration bytes are malformed.
    ConfigParse,
    Internal,
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    field: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            field: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
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
        if let Some(field) = &self.field {
            write!(f, " (field: {field})")?;
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

/// Maps a serde_json decode failure back onto the public taxonomy.
///
/// Coercion code emits stable phrases ("not allowed" for policy gates,
/// "ambiguous key" for matcher collisions), which is the only channel a
/// custom serde error leaves open for kind information.
pub(crate) fn classify_decode(err: serde_json::Error) -> Error {
    use serde_json::error::Category;

    let kind = match err.classify() {
        Category::Syntax | Category::Eof | Category::Io => ErrorKind::InvalidEncoding,
        Category::Data => {
            let text = err.to_string();
            if text.contains("not allowed") {
                ErrorKind::PolicyForbidden
            } else if text.contains("ambiguous key") {
                ErrorKind::Ambiguous
            } else {
                ErrorKind::TypeMismatch
            }
        }
    };

    let message = err.to_string();
    Error::new(kind).with_message(message).with_source(err)
}

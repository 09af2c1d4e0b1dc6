use std::error::Error;
use std::fmt;

pub type Cause = Box<dyn Error + Send + Sync + 'static>;

/// An error that carries enough context to be reported to a user.
///
/// Besides the message it may hold free-form additional details, a stack
/// description captured where the error was raised, and the errors that
/// caused it. The first cause is exposed through [`Error::source`].
#[derive(Debug)]
pub struct ImperativeError {
    msg: String,
    additional_details: Option<String>,
    stack: Option<String>,
    causes: Vec<Cause>,
}

impl ImperativeError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            additional_details: None,
            stack: None,
            causes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.additional_details = Some(details.into());
        self
    }

    #[must_use]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<Cause>) -> Self {
        self.causes.push(cause.into());
        self
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.msg
    }

    #[must_use]
    pub fn additional_details(&self) -> Option<&str> {
        self.additional_details.as_deref()
    }

    #[must_use]
    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }

    #[must_use]
    pub fn causes(&self) -> &[Cause] {
        &self.causes
    }
}

impl fmt::Display for ImperativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.msg)
    }
}

impl Error for ImperativeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.causes
            .first()
            .map(|cause| cause.as_ref() as &(dyn Error + 'static))
    }
}

pub type Result<T> = std::result::Result<T, ImperativeError>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("markup parse error at byte {offset}: {message}")]
    Markup { message: String, offset: usize },

    #[error("invalid selector `{selector}`: {message}")]
    Selector { selector: String, message: String },
}

impl DomError {
    pub(crate) fn markup(message: impl Into<String>, offset: usize) -> Self {
        DomError::Markup {
            message: message.into(),
            offset,
        }
    }

    pub(crate) fn selector(selector: impl Into<String>, message: impl Into<String>) -> Self {
        DomError::Selector {
            selector: selector.into(),
            message: message.into(),
        }
    }
}

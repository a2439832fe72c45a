use thiserror::Error;

use trellis_dom::DomError;
use trellis_template::TemplateError;

#[derive(Debug, Error)]
pub enum ViewError {
    /// The view was disposed; every later operation on it is a
    /// use-after-dispose bug and fails loudly.
    #[error("view is disposed; `{op}` is not allowed")]
    Disposed { op: &'static str },

    /// The template or its data could not produce markup. Propagated
    /// unmodified — masking a broken template would hide an authoring error.
    #[error("template resolution failed: {0}")]
    Template(#[from] TemplateError),

    /// Malformed markup or selector syntax from a view definition.
    #[error(transparent)]
    Dom(#[from] DomError),
}

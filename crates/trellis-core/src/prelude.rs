//! One-stop import for view definitions.

pub use crate::attach::Target;
pub use crate::config::ViewConfig;
pub use crate::error::ViewError;
pub use crate::view::{Lifecycle, View};

pub use trellis_dom::{Document, Element, Event, Selection};
pub use trellis_template::{compile, Template};

//! # trellis-core
//!
//! A small view layer over [`trellis_dom`]: a [`View`] owns one root element,
//! renders lazily-resolved template markup into it, caches named element
//! references, and composes children through an attachment protocol with a
//! strict ordering guarantee.
//!
//! There are three mechanisms, and they are deliberately coupled:
//!
//! - **Lazy rendering** — template source and data are producer functions,
//!   re-invoked on every [`View::render`], so output follows view state
//!   without an invalidation signal.
//! - **Element cache** — declared `name → selector` pairs are re-resolved
//!   against the root subtree after every markup swap; handles never go
//!   stale silently.
//! - **Attachment protocol** — [`View::append_to`], [`View::prepend_to`] and
//!   [`View::replace`] insert the root element *before* rendering and
//!   re-establish event delegation in between. Rendering first and attaching
//!   second is the classic mistake this layer exists to prevent: it produces
//!   views that misread layout or keep dead handlers after an ancestor
//!   re-render.
//!
//! ```rust
//! use trellis_core::prelude::*;
//! use serde_json::json;
//!
//! let doc = Document::new();
//! let view = View::new(
//!     &doc,
//!     ViewConfig::new()
//!         .class("greeting")
//!         .template(|| compile("<p class=\"msg\">Hello {{name}}</p>").unwrap())
//!         .template_data(|| json!({ "name": "Matt" }))
//!         .element_ref("$msg", ".msg"),
//! )
//! .unwrap();
//!
//! view.append_to(&doc.body()).unwrap();
//! assert_eq!(view.element("$msg").text(), "Hello Matt");
//! ```
//!
//! Views are handles (`Rc` inner): clone freely, dispose once. Disposal is
//! terminal — any later render, attach or refresh fails with
//! [`ViewError::Disposed`] so use-after-dispose shows up in development
//! instead of no-op-ing silently.

pub mod attach;
pub mod config;
pub mod elements;
pub mod error;
pub mod events;
pub mod prelude;
pub mod render;
pub mod view;

pub use attach::Target;
pub use config::{
    DataProducer, RenderHook, RenderStrategy, TemplateProducer, ViewConfig, ViewEventHandler,
};
pub use error::ViewError;
pub use view::{Lifecycle, View};

pub use trellis_dom::{Document, DomError, Element, Event, ListenerId, Selection};
pub use trellis_template::{compile, Template, TemplateError};

//! # trellis-dom
//!
//! An in-memory HTML document for the trellis view layer. No browser, no
//! virtual DOM — one arena-backed tree per [`Document`], with the handful of
//! primitives a view layer needs:
//!
//! - [`Element`] / [`Selection`] — cheap `(document, id)` handles.
//! - Selector-scoped lookup ([`Element::query`]) with a small CSS subset.
//! - Whole-subtree content replacement ([`Element::set_inner_html`]) that
//!   severs event bindings on everything it detaches, and positional
//!   insertion (`append` / `prepend` / `replace_with`).
//! - A listener registry with synthetic dispatch and upward propagation
//!   ([`Element::on`], [`Element::on_delegated`], [`Element::dispatch`]).
//!
//! ```rust
//! use trellis_dom::Document;
//!
//! let doc = Document::new();
//! doc.body().set_inner_html("<p class=\"msg\">Hello</p>").unwrap();
//! assert_eq!(doc.query(".msg").unwrap().text(), "Hello");
//! ```
//!
//! Everything is single-threaded and synchronous; handles are `!Send` and an
//! operation either completes or fails before returning.

pub mod document;
pub mod element;
pub mod error;
pub mod event;
mod markup;
pub mod node;
mod selector;
mod tests;

pub use document::Document;
pub use element::{Element, Selection};
pub use error::DomError;
pub use event::{Event, EventHandler, ListenerId};
pub use node::{NodeData, NodeId};

use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use trellis_dom::Event;
use trellis_template::Template;

use crate::error::ViewError;
use crate::view::View;

/// Produces the compiled template for a render. Re-invoked on every cycle so
/// the markup source can depend on view state at the moment of rendering.
pub type TemplateProducer = Rc<dyn Fn() -> Template>;

/// Produces the template data for a render. Re-invoked on every cycle.
pub type DataProducer = Rc<dyn Fn() -> Value>;

/// Side-effecting lifecycle hook; the return value is ignored.
pub type RenderHook = Rc<dyn Fn(&View)>;

/// Replacement for the default markup step of the render pipeline. Runs
/// between the hooks; a strategy that wants fresh element references calls
/// [`View::update_elements`] itself.
pub type RenderStrategy = Rc<dyn Fn(&View) -> Result<(), ViewError>>;

/// Handler for a declarative event binding.
pub type ViewEventHandler = Rc<dyn Fn(&View, &Event)>;

#[derive(Clone)]
pub(crate) struct EventSpec {
    pub kind: String,
    pub selector: Option<String>,
    pub handler: ViewEventHandler,
}

/// Per-view-type definition: the root element description, the producer
/// functions and hooks, the static name→selector element declarations, and
/// the declarative event bindings. Instances share nothing at runtime — the
/// config only seeds each [`View`].
#[derive(Clone, Default)]
pub struct ViewConfig {
    pub(crate) tag: Option<String>,
    pub(crate) attrs: Vec<(String, String)>,
    pub(crate) template: Option<TemplateProducer>,
    pub(crate) template_data: Option<DataProducer>,
    pub(crate) before_render: Option<RenderHook>,
    pub(crate) after_render: Option<RenderHook>,
    pub(crate) render_with: Option<RenderStrategy>,
    pub(crate) elements: Vec<(String, String)>,
    pub(crate) events: Vec<EventSpec>,
}

impl ViewConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root element tag; `div` when not set.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    pub fn id(self, value: impl Into<String>) -> Self {
        self.attr("id", value)
    }

    pub fn template(mut self, producer: impl Fn() -> Template + 'static) -> Self {
        self.template = Some(Rc::new(producer));
        self
    }

    pub fn template_data(mut self, producer: impl Fn() -> Value + 'static) -> Self {
        self.template_data = Some(Rc::new(producer));
        self
    }

    pub fn before_render(mut self, hook: impl Fn(&View) + 'static) -> Self {
        self.before_render = Some(Rc::new(hook));
        self
    }

    pub fn after_render(mut self, hook: impl Fn(&View) + 'static) -> Self {
        self.after_render = Some(Rc::new(hook));
        self
    }

    /// Replaces the markup step of the pipeline with arbitrary DOM
    /// construction. The before/after hooks still run around it.
    pub fn render_with(
        mut self,
        strategy: impl Fn(&View) -> Result<(), ViewError> + 'static,
    ) -> Self {
        self.render_with = Some(Rc::new(strategy));
        self
    }

    /// Declares a named element reference, resolved against the root subtree
    /// on every render. A leading `$` in the name is a naming convention the
    /// cache does not interpret.
    pub fn element_ref(mut self, name: impl Into<String>, selector: impl Into<String>) -> Self {
        self.elements.push((name.into(), selector.into()));
        self
    }

    /// Binds an event on the root element.
    pub fn on(mut self, kind: impl Into<String>, handler: impl Fn(&View, &Event) + 'static) -> Self {
        self.events.push(EventSpec {
            kind: kind.into(),
            selector: None,
            handler: Rc::new(handler),
        });
        self
    }

    /// Binds a delegated event: the handler fires when `kind` is dispatched
    /// on a descendant of the root matching `selector`. Delegation is bound
    /// on the root, so a view's own re-render does not sever it.
    pub fn on_delegated(
        mut self,
        kind: impl Into<String>,
        selector: impl Into<String>,
        handler: impl Fn(&View, &Event) + 'static,
    ) -> Self {
        self.events.push(EventSpec {
            kind: kind.into(),
            selector: Some(selector.into()),
            handler: Rc::new(handler),
        });
        self
    }
}

impl fmt::Debug for ViewConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewConfig")
            .field("tag", &self.tag)
            .field("attrs", &self.attrs)
            .field("template", &self.template.as_ref().map(|_| "..."))
            .field("template_data", &self.template_data.as_ref().map(|_| "..."))
            .field("before_render", &self.before_render.as_ref().map(|_| "..."))
            .field("after_render", &self.after_render.as_ref().map(|_| "..."))
            .field("render_with", &self.render_with.as_ref().map(|_| "..."))
            .field("elements", &self.elements)
            .field("events", &self.events.len())
            .finish()
    }
}

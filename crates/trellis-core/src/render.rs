//! The render pipeline: pre-render hook, markup step, element-cache rebuild,
//! post-render hook. The pipeline wrapper is the only public entry point —
//! a view that replaces the markup step still goes through the hooks.

use serde_json::Value;

use crate::error::ViewError;
use crate::view::{Lifecycle, View};

impl View {
    /// Runs one render cycle and returns the view for chaining.
    ///
    /// The default markup step resolves the template and data producers
    /// fresh, swaps the result into the root element and rebuilds the
    /// element cache. A config with no template producer leaves the root
    /// contents untouched. A config with a custom strategy
    /// ([`ViewConfig::render_with`](crate::ViewConfig::render_with)) runs
    /// that instead; the strategy opts into cache refresh by calling
    /// [`View::update_elements`] itself.
    pub fn render(&self) -> Result<&Self, ViewError> {
        self.ensure_live("render")?;
        if let Some(hook) = &self.inner.config.before_render {
            hook(self);
        }
        match &self.inner.config.render_with {
            Some(strategy) => strategy(self)?,
            None => {
                if let Some(markup) = self.resolve_markup()? {
                    self.inner.el.set_inner_html(&markup)?;
                }
                self.update_elements()?;
            }
        }
        if let Some(hook) = &self.inner.config.after_render {
            hook(self);
        }
        self.inner.state.set(Lifecycle::Rendered);
        log::debug!("rendered {:?}", self.inner.el);
        Ok(self)
    }

    /// Resolves template and data producers into markup. Nothing is cached
    /// across cycles — both producers run again on every call, which is what
    /// lets output vary with view state at the moment of rendering.
    fn resolve_markup(&self) -> Result<Option<String>, ViewError> {
        let Some(producer) = &self.inner.config.template else {
            return Ok(None);
        };
        let template = producer();
        let data = match &self.inner.config.template_data {
            Some(producer) => producer(),
            None => Value::Null,
        };
        Ok(Some(template.render(&data)?))
    }
}

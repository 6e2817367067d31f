//! The pipeline context threaded through every walk.

use crate::config::FormConfig;
use crate::escape::{Escaper, HtmlEscaper};
use crate::hooks::Hooks;
use crate::search::{NoRecords, RecordSource};
use crate::widgets::{NoWidgets, Widgets};

/// Renders and processes schemas.
///
/// Holds configuration, collaborators and hooks only; every call owns its
/// values and input trees, so one engine can serve concurrent requests.
pub struct FormEngine {
    config: FormConfig,
    escaper: Box<dyn Escaper>,
    widgets: Box<dyn Widgets>,
    records: Box<dyn RecordSource>,
    hooks: Hooks,
}

impl std::fmt::Debug for FormEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormEngine")
            .field("config", &self.config)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

impl Default for FormEngine {
    fn default() -> Self {
        Self {
            config: FormConfig::default(),
            escaper: Box::new(HtmlEscaper),
            widgets: Box::new(NoWidgets),
            records: Box::new(NoRecords),
            hooks: Hooks::default(),
        }
    }
}

impl FormEngine {
    /// Creates an engine with the default configuration and collaborators.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: FormConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the escaper.
    #[must_use]
    pub fn with_escaper(mut self, escaper: impl Escaper + 'static) -> Self {
        self.escaper = Box::new(escaper);
        self
    }

    /// Sets the widget collaborator.
    #[must_use]
    pub fn with_widgets(mut self, widgets: impl Widgets + 'static) -> Self {
        self.widgets = Box::new(widgets);
        self
    }

    /// Sets the record store.
    #[must_use]
    pub fn with_records(mut self, records: impl RecordSource + 'static) -> Self {
        self.records = Box::new(records);
        self
    }

    /// Sets the hooks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub(crate) fn escaper(&self) -> &dyn Escaper {
        self.escaper.as_ref()
    }

    pub(crate) fn widgets(&self) -> &dyn Widgets {
        self.widgets.as_ref()
    }

    pub(crate) fn records(&self) -> &dyn RecordSource {
        self.records.as_ref()
    }

    pub(crate) fn hooks(&self) -> &Hooks {
        &self.hooks
    }
}

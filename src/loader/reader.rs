//! The loader: fragment resolution, configuration, re-parse and placeholders.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::configurator::{self, ConfigureContext, Outcome};
use super::{LoadError, LoadReport, LoaderConfig};
use crate::document::{Document, ElementId, DISPLAY_TAG, WIDGET_TAG};
use crate::version::{Version, BASE_WIDGET_VERSION};
use crate::widget::{Widget, WidgetDescriptor, WidgetId, WidgetRegistry, WidgetTree};
use crate::widgets::{display, placeholder};

// ---------------------------------------------------------------------------
// LoadState
// ---------------------------------------------------------------------------

/// Life cycle of one widget load.
///
/// ```text
/// Resolving -> Configuring -> Accepted
///                  |  ^  \
///                  v  |   -> RewriteRequested -> Resolving
///               Refused -> Failed
/// ```
/// `Failed` is also entered straight from `Resolving` when no type claims
/// the fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Resolving,
    Configuring,
    RewriteRequested,
    Accepted,
    Refused,
    Failed,
}

impl LoadState {
    /// Whether `next` may follow `self`.
    pub fn can_advance_to(self, next: LoadState) -> bool {
        use LoadState::*;
        matches!(
            (self, next),
            (Resolving, Configuring)
                | (Resolving, Failed)
                | (Configuring, Accepted)
                | (Configuring, Refused)
                | (Configuring, RewriteRequested)
                | (Refused, Configuring)
                | (Refused, Failed)
                | (RewriteRequested, Resolving)
        )
    }

    /// Whether loading this fragment is over.
    pub fn is_terminal(self) -> bool {
        matches!(self, LoadState::Accepted | LoadState::Failed)
    }
}

/// Tracks the state of one fragment load and logs transitions.
struct Attempt {
    type_id: String,
    state: LoadState,
}

impl Attempt {
    fn new(type_id: &str) -> Self {
        Self {
            type_id: type_id.to_string(),
            state: LoadState::Resolving,
        }
    }

    fn advance(&mut self, next: LoadState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "invalid load transition {:?} -> {:?}",
            self.state,
            next
        );
        tracing::trace!(type_id = %self.type_id, from = ?self.state, to = ?next, "load state");
        self.state = next;
    }
}

/// What configuring one fragment produced.
enum Resolution {
    Accepted(Widget),
    Reparse {
        replacement: ElementId,
        reason: &'static str,
    },
    Unclaimed,
}

// ---------------------------------------------------------------------------
// DisplayModel
// ---------------------------------------------------------------------------

/// A loaded display.
#[derive(Debug)]
pub struct DisplayModel {
    pub tree: WidgetTree,
    /// The display widget.
    pub root: WidgetId,
    pub report: LoadReport,
    /// Version recorded in the file.
    pub source_version: Version,
}

impl DisplayModel {
    /// Parse and load display XML with the built-in widget types.
    pub fn from_xml(text: &str) -> Result<Self, LoadError> {
        Self::from_xml_with(text, LoaderConfig::default())
    }

    /// Parse and load display XML with the given configuration.
    pub fn from_xml_with(text: &str, config: LoaderConfig) -> Result<Self, LoadError> {
        let document = Document::parse(text)?;
        Loader::with_config(document, WidgetRegistry::shared(), config).load_display()
    }
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Builds widgets from a document.
pub struct Loader {
    document: Document,
    tree: WidgetTree,
    registry: Arc<WidgetRegistry>,
    config: LoaderConfig,
    report: LoadReport,
}

impl Loader {
    /// Loader over `document` with the built-in widget types and defaults.
    pub fn new(document: Document) -> Self {
        Self::with_config(document, WidgetRegistry::shared(), LoaderConfig::default())
    }

    /// Loader with an explicit registry and configuration.
    pub fn with_config(
        document: Document,
        registry: Arc<WidgetRegistry>,
        config: LoaderConfig,
    ) -> Self {
        let tree = WidgetTree::with_preference_macros(config.preference_macros.clone());
        Self {
            document,
            tree,
            registry,
            config,
            report: LoadReport::default(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Give up the loader, returning the (possibly rewritten) document,
    /// the widgets built so far and the report.
    pub fn into_parts(self) -> (Document, WidgetTree, LoadReport) {
        (self.document, self.tree, self.report)
    }

    /// Load the whole document as a display.
    pub fn load_display(mut self) -> Result<DisplayModel, LoadError> {
        let root = self
            .document
            .root()
            .ok_or(crate::document::DocumentError::MissingRoot)?;
        let tag = self.document.tag(root).to_string();
        if tag != DISPLAY_TAG {
            return Err(LoadError::NotADisplay(tag));
        }
        let source_version = self.fragment_version(root, DISPLAY_TAG)?;

        let descriptor = self
            .registry
            .get(display::TYPE_ID)
            .ok_or_else(|| LoadError::UnknownType(display::TYPE_ID.to_string()))?;

        let mut attempt = Attempt::new(descriptor.type_id);
        let id = match self.configure(&mut attempt, &[descriptor], root, source_version)? {
            Resolution::Accepted(widget) => self.accept(widget, root)?,
            _ => return Err(LoadError::UnknownType(display::TYPE_ID.to_string())),
        };
        self.tree.set_root(id);

        info!(
            version = %source_version,
            widgets = self.tree.len(),
            errors = self.report.errors,
            rewrites = self.report.rewrites,
            "display loaded"
        );
        Ok(DisplayModel {
            tree: self.tree,
            root: id,
            report: self.report,
            source_version,
        })
    }

    /// Load one widget fragment and its children. The widget is added to
    /// the tree without a parent.
    ///
    /// Rewrite requests are followed up to the configured limit. Fragments
    /// no registered type accepts become placeholders.
    pub fn load_widget(&mut self, element: ElementId) -> Result<WidgetId, LoadError> {
        let mut element = element;
        let mut rewrites = 0;

        loop {
            let type_id = self.fragment_type(element)?;
            let version = self.fragment_version(element, &type_id)?;
            let candidates = self.registry.resolve(&type_id);
            let mut attempt = Attempt::new(&type_id);

            match self.configure(&mut attempt, &candidates, element, version)? {
                Resolution::Accepted(widget) => return self.accept(widget, element),
                Resolution::Reparse {
                    replacement,
                    reason,
                } => {
                    rewrites += 1;
                    if rewrites > self.config.max_reparse {
                        return Err(LoadError::TooManyReparse {
                            type_id,
                            limit: self.config.max_reparse,
                        });
                    }
                    self.report.rewrites += 1;
                    debug!(type_id = %type_id, reason, "reading rewritten fragment");
                    attempt.advance(LoadState::Resolving);
                    element = replacement;
                }
                Resolution::Unclaimed => {
                    if !self.report.unknown_types.contains(&type_id) {
                        warn!(type_id = %type_id, "unknown widget type");
                        self.report.unknown_types.push(type_id.clone());
                    }
                    return self.placeholder(element, &type_id, version);
                }
            }
        }
    }

    /// Load every `<widget>` child of `parent`, in order.
    ///
    /// Widgets that fail with a widget-local error become placeholders when
    /// the configuration allows it.
    pub fn read_widgets(&mut self, parent: ElementId) -> Result<Vec<WidgetId>, LoadError> {
        let elements = self.document.child_elements(parent, WIDGET_TAG);
        let mut ids = Vec::with_capacity(elements.len());

        for element in elements {
            match self.load_widget(element) {
                Ok(id) => ids.push(id),
                Err(error) if error.is_widget_local() && self.config.placeholder_on_error => {
                    self.report.errors += 1;
                    let type_id = self
                        .fragment_type(element)
                        .unwrap_or_else(|_| "unknown".to_string());
                    error!(type_id = %type_id, %error, "widget failed to load, using placeholder");
                    let version = self
                        .fragment_version(element, &type_id)
                        .unwrap_or(BASE_WIDGET_VERSION);
                    ids.push(self.placeholder(element, &type_id, version)?);
                }
                Err(error) => return Err(error),
            }
        }
        Ok(ids)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Try each candidate in order until one accepts or asks for a re-parse.
    fn configure(
        &mut self,
        attempt: &mut Attempt,
        candidates: &[&'static WidgetDescriptor],
        element: ElementId,
        version: Version,
    ) -> Result<Resolution, LoadError> {
        let mut first_error = None;

        for &descriptor in candidates {
            attempt.advance(LoadState::Configuring);
            let mut widget = descriptor.create_widget();
            let outcome = {
                let mut ctx = ConfigureContext {
                    loader: &mut *self,
                    widget: &mut widget,
                    element,
                    version,
                };
                configurator::run(descriptor.configurator, &mut ctx)
            };

            match outcome {
                Ok(Outcome::Accepted) => {
                    attempt.advance(LoadState::Accepted);
                    return Ok(Resolution::Accepted(widget));
                }
                Ok(Outcome::Refused) => {
                    debug!(candidate = descriptor.type_id, "refused fragment");
                    attempt.advance(LoadState::Refused);
                    self.discard(widget);
                }
                Ok(Outcome::Reparse {
                    replacement,
                    reason,
                }) => {
                    attempt.advance(LoadState::RewriteRequested);
                    self.discard(widget);
                    return Ok(Resolution::Reparse {
                        replacement,
                        reason,
                    });
                }
                Err(error) if error.is_widget_local() => {
                    debug!(candidate = descriptor.type_id, %error, "candidate failed");
                    attempt.advance(LoadState::Refused);
                    self.discard(widget);
                    first_error.get_or_insert(error);
                }
                Err(error) => {
                    self.discard(widget);
                    return Err(error);
                }
            }
        }

        attempt.advance(LoadState::Failed);
        match first_error {
            Some(error) => Err(error),
            None => Ok(Resolution::Unclaimed),
        }
    }

    /// Add an accepted widget to the tree and load its top-level children.
    fn accept(&mut self, widget: Widget, element: ElementId) -> Result<WidgetId, LoadError> {
        let container = widget.is_container();
        let id = self.tree.insert(widget);
        if container {
            for child in self.read_widgets(element)? {
                self.tree.add_child(id, child)?;
            }
        }
        Ok(id)
    }

    /// Drop a widget that was not accepted, with any children it loaded.
    fn discard(&mut self, widget: Widget) {
        for child in widget.child_ids() {
            self.tree.remove(child);
        }
    }

    /// Build a placeholder that keeps the fragment's type id and version.
    fn placeholder(
        &mut self,
        element: ElementId,
        type_id: &str,
        version: Version,
    ) -> Result<WidgetId, LoadError> {
        let mut widget = placeholder::DESCRIPTOR
            .create_widget()
            .with_identity(type_id, version);
        {
            let mut ctx = ConfigureContext {
                loader: &mut *self,
                widget: &mut widget,
                element,
                version,
            };
            configurator::run(placeholder::DESCRIPTOR.configurator, &mut ctx)?;
        }
        Ok(self.tree.insert(widget))
    }

    fn fragment_type(&self, element: ElementId) -> Result<String, LoadError> {
        self.document
            .attribute(element, "type")
            .or_else(|| self.document.attribute(element, "typeId"))
            .map(str::to_string)
            .ok_or(LoadError::MissingType)
    }

    fn fragment_version(&self, element: ElementId, type_id: &str) -> Result<Version, LoadError> {
        match self.document.attribute(element, "version") {
            Some(text) => Version::parse(text).map_err(|source| LoadError::Version {
                type_id: type_id.to_string(),
                source,
            }),
            None => Ok(BASE_WIDGET_VERSION),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions() {
        use LoadState::*;
        assert!(Resolving.can_advance_to(Configuring));
        assert!(Configuring.can_advance_to(RewriteRequested));
        assert!(RewriteRequested.can_advance_to(Resolving));
        assert!(Refused.can_advance_to(Configuring));
        assert!(!Accepted.can_advance_to(Configuring));
        assert!(!Failed.can_advance_to(Resolving));
        assert!(!Resolving.can_advance_to(Accepted));
        assert!(Accepted.is_terminal() && Failed.is_terminal());
        assert!(!Refused.is_terminal());
    }

    fn load(xml: &str) -> (Loader, WidgetId) {
        let document = Document::parse(xml).unwrap();
        let root = document.root().unwrap();
        let mut loader = Loader::new(document);
        let id = loader.load_widget(root).unwrap();
        (loader, id)
    }

    #[test]
    fn missing_version_means_base_version() {
        let (loader, id) = load(r#"<widget type="label"><text>hi</text></widget>"#);
        let widget = loader.tree().get(id).unwrap();
        assert_eq!(widget.type_id(), "label");
        assert_eq!(widget.version(), crate::widgets::label::DESCRIPTOR.version);
    }

    #[test]
    fn unknown_type_becomes_placeholder_once_reported() {
        let xml = r#"<display><widget type="no.such" version="1.2.0"><name>a</name></widget><widget type="no.such"/></display>"#;
        let model = DisplayModel::from_xml(xml).unwrap();
        let children = model.tree.children(model.root);
        assert_eq!(children.len(), 2);
        let first = model.tree.get(children[0]).unwrap();
        assert_eq!(first.type_id(), "no.such");
        assert_eq!(first.version(), Version::new(1, 2, 0));
        assert_eq!(first.name(), "a");
        assert_eq!(model.report.unknown_types, vec!["no.such".to_string()]);
        assert!(!model.report.is_clean());
    }

    #[test]
    fn missing_type_is_reported() {
        let document = Document::parse("<widget/>").unwrap();
        let root = document.root().unwrap();
        let mut loader = Loader::new(document);
        assert!(matches!(loader.load_widget(root), Err(LoadError::MissingType)));
    }

    #[test]
    fn bad_number_fails_widget_only() {
        let xml = r#"<display><widget type="label"><x>left</x></widget><widget type="label"><name>ok</name></widget></display>"#;
        let model = DisplayModel::from_xml(xml).unwrap();
        let children = model.tree.children(model.root);
        assert_eq!(children.len(), 2);
        assert_eq!(
            model.tree.get(children[0]).unwrap().descriptor().type_id,
            placeholder::TYPE_ID
        );
        assert_eq!(model.tree.get(children[1]).unwrap().name(), "ok");
        assert_eq!(model.report.errors, 1);
    }

    #[test]
    fn bad_number_without_placeholders_fails() {
        let xml = r#"<display><widget type="label"><x>left</x></widget></display>"#;
        let config = LoaderConfig::new().with_placeholder_on_error(false);
        assert!(matches!(
            DisplayModel::from_xml_with(xml, config),
            Err(LoadError::Property { .. })
        ));
    }

    #[test]
    fn root_must_be_display() {
        assert!(matches!(
            DisplayModel::from_xml("<widget type=\"label\"/>"),
            Err(LoadError::NotADisplay(tag)) if tag == "widget"
        ));
    }
}

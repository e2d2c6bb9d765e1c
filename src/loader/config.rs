//! Loader and writer configuration.

use crate::macros::Macros;

// ---------------------------------------------------------------------------
// LoaderConfig
// ---------------------------------------------------------------------------

/// Configuration for loading displays.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// How often one fragment may be rewritten and read again.
    pub max_reparse: usize,
    /// Outermost macro scope of every loaded display.
    pub preference_macros: Macros,
    /// Replace widgets that fail to load with placeholders instead of
    /// failing the whole display.
    pub placeholder_on_error: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_reparse: 10,
            preference_macros: Macros::new(),
            placeholder_on_error: true,
        }
    }
}

impl LoaderConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rewrite limit (builder).
    pub fn with_max_reparse(mut self, limit: usize) -> Self {
        self.max_reparse = limit;
        self
    }

    /// Set the preference macros (builder).
    pub fn with_preference_macros(mut self, macros: Macros) -> Self {
        self.preference_macros = macros;
        self
    }

    /// Choose whether failed widgets become placeholders (builder).
    pub fn with_placeholder_on_error(mut self, enabled: bool) -> Self {
        self.placeholder_on_error = enabled;
        self
    }
}

// ---------------------------------------------------------------------------
// WriterConfig
// ---------------------------------------------------------------------------

/// Configuration for writing displays.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Spaces per nesting level, or `None` for single-line output.
    pub indent: Option<usize>,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self { indent: Some(2) }
    }
}

impl WriterConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-line output.
    pub fn compact() -> Self {
        Self { indent: None }
    }

    /// Set the indentation width (builder).
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = Some(indent);
        self
    }
}

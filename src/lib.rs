//! # display-model
//!
//! A typed widget model for operator displays, and the engine that loads
//! displays saved by older tools into it.
//!
//! A display is a tree of widgets. Every widget type declares its properties
//! through a descriptor; persisted fragments are read by running the type's
//! configurator chain, which translates legacy layouts step by step, may
//! refuse a fragment so another type can claim it, or may rewrite the
//! fragment and ask for it to be read again.
//!
//! ## Core Systems
//!
//! - **[`document`]**: Slotmap-backed XML element tree, read and written with quick-xml
//! - **[`version`]**: Persisted format versions
//! - **[`property`]**: Typed property tree with lock-free value publication
//! - **[`macros`]**: `$(NAME)` expansion and macro scopes
//! - **[`widget`]**: Descriptors, widget instances, the registry and the widget tree
//! - **[`widgets`]**: Built-in widget types and their legacy translations
//! - **[`loader`]**: Fragment resolution, configurator chains, re-parse, writer
//! - **[`testing`]**: Fragment builder and snapshot helpers
//!
//! ## Example
//!
//! ```
//! use display_model::loader::{write_display, DisplayModel, WriterConfig};
//!
//! let model = DisplayModel::from_xml(
//!     r#"<display version="1.0.0">
//!          <widget typeId="org.csstudio.opibuilder.widgets.LED" version="1.0.0">
//!            <name>Interlock</name>
//!            <bit>2</bit>
//!          </widget>
//!        </display>"#,
//! )?;
//! let led = model.tree.find_by_name(model.root, "Interlock").unwrap();
//! assert_eq!(model.tree.get(led).unwrap().type_id(), "led");
//!
//! let text = write_display(&model.tree, model.root, &WriterConfig::compact())?;
//! assert!(text.contains(r#"<widget type="led" version="2.0.0">"#));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Foundation
pub mod document;
pub mod version;

// Property model
pub mod macros;
pub mod property;

// Widget system
pub mod widget;
pub mod widgets;

// Loading and writing
pub mod loader;

pub mod testing;

pub use loader::{DisplayModel, LoadError, LoadReport, Loader, LoaderConfig, WriterConfig};
pub use macros::Macros;
pub use property::{Color, Property, PropertyDescriptor, PropertyError};
pub use version::{Version, BASE_WIDGET_VERSION};
pub use widget::{Widget, WidgetDescriptor, WidgetId, WidgetRegistry, WidgetTree};

//! Widget model: descriptors, instances, the registry and the widget tree.

pub mod alias;
pub mod descriptor;
pub mod instance;
pub mod registry;
pub mod tree;

pub use alias::PropertyAlias;
pub use descriptor::{
    inherit_macros, own_macros, MacroScope, PropertyContributor, WidgetCategory, WidgetDescriptor,
};
pub use instance::{Widget, CHILDREN};
pub use registry::{RegistryError, WidgetRegistry};
pub use tree::{TreeError, WidgetId, WidgetTree};

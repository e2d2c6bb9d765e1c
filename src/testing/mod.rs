//! Test helpers: fragment builder, snapshot renderings.
//!
//! Use [`Fragment`] to build persisted widget XML without string templates,
//! and [`outline`] or [`changed_values`] to capture loaded models as plain
//! text for snapshot assertions.

pub mod fragment;
pub mod snapshot;

pub use fragment::Fragment;
pub use snapshot::{changed_values, outline};

use crate::loader::{LoadError, Loader};
use crate::widget::WidgetId;

/// Load a single widget fragment with the built-in registry.
pub fn load_fragment(fragment: Fragment) -> Result<(Loader, WidgetId), LoadError> {
    let (document, root) = fragment.into_document();
    let mut loader = Loader::new(document);
    let id = loader.load_widget(root)?;
    Ok((loader, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::common::BIT;
    use crate::widgets::led;

    #[test]
    fn load_led_fragment() {
        let (loader, id) =
            load_fragment(Fragment::widget("led").version("1.0").property("bit", "2")).unwrap();
        let widget = loader.tree().get(id).unwrap();
        assert_eq!(widget.type_id(), led::TYPE_ID);
        assert_eq!(widget.get(&BIT).unwrap(), 2);
    }
}

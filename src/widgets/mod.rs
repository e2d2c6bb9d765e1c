//! Built-in widget types.
//!
//! Each module defines one type: its `TYPE_ID`, the legacy ids it loads,
//! property descriptors, configurator steps and a static `DESCRIPTOR`.

pub mod common;

pub mod action_button;
pub mod bool_button;
pub mod combo;
pub mod display;
pub mod embedded;
pub mod group;
pub mod label;
pub mod led;
pub mod multi_state_led;
pub mod navtabs;
pub mod placeholder;
pub mod tabs;
pub mod text_entry;
pub mod text_update;

use crate::widget::WidgetDescriptor;

/// Every registrable built-in type, in registration order.
///
/// Where several types claim the same legacy id, the earlier one is tried
/// first: action buttons before combos, LEDs before multi-state LEDs.
pub fn builtin() -> Vec<&'static WidgetDescriptor> {
    vec![
        &display::DESCRIPTOR,
        &group::DESCRIPTOR,
        &label::DESCRIPTOR,
        &text_update::DESCRIPTOR,
        &text_entry::DESCRIPTOR,
        &action_button::DESCRIPTOR,
        &combo::DESCRIPTOR,
        &led::DESCRIPTOR,
        &multi_state_led::DESCRIPTOR,
        &bool_button::DESCRIPTOR,
        &embedded::DESCRIPTOR,
        &tabs::DESCRIPTOR,
        &navtabs::DESCRIPTOR,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn type_ids_are_unique() {
        let ids: HashSet<&str> = builtin().iter().map(|d| d.type_id).collect();
        assert_eq!(ids.len(), builtin().len());
        assert!(!ids.contains(placeholder::TYPE_ID));
    }

    #[test]
    fn every_type_builds_its_properties() {
        for descriptor in builtin() {
            let widget = descriptor.create_widget();
            assert_eq!(widget.type_id(), descriptor.type_id);
            assert_eq!(
                widget.get(&crate::property::common::WIDTH).unwrap(),
                descriptor.default_size.0
            );
        }
    }
}

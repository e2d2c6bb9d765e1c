//! Boolean button: toggles or pushes one bit of a PV.

use crate::loader::{import_properties, ConfigureContext, LoadError, Step};
use crate::property::common::{
    self, BACKGROUND_COLOR, BIT, CONFIRM_MESSAGE, ENABLED, FOREGROUND_COLOR, LABELS_FROM_PV,
    PASSWORD,
};
use crate::property::{Category, Color, Property, PropertyDescriptor};
use crate::property_enum;
use crate::version::BASE_WIDGET_VERSION;
use crate::widget::{inherit_macros, WidgetCategory, WidgetDescriptor};

use super::common::{legacy_actions, legacy_pv, legacy_rules, pv, visible};
use super::led::{OFF_COLOR, OFF_LABEL, ON_COLOR, ON_LABEL};

pub const TYPE_ID: &str = "bool_button";

pub const LEGACY_BOOL_BUTTON: &str = "org.csstudio.opibuilder.widgets.BoolButton";
pub const LEGACY_IMAGE_BOOL_BUTTON: &str = "org.csstudio.opibuilder.widgets.ImageBoolButton";

property_enum! {
    /// How presses change the bit.
    pub enum Mode {
        Toggle,
        Push,
        PushInverted,
    }
}

pub const MODE: PropertyDescriptor<Mode> = PropertyDescriptor::new(Category::Behavior, "mode");
pub const SHOW_LED: PropertyDescriptor<bool> =
    PropertyDescriptor::new(Category::Display, "show_led");
pub const OFF_IMAGE: PropertyDescriptor<String> =
    PropertyDescriptor::new(Category::Display, "off_image");
pub const ON_IMAGE: PropertyDescriptor<String> =
    PropertyDescriptor::new(Category::Display, "on_image");

fn properties(properties: &mut Vec<Property>) {
    properties.push(BIT.create(0));
    properties.push(OFF_LABEL.create("Off".to_string()));
    properties.push(OFF_COLOR.create(Color::rgb(60, 100, 60)));
    properties.push(OFF_IMAGE.create(String::new()));
    properties.push(ON_LABEL.create("On".to_string()));
    properties.push(ON_COLOR.create(Color::rgb(60, 255, 60)));
    properties.push(ON_IMAGE.create(String::new()));
    properties.push(SHOW_LED.create(true));
    properties.push(FOREGROUND_COLOR.create(common::text_color()));
    properties.push(BACKGROUND_COLOR.create(common::button_background_color()));
    properties.push(LABELS_FROM_PV.create(false));
    properties.push(ENABLED.create(true));
    properties.push(MODE.create(Mode::Toggle));
    properties.push(CONFIRM_MESSAGE.create(String::new()));
    properties.push(PASSWORD.create(String::new()));
}

/// Buttons before 2.0.0.
fn legacy(ctx: &mut ConfigureContext<'_>) -> Result<Step, LoadError> {
    if !ctx.older_than(2) {
        return Ok(Step::Continue);
    }
    if !ctx.child_bool("toggle_button").unwrap_or(true) {
        ctx.set(&MODE, Mode::Push)?;
    }
    if ctx.child_bool("show_boolean_label") == Some(false) {
        ctx.set(&OFF_LABEL, String::new())?;
        ctx.set(&ON_LABEL, String::new())?;
    }
    // Without the LED the whole button showed the background; the state
    // colors take that role now, darkened when on.
    if !ctx.get(&SHOW_LED)? {
        let background = ctx.get(&BACKGROUND_COLOR)?;
        ctx.set(&OFF_COLOR, background.clone())?;
        ctx.set(&ON_COLOR, background.scaled(80))?;
    }
    Ok(Step::Continue)
}

pub static DESCRIPTOR: WidgetDescriptor = WidgetDescriptor {
    type_id: TYPE_ID,
    legacy_ids: &[LEGACY_BOOL_BUTTON, LEGACY_IMAGE_BOOL_BUTTON],
    label: "Boolean Button",
    category: WidgetCategory::Control,
    version: BASE_WIDGET_VERSION,
    default_size: (100, 30),
    properties: &[visible, pv, properties],
    configurator: &[legacy_actions, legacy_rules, import_properties, legacy_pv, legacy],
    aliases: &[],
    macro_scope: inherit_macros,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::loader::Loader;

    #[test]
    fn legacy_push_button_without_led() {
        let document = Document::parse(
            r#"<widget typeId="org.csstudio.opibuilder.widgets.BoolButton" version="1.0.0">
                 <toggle_button>false</toggle_button>
                 <show_led>false</show_led>
                 <show_boolean_label>false</show_boolean_label>
                 <background_color><color red="100" green="200" blue="50"/></background_color>
               </widget>"#,
        )
        .unwrap();
        let root = document.root().unwrap();
        let mut loader = Loader::new(document);
        let id = loader.load_widget(root).unwrap();
        let widget = loader.tree().get(id).unwrap();
        assert_eq!(widget.type_id(), TYPE_ID);
        assert_eq!(widget.get(&MODE).unwrap(), Mode::Push);
        assert_eq!(widget.get(&OFF_LABEL).unwrap(), "");
        assert_eq!(widget.get(&OFF_COLOR).unwrap(), Color::rgb(100, 200, 50));
        assert_eq!(widget.get(&ON_COLOR).unwrap(), Color::rgb(80, 160, 40));
    }

    #[test]
    fn current_button_keeps_mode() {
        let document = Document::parse(
            r#"<widget type="bool_button" version="2.0.0"><toggle_button>false</toggle_button><mode>2</mode></widget>"#,
        )
        .unwrap();
        let root = document.root().unwrap();
        let mut loader = Loader::new(document);
        let id = loader.load_widget(root).unwrap();
        assert_eq!(
            loader.tree().get(id).unwrap().get(&MODE).unwrap(),
            Mode::PushInverted
        );
    }
}

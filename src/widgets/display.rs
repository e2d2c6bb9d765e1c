//! The display: root of every widget tree.

use crate::loader::{import_properties, ConfigureContext, LoadError, Step};
use crate::property::common::{self, BACKGROUND_COLOR};
use crate::property::{Category, Color, Property, PropertyDescriptor};
use crate::version::BASE_WIDGET_VERSION;
use crate::widget::{own_macros, WidgetCategory, WidgetDescriptor};

use super::common::{children, legacy_rules, macros};

pub const TYPE_ID: &str = "display";

/// Legacy root type id.
pub const LEGACY_DISPLAY: &str = "org.csstudio.opibuilder.Display";

pub const GRID_VISIBLE: PropertyDescriptor<bool> =
    PropertyDescriptor::new(Category::Misc, "grid_visible");
pub const GRID_COLOR: PropertyDescriptor<Color> =
    PropertyDescriptor::new(Category::Misc, "grid_color");
pub const GRID_STEP_X: PropertyDescriptor<i64> =
    PropertyDescriptor::new(Category::Misc, "grid_step_x");
pub const GRID_STEP_Y: PropertyDescriptor<i64> =
    PropertyDescriptor::new(Category::Misc, "grid_step_y");

fn properties(properties: &mut Vec<Property>) {
    properties.push(BACKGROUND_COLOR.create(common::background_color()));
    properties.push(GRID_VISIBLE.create(true));
    properties.push(GRID_COLOR.create(Color::rgb(128, 128, 128).named("Grid")));
    properties.push(GRID_STEP_X.create(10));
    properties.push(GRID_STEP_Y.create(10));
}

/// Legacy displays kept the grid space in a single `grid_space`.
fn legacy_grid(ctx: &mut ConfigureContext<'_>) -> Result<Step, LoadError> {
    if ctx.older_than(2) {
        if let Some(space) = ctx.child_int("grid_space")? {
            ctx.set(&GRID_STEP_X, space)?;
            ctx.set(&GRID_STEP_Y, space)?;
        }
        if let Some(show) = ctx.child_bool("show_grid") {
            ctx.set(&GRID_VISIBLE, show)?;
        }
    }
    Ok(Step::Continue)
}

pub static DESCRIPTOR: WidgetDescriptor = WidgetDescriptor {
    type_id: TYPE_ID,
    legacy_ids: &[LEGACY_DISPLAY],
    label: "Display",
    category: WidgetCategory::Structure,
    version: BASE_WIDGET_VERSION,
    default_size: (800, 600),
    properties: &[macros, properties, children],
    configurator: &[legacy_rules, import_properties, legacy_grid],
    aliases: &[],
    macro_scope: own_macros,
};

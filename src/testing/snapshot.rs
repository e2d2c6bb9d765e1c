//! Snapshot helpers.
//!
//! Plain-text renderings of loaded models, stable enough for snapshot
//! assertions.

use crate::widget::{Widget, WidgetId, WidgetTree};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// One line per widget, indented by depth: `type_id "name"`.
///
/// # Examples
///
/// ```
/// use display_model::loader::DisplayModel;
/// use display_model::testing::outline;
///
/// let model = DisplayModel::from_xml(
///     r#"<display><widget type="label"><name>Title</name></widget></display>"#,
/// ).unwrap();
/// assert_eq!(outline(&model.tree, model.root), "display \"\"\n  label \"Title\"");
/// ```
pub fn outline(tree: &WidgetTree, root: WidgetId) -> String {
    let mut lines = Vec::new();
    outline_into(tree, root, 0, &mut lines);
    lines.join("\n")
}

fn outline_into(tree: &WidgetTree, id: WidgetId, depth: usize, lines: &mut Vec<String>) {
    let Some(widget) = tree.get(id) else {
        return;
    };
    lines.push(format!(
        "{:indent$}{} {:?}",
        "",
        widget.type_id(),
        widget.name(),
        indent = depth * 2
    ));
    for child in tree.children(id) {
        outline_into(tree, child, depth + 1, lines);
    }
}

/// Every persisted value that differs from its default, as `path = value`
/// lines in property order.
pub fn changed_values(widget: &Widget) -> String {
    let defaults = widget.descriptor().create_widget().persisted_values();
    widget
        .persisted_values()
        .into_iter()
        .filter(|(path, value)| !defaults.iter().any(|(p, v)| p == path && v == value))
        .map(|(path, value)| format!("{path} = {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::DisplayModel;
    use pretty_assertions::assert_eq;

    #[test]
    fn outline_nests_children() {
        let model = DisplayModel::from_xml(
            r#"<display>
                 <widget type="group"><name>G</name>
                   <widget type="led"><name>L</name></widget>
                 </widget>
               </display>"#,
        )
        .unwrap();
        assert_eq!(
            outline(&model.tree, model.root),
            "display \"\"\n  group \"G\"\n    led \"L\""
        );
    }

    #[test]
    fn changed_values_skip_defaults() {
        let model = DisplayModel::from_xml(
            r#"<display><widget type="led"><name>L</name><bit>3</bit></widget></display>"#,
        )
        .unwrap();
        let id = model.tree.find_by_name(model.root, "L").unwrap();
        assert_eq!(changed_values(model.tree.get(id).unwrap()), "name = L\nbit = 3");
    }
}

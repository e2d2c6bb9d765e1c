//! Property sets and configurator steps shared by several widget types.

use tracing::debug;

use crate::document::ElementData;
use crate::loader::{ConfigureContext, LoadError, Step};
use crate::macros::Macros;
use crate::property::common::{
    self, FormatOption, BORDER_ALARM_SENSITIVE, BORDER_COLOR, BORDER_WIDTH, CONNECTED, FORMAT,
    MACROS, PRECISION, PV_NAME, TOOLTIP, VISIBLE,
};
use crate::property::{ChildrenProperty, Color, Property};
use crate::widget::CHILDREN;

/// Type id of legacy labels, target of text widget rewrites.
pub const LEGACY_LABEL: &str = "org.csstudio.opibuilder.widgets.Label";

/// Tooltip of widgets bound to a PV.
pub const PV_TOOLTIP: &str = "$(pv_name)\n$(pv_value)";

// ---------------------------------------------------------------------------
// Property contributors
// ---------------------------------------------------------------------------

pub fn visible(properties: &mut Vec<Property>) {
    properties.push(VISIBLE.create(true));
}

/// PV binding: name, alarm border, tooltip and the runtime connection flag.
pub fn pv(properties: &mut Vec<Property>) {
    properties.push(PV_NAME.create(String::new()));
    properties.push(BORDER_ALARM_SENSITIVE.create(true));
    properties.push(TOOLTIP.create(PV_TOOLTIP.to_string()));
    properties.push(CONNECTED.create_runtime(true));
}

pub fn border(properties: &mut Vec<Property>) {
    properties.push(BORDER_WIDTH.create(0));
    properties.push(BORDER_COLOR.create(Color::rgb(0, 128, 255)));
}

pub fn macros(properties: &mut Vec<Property>) {
    properties.push(MACROS.create(Macros::new()));
}

pub fn children(properties: &mut Vec<Property>) {
    properties.push(Property::Children(ChildrenProperty::new(CHILDREN)));
}

// ---------------------------------------------------------------------------
// Configurator steps
// ---------------------------------------------------------------------------

/// Bring legacy action entries to the current layout: upper case types
/// become lower case, `OPEN_PHOEBUS` becomes `open_display`, `<path>`
/// becomes `<file>`. Edits the fragment in place before it is imported.
pub fn legacy_actions(ctx: &mut ConfigureContext<'_>) -> Result<Step, LoadError> {
    let element = ctx.element;
    let Some(list) = ctx.document().child_element(element, common::ACTIONS) else {
        return Ok(Step::Continue);
    };
    let actions = ctx.document().child_elements(list, "action");
    let doc = ctx.document_mut();
    for action in actions {
        if let Some(kind) = doc.attribute(action, "type").map(str::to_string) {
            let current = match kind.as_str() {
                "OPEN_PHOEBUS" => common::OPEN_DISPLAY.to_string(),
                "EXECUTE_CMD" => "command".to_string(),
                _ => kind.to_ascii_lowercase(),
            };
            if current != kind {
                doc.set_attribute(action, "type", current);
            }
        }
        if let Some(path) = doc.child_element(action, "path") {
            if doc.child_element(action, "file").is_none() {
                if let Some(data) = doc.get_mut(path) {
                    data.tag = "file".to_string();
                }
            }
        }
    }
    Ok(Step::Continue)
}

/// Bring legacy rule and script lists to the current layout. Rule and
/// script PVs were `<pv trig="..">`, severity functions were `pvSevN`, and
/// scripts were `<path pathString=".." checkConnect="..">` with embedded
/// code in `<scriptText>`. Edits the fragment in place before it is
/// imported.
pub fn legacy_rules(ctx: &mut ConfigureContext<'_>) -> Result<Step, LoadError> {
    if !ctx.older_than(2) {
        return Ok(Step::Continue);
    }
    let element = ctx.element;
    let doc = ctx.document_mut();
    let mut entries = Vec::new();

    if let Some(rules) = doc.child_element(element, common::RULES) {
        for rule in doc.child_elements(rules, "rule") {
            for exp in doc.child_elements(rule, "exp") {
                if let Some(data) = doc.get_mut(exp) {
                    if let Some(patched) = data.attribute("bool_exp").and_then(legacy_severity) {
                        debug!(condition = %patched, "patched legacy severity in rule");
                        data.set_attribute("bool_exp", patched);
                    }
                }
            }
            entries.push(rule);
        }
    }

    if let Some(scripts) = doc.child_element(element, common::SCRIPTS) {
        for path in doc.child_elements(scripts, "path") {
            if let Some(data) = doc.get_mut(path) {
                data.tag = "script".to_string();
                rename_attribute(data, "pathString", "file");
                rename_attribute(data, "checkConnect", "check_connections");
            }
            if let Some(text) = doc.child_element(path, "scriptText") {
                if let Some(data) = doc.get_mut(text) {
                    data.tag = "text".to_string();
                }
            }
            entries.push(path);
        }
    }

    for entry in entries {
        for pv in doc.child_elements(entry, "pv") {
            if let Some(data) = doc.get_mut(pv) {
                data.tag = "pv_name".to_string();
                rename_attribute(data, "trig", "trigger");
            }
        }
    }
    Ok(Step::Continue)
}

/// `pvSevN` became `pvLegacySevN`. `None` when nothing changed.
fn legacy_severity(condition: &str) -> Option<String> {
    const OLD: &str = "pvSev";
    let mut out = String::with_capacity(condition.len() + 8);
    let mut rest = condition;
    let mut changed = false;
    while let Some(at) = rest.find(OLD) {
        out.push_str(&rest[..at]);
        let after = &rest[at + OLD.len()..];
        if after.starts_with(|c: char| c.is_ascii_digit()) {
            out.push_str("pvLegacySev");
            changed = true;
        } else {
            out.push_str(OLD);
        }
        rest = after;
    }
    out.push_str(rest);
    changed.then_some(out)
}

fn rename_attribute(data: &mut ElementData, from: &str, to: &str) {
    if let Some(value) = data.remove_attribute(from) {
        if data.attribute(to).is_none() {
            data.set_attribute(to, value);
        }
    }
}

/// Trim whitespace that legacy editors left around PV names.
pub fn legacy_pv(ctx: &mut ConfigureContext<'_>) -> Result<Step, LoadError> {
    let pv = ctx.get(&PV_NAME)?;
    let trimmed = pv.trim();
    if trimmed.len() != pv.len() {
        ctx.set(&PV_NAME, trimmed.to_string())?;
    }
    Ok(Step::Continue)
}

/// Legacy border styles: style 0 had no border whatever its width.
pub fn legacy_border(ctx: &mut ConfigureContext<'_>) -> Result<Step, LoadError> {
    if !ctx.older_than(2) {
        return Ok(Step::Continue);
    }
    if ctx.child_int("border_style")? == Some(0) && ctx.widget.property(BORDER_WIDTH.name).is_some()
    {
        ctx.set(&BORDER_WIDTH, 0)?;
    }
    Ok(Step::Continue)
}

/// Translate the legacy numeric `format_type`, `precision_from_pv` and the
/// `longString` PV suffix into format and precision.
pub fn legacy_format(ctx: &mut ConfigureContext<'_>) -> Result<(), LoadError> {
    if let Some(legacy) = ctx.child_int("format_type")? {
        let (format, precision) = match legacy {
            1 => (FormatOption::Decimal, None),
            2 => (FormatOption::Exponential, None),
            3 => (FormatOption::Hexadecimal, Some(8)),
            4 => (FormatOption::String, None),
            5 => (FormatOption::Hexadecimal, Some(16)),
            6 => (FormatOption::Compact, None),
            7 => (FormatOption::Engineering, None),
            8 => (FormatOption::Sexagesimal, None),
            9 => (FormatOption::SexagesimalHms, None),
            10 => (FormatOption::SexagesimalDms, None),
            _ => (FormatOption::Default, None),
        };
        ctx.set(&FORMAT, format)?;
        if let Some(precision) = precision {
            ctx.set(&PRECISION, precision)?;
        }
    }

    if ctx.child_string("precision_from_pv").as_deref() == Some("true") {
        ctx.set(&PRECISION, -1)?;
    }

    const LONG_STRING: &str = " {\"longString\":true}";
    let pv = ctx.get(&PV_NAME)?;
    if let Some(stripped) = pv.strip_suffix(LONG_STRING) {
        ctx.set(&PV_NAME, stripped.to_string())?;
        ctx.set(&FORMAT, FormatOption::String)?;
    }
    Ok(())
}

/// Change the fragment's type id (and optionally version) so it is read
/// again as another type, and ask the loader to do so.
pub fn retype(
    ctx: &mut ConfigureContext<'_>,
    type_id: &str,
    version: Option<&str>,
    reason: &'static str,
) -> Step {
    let element = ctx.element;
    let doc = ctx.document_mut();
    doc.remove_attribute(element, "type");
    doc.set_attribute(element, "typeId", type_id);
    if let Some(version) = version {
        doc.set_attribute(element, "version", version);
    }
    debug!(type_id, reason, "fragment retyped");
    Step::Reparse {
        replacement: element,
        reason,
    }
}

/// Whether any rule of the fragment targets `property`.
pub fn has_rule_for(ctx: &ConfigureContext<'_>, property: &str) -> bool {
    let doc = ctx.document();
    doc.child_elements(ctx.element, "rules").into_iter().any(|rules| {
        doc.children(rules).iter().any(|&rule| {
            doc.attribute(rule, "prop_id")
                .is_some_and(|id| id.contains(property))
        })
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::loader::Loader;
    use crate::version::{Version, BASE_WIDGET_VERSION};
    use crate::widgets::text_update;

    fn with_context<R>(xml: &str, f: impl FnOnce(&mut ConfigureContext<'_>) -> R) -> R {
        let document = Document::parse(xml).unwrap();
        let root = document.root().unwrap();
        let mut loader = Loader::new(document);
        let mut widget = text_update::DESCRIPTOR.create_widget();
        let mut ctx = ConfigureContext {
            loader: &mut loader,
            widget: &mut widget,
            element: root,
            version: Version::new(1, 0, 0),
        };
        f(&mut ctx)
    }

    #[test]
    fn actions_are_renamed_in_place() {
        with_context(
            r#"<widget><actions>
                 <action type="OPEN_PHOEBUS"><path>a.bob</path></action>
                 <action type="WRITE_PV"><pv_name>x</pv_name></action>
               </actions></widget>"#,
            |ctx| {
                legacy_actions(ctx).unwrap();
                let doc = ctx.document();
                let list = doc.child_element(ctx.element, common::ACTIONS).unwrap();
                let actions = doc.child_elements(list, "action");
                assert_eq!(doc.attribute(actions[0], "type"), Some(common::OPEN_DISPLAY));
                assert_eq!(doc.child_string(actions[0], "file"), Some("a.bob"));
                assert_eq!(doc.attribute(actions[1], "type"), Some("write_pv"));
            },
        );
    }

    #[test]
    fn legacy_rules_and_scripts_renamed() {
        with_context(
            r#"<widget>
                 <rules>
                   <rule name="r" prop_id="visible" out_exp="false">
                     <exp bool_exp="pvSev0 == 1 || pvSeverity"><value>false</value></exp>
                     <pv trig="false">x</pv>
                   </rule>
                 </rules>
                 <scripts>
                   <path pathString="a.py" checkConnect="false">
                     <scriptText>run()</scriptText>
                     <pv trig="true">y</pv>
                   </path>
                 </scripts>
               </widget>"#,
            |ctx| {
                legacy_rules(ctx).unwrap();
                let doc = ctx.document();
                let rules = doc.child_element(ctx.element, common::RULES).unwrap();
                let rule = doc.child_element(rules, "rule").unwrap();
                let exp = doc.child_element(rule, "exp").unwrap();
                assert_eq!(
                    doc.attribute(exp, "bool_exp"),
                    Some("pvLegacySev0 == 1 || pvSeverity")
                );
                let pv = doc.child_element(rule, "pv_name").unwrap();
                assert_eq!(doc.attribute(pv, "trigger"), Some("false"));
                assert_eq!(doc.text(pv), "x");

                let scripts = doc.child_element(ctx.element, common::SCRIPTS).unwrap();
                let script = doc.child_element(scripts, "script").unwrap();
                assert_eq!(doc.attribute(script, "file"), Some("a.py"));
                assert_eq!(doc.attribute(script, "check_connections"), Some("false"));
                assert_eq!(doc.child_string(script, "text"), Some("run()"));
                assert!(doc.child_element(script, "pv_name").is_some());
            },
        );
    }

    #[test]
    fn hexadecimal_format_sets_precision() {
        with_context(
            r#"<widget><format_type>5</format_type><precision_from_pv>false</precision_from_pv></widget>"#,
            |ctx| {
                legacy_format(ctx).unwrap();
                assert_eq!(ctx.get(&FORMAT).unwrap(), FormatOption::Hexadecimal);
                assert_eq!(ctx.get(&PRECISION).unwrap(), 16);
            },
        );
    }

    #[test]
    fn long_string_suffix_is_stripped() {
        with_context(r#"<widget/>"#, |ctx| {
            ctx.set(&PV_NAME, "wave {\"longString\":true}".to_string()).unwrap();
            ctx.set(&PRECISION, 3).unwrap();
            legacy_format(ctx).unwrap();
            assert_eq!(ctx.get(&PV_NAME).unwrap(), "wave");
            assert_eq!(ctx.get(&FORMAT).unwrap(), FormatOption::String);
            assert_eq!(ctx.get(&PRECISION).unwrap(), 3);
        });
    }

    #[test]
    fn retype_requests_reparse_of_same_fragment() {
        with_context(r#"<widget type="textupdate" version="1.0.0"/>"#, |ctx| {
            let step = retype(ctx, LEGACY_LABEL, Some("1.0.0"), "test");
            assert!(matches!(step, Step::Reparse { replacement, .. } if replacement == ctx.element));
            let doc = ctx.document();
            assert_eq!(doc.attribute(ctx.element, "type"), None);
            assert_eq!(doc.attribute(ctx.element, "typeId"), Some(LEGACY_LABEL));
        });
    }

    #[test]
    fn rules_are_found_by_property() {
        with_context(
            r#"<widget><rules><rule name="r" prop_id="pv_name"/></rules></widget>"#,
            |ctx| {
                assert!(has_rule_for(ctx, "pv_name"));
                assert!(!has_rule_for(ctx, "text"));
            },
        );
    }

    #[test]
    fn border_style_zero_clears_width_before_base_version() {
        with_context(
            r#"<widget><border_style>0</border_style></widget>"#,
            |ctx| {
                ctx.set(&BORDER_WIDTH, 2).unwrap();
                legacy_border(ctx).unwrap();
                assert_eq!(ctx.get(&BORDER_WIDTH).unwrap(), 0);

                ctx.set(&BORDER_WIDTH, 2).unwrap();
                ctx.version = BASE_WIDGET_VERSION;
                legacy_border(ctx).unwrap();
                assert_eq!(ctx.get(&BORDER_WIDTH).unwrap(), 2);
            },
        );
    }
}

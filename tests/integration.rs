//! Integration tests for display-model.
//!
//! These tests exercise the public API from outside the crate: loading
//! legacy and current displays, writing them back, and the macro scopes of
//! the resulting widget tree.

use std::sync::{Arc, Once};

use display_model::document::{Document, ElementData};
use display_model::loader::{
    write_display, ConfigureContext, DisplayModel, LoadError, Loader, LoaderConfig, Step,
    WriterConfig,
};
use display_model::macros::Macros;
use display_model::property::MAX_ARRAY_SIZE;
use display_model::property::common::{
    BIT, CONFIRM_MESSAGE, HEIGHT, MACROS, RULES, SQUARE, TEXT, TOOLTIP, WIDTH,
};
use display_model::testing::{changed_values, load_fragment, outline, Fragment};
use display_model::version::BASE_WIDGET_VERSION;
use display_model::widget::{
    inherit_macros, WidgetCategory, WidgetDescriptor, WidgetId, WidgetRegistry, WidgetTree,
};
use display_model::widgets::action_button::{self, CONFIRM_DIALOG, LEGACY_MENU_BUTTON};
use display_model::widgets::bool_button::{self, Mode, MODE};
use display_model::widgets::embedded::LEGACY_LINKING_CONTAINER;
use display_model::widgets::{combo, embedded, group, led, multi_state_led, tabs};
use pretty_assertions::assert_eq;

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn load(fragment: Fragment) -> (Loader, WidgetId) {
    init_tracing();
    load_fragment(fragment).unwrap()
}

fn type_of(loader: &Loader, id: WidgetId) -> String {
    loader.tree().get(id).unwrap().type_id().to_string()
}

/// Every widget's persisted values, depth first.
fn all_values(tree: &WidgetTree, root: WidgetId) -> Vec<(String, String)> {
    tree.walk_depth_first(root)
        .into_iter()
        .flat_map(|id| {
            let widget = tree.get(id).unwrap();
            let type_id = widget.type_id().to_string();
            widget
                .persisted_values()
                .into_iter()
                .map(move |(path, value)| (format!("{type_id}.{path}"), value.to_string()))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Round trip
// ---------------------------------------------------------------------------

const CURRENT: &str = r#"<display version="2.0.0">
  <name>Main</name>
  <macros><S>13</S></macros>
  <widget type="group" version="2.0.0">
    <name>Controls</name>
    <style>1</style>
    <widget type="action_button" version="3.0.0">
      <name>Open</name>
      <pv_name>sys:open</pv_name>
      <actions>
        <action type="open_display"><description>Details</description><file>details.bob</file><target>tab</target></action>
      </actions>
      <confirm_dialog>true</confirm_dialog>
    </widget>
    <widget type="bool_button" version="2.0.0">
      <name>Enable</name>
      <pv_name>sys:enable</pv_name>
      <mode>1</mode>
      <on_color><color red="10" green="200" blue="10"/></on_color>
      <rules>
        <rule name="Alarm" prop_id="on_color" out_exp="false">
          <exp bool_exp="pv0 &gt; 5">
            <value><color red="255" green="0" blue="0"/></value>
          </exp>
          <exp bool_exp="pv0 &lt; 0">
            <value><color name="Minor" red="255" green="128" blue="0"/></value>
          </exp>
          <pv_name>sys:level</pv_name>
          <pv_name trigger="false">sys:mode</pv_name>
        </rule>
      </rules>
      <scripts>
        <script file="EmbeddedPy" check_connections="false">
          <text>print("on")</text>
          <pv_name>sys:enable</pv_name>
        </script>
      </scripts>
    </widget>
  </widget>
  <widget type="multi_state_led" version="2.0.0">
    <name>State</name>
    <states>
      <state><value>0</value><label>Idle</label><color><color red="1" green="1" blue="1"/></color></state>
      <state><value>1</value><label>Busy</label><color><color red="2" green="2" blue="2"/></color></state>
      <state><value>5</value><label>Fault</label><color><color name="Major" red="255" green="0" blue="0"/></color></state>
    </states>
  </widget>
  <widget type="tabs" version="2.0.0">
    <name>Pages</name>
    <tabs>
      <tab><name>One</name><children><widget type="label" version="2.0.0"><name>First</name><text>$(S)</text></widget></children></tab>
      <tab><name>Two</name></tab>
    </tabs>
  </widget>
</display>"#;

#[test]
fn test_write_then_load_reproduces_values() {
    init_tracing();
    let first = DisplayModel::from_xml(CURRENT).unwrap();
    assert!(first.report.is_clean());

    let written = write_display(&first.tree, first.root, &WriterConfig::default()).unwrap();
    let second = DisplayModel::from_xml(&written).unwrap();
    assert!(second.report.is_clean());

    assert_eq!(outline(&first.tree, first.root), outline(&second.tree, second.root));
    assert_eq!(
        all_values(&first.tree, first.root),
        all_values(&second.tree, second.root)
    );
    assert_eq!(
        write_display(&second.tree, second.root, &WriterConfig::default()).unwrap(),
        written
    );

    let enable = second.tree.find_by_name(second.root, "Enable").unwrap();
    let enable = second.tree.get(enable).unwrap();
    let text = |path: &str| enable.lookup(path).unwrap().get::<String>().unwrap();
    assert_eq!(enable.array(RULES).unwrap().size(), 1);
    assert_eq!(text("rules[0].prop_id"), "on_color");
    assert_eq!(text("rules[0].expressions[0].bool_exp"), "pv0 > 5");
    assert_eq!(
        text("rules[0].expressions[1].value"),
        r#"<color name="Minor" red="255" green="128" blue="0"/>"#
    );
    assert_eq!(text("rules[0].pvs[1].name"), "sys:mode");
    assert!(!enable.lookup("rules[0].pvs[1].trigger").unwrap().get::<bool>().unwrap());
    assert_eq!(text("scripts[0].file"), "EmbeddedPy");
    assert_eq!(text("scripts[0].text"), r#"print("on")"#);
    assert_eq!(text("scripts[0].pvs[0].name"), "sys:enable");
}

#[test]
fn test_text_padding_survives_write_and_load() {
    init_tracing();
    let model = DisplayModel::from_xml(
        r#"<display><widget type="label"><name>Gauge</name></widget></display>"#,
    )
    .unwrap();
    let id = model.tree.find_by_name(model.root, "Gauge").unwrap();
    let label = model.tree.get(id).unwrap();
    label.set(&TEXT, "  Pressure:  ".to_string()).unwrap();
    label.set(&TOOLTIP, "first\nsecond\n".to_string()).unwrap();

    for config in [WriterConfig::default(), WriterConfig::compact()] {
        let written = write_display(&model.tree, model.root, &config).unwrap();
        let again = DisplayModel::from_xml(&written).unwrap();
        let id = again.tree.find_by_name(again.root, "Gauge").unwrap();
        let label = again.tree.get(id).unwrap();
        assert_eq!(label.get(&TEXT).unwrap(), "  Pressure:  ");
        assert_eq!(label.get(&TOOLTIP).unwrap(), "first\nsecond\n");
    }

    let blank = DisplayModel::from_xml(
        r#"<display><widget type="label"><name>Gap</name><text>   </text></widget></display>"#,
    )
    .unwrap();
    let id = blank.tree.find_by_name(blank.root, "Gap").unwrap();
    assert_eq!(blank.tree.get(id).unwrap().get(&TEXT).unwrap(), "   ");
}

#[test]
fn test_written_document_is_current_format() {
    init_tracing();
    let model = DisplayModel::from_xml(CURRENT).unwrap();
    let text = write_display(&model.tree, model.root, &WriterConfig::compact()).unwrap();
    let document = Document::parse(&text).unwrap();
    let root = document.root().unwrap();
    for widget in document.query_all(root, |data| data.is("widget")) {
        assert!(document.attribute(widget, "type").is_some());
        assert!(document.attribute(widget, "typeId").is_none());
        assert!(document.attribute(widget, "version").is_some());
    }
    assert!(!text.contains("connected"));
}

#[test]
fn test_compact_legacy_led_snapshot() {
    init_tracing();
    let model = DisplayModel::from_xml(
        r#"<display version="1.0.0">
             <widget typeId="org.csstudio.opibuilder.widgets.LED" version="1.0.0">
               <name>L</name>
               <bit>2</bit>
               <square_led>true</square_led>
             </widget>
           </display>"#,
    )
    .unwrap();
    let text = write_display(&model.tree, model.root, &WriterConfig::compact()).unwrap();
    insta::assert_snapshot!(text, @r#"<?xml version="1.0" encoding="UTF-8"?><display version="2.0.0"><widget type="led" version="2.0.0"><name>L</name><square>true</square><bit>2</bit></widget></display>"#);
}

// ---------------------------------------------------------------------------
// Version thresholds
// ---------------------------------------------------------------------------

#[test]
fn test_bool_button_translation_below_threshold_only() {
    let legacy = Fragment::legacy(bool_button::LEGACY_BOOL_BUTTON)
        .version("1.0.0")
        .property("toggle_button", "false");
    let (loader, id) = load(legacy);
    assert_eq!(loader.tree().get(id).unwrap().get(&MODE).unwrap(), Mode::Push);

    let current = Fragment::widget(bool_button::TYPE_ID)
        .version("2.0.0")
        .property("toggle_button", "false");
    let (loader, id) = load(current);
    assert_eq!(loader.tree().get(id).unwrap().get(&MODE).unwrap(), Mode::Toggle);
}

#[test]
fn test_action_confirmation_hoisted_below_version_three() {
    let actions = Fragment::element(ElementData::new("actions")).child(
        Fragment::element(
            ElementData::new("action").with_attribute("type", "write_pv"),
        )
        .property("confirm_message", "Really?"),
    );

    let (loader, id) = load(
        Fragment::widget(action_button::TYPE_ID)
            .version("2.0.0")
            .property("pv_name", "x")
            .child(actions.clone()),
    );
    let widget = loader.tree().get(id).unwrap();
    assert_eq!(widget.get(&CONFIRM_MESSAGE).unwrap(), "Really?");
    assert!(widget.get(&CONFIRM_DIALOG).unwrap());
    assert_eq!(widget.get(&TOOLTIP).unwrap(), "$(pv_name)\n$(actions)");

    let (loader, id) = load(
        Fragment::widget(action_button::TYPE_ID)
            .version("3.0.0")
            .property("pv_name", "x")
            .child(actions),
    );
    let widget = loader.tree().get(id).unwrap();
    assert!(!widget.get(&CONFIRM_DIALOG).unwrap());
}

// ---------------------------------------------------------------------------
// Menu button disambiguation
// ---------------------------------------------------------------------------

#[test]
fn test_menu_button_with_pv_items_is_combo() {
    let (loader, id) = load(
        Fragment::legacy(LEGACY_MENU_BUTTON)
            .version("1.0.0")
            .property("pv_name", "sys:choice"),
    );
    assert_eq!(type_of(&loader, id), combo::TYPE_ID);
}

#[test]
fn test_menu_button_with_own_actions_is_action_button() {
    let actions = Fragment::element(ElementData::new("actions")).child(
        Fragment::element(
            ElementData::new("action")
                .with_attribute("type", "OPEN_DISPLAY"),
        )
        .property("path", "next.opi"),
    );
    let (loader, id) = load(
        Fragment::legacy(LEGACY_MENU_BUTTON)
            .version("1.0.0")
            .property("actions_from_pv", "false")
            .property("label", "Go")
            .child(actions),
    );
    assert_eq!(type_of(&loader, id), action_button::TYPE_ID);
    assert_eq!(loader.tree().get(id).unwrap().get(&TEXT).unwrap(), "Go");
}

#[test]
fn test_menu_button_without_actions_is_combo() {
    let (loader, id) = load(
        Fragment::legacy(LEGACY_MENU_BUTTON)
            .version("1.0.0")
            .property("actions_from_pv", "false"),
    );
    assert_eq!(type_of(&loader, id), combo::TYPE_ID);
}

// ---------------------------------------------------------------------------
// LEDs
// ---------------------------------------------------------------------------

#[test]
fn test_led_with_bit() {
    let (loader, id) = load(Fragment::widget("led").version("1.0").property("bit", "2"));
    let widget = loader.tree().get(id).unwrap();
    assert_eq!(widget.type_id(), led::TYPE_ID);
    assert_eq!(widget.get(&BIT).unwrap(), 2);
}

#[test]
fn test_led_with_state_count_is_multi_state() {
    let (loader, id) = load(
        Fragment::widget("led")
            .version("1.0")
            .property("bit", "2")
            .property("state_count", "4"),
    );
    let widget = loader.tree().get(id).unwrap();
    assert_eq!(widget.type_id(), multi_state_led::TYPE_ID);
    assert_eq!(widget.array(multi_state_led::STATES).unwrap().size(), 4);
    assert!(loader.report().is_clean());
}

#[test]
fn test_state_count_is_bounded() {
    let (loader, id) = load(
        Fragment::widget("led")
            .version("1.0")
            .property("state_count", &MAX_ARRAY_SIZE.to_string()),
    );
    let widget = loader.tree().get(id).unwrap();
    assert_eq!(widget.array(multi_state_led::STATES).unwrap().size(), MAX_ARRAY_SIZE);

    init_tracing();
    let xml = Fragment::display()
        .child(Fragment::widget("led").version("1.0").name("Ok").property("bit", "1"))
        .child(
            Fragment::widget("led")
                .version("1.0")
                .name("Huge")
                .property("state_count", "2000000"),
        )
        .child(
            Fragment::legacy(tabs::LEGACY_TAB)
                .version("1.0.0")
                .name("Pages")
                .property("tab_count", "50000"),
        )
        .to_xml();
    let model = DisplayModel::from_xml(&xml).unwrap();
    assert_eq!(model.report.errors, 2);
    assert_eq!(
        outline(&model.tree, model.root),
        format!(
            "display \"\"\n  led \"Ok\"\n  led \"Huge\"\n  {} \"Pages\"",
            tabs::LEGACY_TAB
        )
    );
    let huge = model.tree.find_by_name(model.root, "Huge").unwrap();
    assert!(model.tree.get(huge).unwrap().array(multi_state_led::STATES).is_none());
}

#[test]
fn test_legacy_led_square_alias() {
    let (loader, id) = load(
        Fragment::legacy(led::LEGACY_LED)
            .version("1.0.0")
            .property("square_led", "true"),
    );
    let widget = loader.tree().get(id).unwrap();
    assert!(widget.get(&SQUARE).unwrap());
    assert_eq!(changed_values(widget), "square = true");
}

// ---------------------------------------------------------------------------
// Rewrites
// ---------------------------------------------------------------------------

fn framed_container() -> Fragment {
    Fragment::legacy(LEGACY_LINKING_CONTAINER)
        .version("1.0.0")
        .name("Frame")
        .property("opi_file", "inner.opi")
        .property("border_style", "13")
        .property("x", "5")
        .property("y", "6")
        .property("width", "300")
        .property("height", "200")
}

#[test]
fn test_rewrite_is_idempotent() {
    init_tracing();
    let (document, root) = framed_container().into_document();
    let mut loader = Loader::new(document);
    let first = loader.load_widget(root).unwrap();
    assert_eq!(type_of(&loader, first), group::TYPE_ID);
    assert_eq!(loader.report().rewrites, 1);
    let first_outline = outline(loader.tree(), first);
    let first_values = all_values(loader.tree(), first);

    let (document, _, _) = loader.into_parts();
    let root = document.root().unwrap();
    let mut again = Loader::new(document);
    let second = again.load_widget(root).unwrap();
    assert_eq!(again.report().rewrites, 0);
    assert_eq!(outline(again.tree(), second), first_outline);
    assert_eq!(all_values(again.tree(), second), first_values);

    let content = again.tree().find_by_name(second, "Frame_Content").unwrap();
    let content = again.tree().get(content).unwrap();
    assert_eq!(content.type_id(), embedded::TYPE_ID);
    assert_eq!(content.get(&WIDTH).unwrap(), 270);
    assert_eq!(content.get(&HEIGHT).unwrap(), 170);
}

fn always_rewrite(ctx: &mut ConfigureContext<'_>) -> Result<Step, LoadError> {
    Ok(Step::Reparse {
        replacement: ctx.element,
        reason: "never settles",
    })
}

static RESTLESS: WidgetDescriptor = WidgetDescriptor {
    type_id: "restless",
    legacy_ids: &[],
    label: "Restless",
    category: WidgetCategory::Misc,
    version: BASE_WIDGET_VERSION,
    default_size: (10, 10),
    properties: &[],
    configurator: &[always_rewrite],
    aliases: &[],
    macro_scope: inherit_macros,
};

#[test]
fn test_endless_rewrite_is_bounded() {
    init_tracing();
    let mut registry = WidgetRegistry::with_defaults();
    registry.register(&RESTLESS).unwrap();
    let (document, root) = Fragment::widget("restless").into_document();
    let mut loader = Loader::with_config(
        document,
        Arc::new(registry),
        LoaderConfig::new().with_max_reparse(3),
    );
    match loader.load_widget(root) {
        Err(LoadError::TooManyReparse { type_id, limit }) => {
            assert_eq!(type_id, "restless");
            assert_eq!(limit, 3);
        }
        other => panic!("expected TooManyReparse, got {other:?}"),
    }
    assert_eq!(loader.report().rewrites, 3);
}

// ---------------------------------------------------------------------------
// Macros
// ---------------------------------------------------------------------------

#[test]
fn test_child_macro_shadows_and_removal_exposes_parent() {
    init_tracing();
    let config = LoaderConfig::new().with_preference_macros(Macros::new().with("SITE", "lab"));
    let model = DisplayModel::from_xml_with(
        r#"<display>
             <macros><P>display</P></macros>
             <widget type="group">
               <name>G</name>
               <macros><P>group</P></macros>
               <widget type="label"><name>L</name><text>$(SITE):$(P)</text></widget>
             </widget>
           </display>"#,
        config,
    )
    .unwrap();
    let label = model.tree.find_by_name(model.root, "L").unwrap();
    assert_eq!(model.tree.resolve_text(label, &TEXT).unwrap(), "lab:group");

    let group = model.tree.find_by_name(model.root, "G").unwrap();
    model
        .tree
        .get(group)
        .unwrap()
        .set(&MACROS, Macros::new())
        .unwrap();
    assert_eq!(model.tree.resolve_text(label, &TEXT).unwrap(), "lab:display");
}

#[test]
fn test_macros_reach_into_tabs() {
    init_tracing();
    let model = DisplayModel::from_xml(CURRENT).unwrap();
    let first = model.tree.find_by_name(model.root, "First").unwrap();
    assert_eq!(model.tree.resolve_text(first, &TEXT).unwrap(), "13");
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn test_broken_widget_does_not_stop_display() {
    init_tracing();
    let model = DisplayModel::from_xml(
        r#"<display>
             <widget type="label"><name>Good</name></widget>
             <widget type="label"><name>Bad</name><x>two</x></widget>
             <widget type="sparkline"><name>Odd</name></widget>
           </display>"#,
    )
    .unwrap();
    assert_eq!(model.report.errors, 1);
    assert_eq!(model.report.unknown_types, vec!["sparkline".to_string()]);
    assert!(!model.report.is_clean());
    assert_eq!(
        outline(&model.tree, model.root),
        "display \"\"\n  label \"Good\"\n  label \"Bad\"\n  sparkline \"Odd\""
    );
}

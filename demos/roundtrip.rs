use ago_trigger::{
    ActionSpec, CodecOptions, Comparator, Editor, EventMap, Operator, SegmentWidget, Snapshot,
    SourceKind,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const A_PATH: &str = "event.device.statechanged";

// Written by an older console: the last top-level group is never closed.
const LEGACY_MAP: &str = r#"{
    "event": "event.device.statechanged",
    "criteria": {
        "0": {"lval": {"type": "event", "parameter": "uuid"}, "comp": "eq", "rval": "door-1"},
        "2": {"lval": {"type": "variable", "name": "mode"}, "comp": "new", "rval": "home"}
    },
    "nesting": "(criteria[0]) and (criteria[2]",
    "action": {"command": "on", "uuid": "siren-1"}
}"#;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();

    // Build a trigger the way the editor dialog does
    let mut editor = Editor::new(A_PATH);
    editor
        .add_segment(
            &[0],
            SegmentWidget {
                source: Some(SourceKind::Event),
                parameter: Some("uuid".to_owned()),
                value: "door-1".to_owned(),
                ..SegmentWidget::default()
            },
        )
        .unwrap();
    let nested = editor.add_group(&[0], Operator::Or).unwrap();
    for mode in ["away", "vacation"] {
        editor
            .add_segment(
                &nested,
                SegmentWidget {
                    source: Some(SourceKind::Variable),
                    variable: Some("mode".to_owned()),
                    comparator: Some(Comparator::Eq),
                    value: mode.to_owned(),
                    ..SegmentWidget::default()
                },
            )
            .unwrap();
    }
    // Left incomplete on purpose, it is skipped
    editor.add_segment(&[0], SegmentWidget::default()).unwrap();

    let trigger = editor.trigger(ActionSpec::new("on", "siren-1"));
    let map = trigger.encode(&CodecOptions::default());
    println!("{}", serde_json::to_string_pretty(&map).unwrap());

    let decoded = map.decode(&CodecOptions::default()).unwrap();
    println!("Round trip preserved the trigger: {}", decoded == trigger);

    let mut builder = Snapshot::builder(A_PATH);
    builder.with_event("uuid", "door-1").with_variable("mode", "away");
    println!(
        "Fires when the door opens while away: {:?}",
        trigger.evaluate(&builder.build(), &CodecOptions::default())
    );

    // Read a map that a strict decoder refuses
    let legacy: EventMap = serde_json::from_str(LEGACY_MAP).unwrap();
    if let Err(error) = legacy.decode(&CodecOptions::default()) {
        println!("Strict decoding failed: {error}");
    }
    let (editor, action) = Editor::open(&legacy, &CodecOptions::lenient()).unwrap();
    println!(
        "Lenient decoding found {} top-level groups, action {action:?}",
        editor.groups().len()
    );
}

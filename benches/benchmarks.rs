use ago_trigger::{
    parse_elements, serialize, ActionSpec, CodecOptions, Comparator, Connective, CriteriaMap,
    Criterion as TriggerCriterion, EventMap, EventTrigger, Group, Operator, Param, ParseMode,
    Snapshot,
};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use itertools::Itertools;
use serde::Deserialize;
use std::collections::HashMap;

const A_PATH: &str = "event.device.statechanged";
const A_NESTING: &str = "(criteria[0] and criteria[1] and (criteria[2] or criteria[3] or (criteria[4] and criteria[5]))) or (criteria[6] and (criteria[7] or criteria[8]))";

const TRIGGERS_FILE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/benches/data/triggers.json"
));

fn a_criterion(index: usize) -> TriggerCriterion {
    TriggerCriterion::new(
        A_PATH,
        Param::event("level"),
        Comparator::Gt,
        index.to_string(),
    )
}

fn some_elements() -> Vec<Group> {
    let nested = Group::new(
        Operator::And,
        vec![a_criterion(4).into(), a_criterion(5).into()],
    );
    let alternatives = Group::new(
        Operator::Or,
        vec![a_criterion(2).into(), a_criterion(3).into(), nested.into()],
    );
    let first = Group::new(
        Operator::And,
        vec![a_criterion(0).into(), a_criterion(1).into(), alternatives.into()],
    );
    let second = Group::new(
        Operator::Or,
        vec![
            a_criterion(6).into(),
            Group::new(
                Operator::Or,
                vec![a_criterion(7).into(), a_criterion(8).into()],
            )
            .into(),
        ],
    );
    vec![first, second]
}

pub fn serialize_elements(c: &mut Criterion) {
    let elements = some_elements();
    c.bench_function("serialize", |b| {
        b.iter(|| {
            let _ = std::hint::black_box(serialize(&elements, Connective::LastElement));
        })
    });
}

pub fn parse(c: &mut Criterion) {
    let criteria = (0..9).map(|index| (index, a_criterion(index))).collect::<CriteriaMap>();
    c.bench_function("parse", |b| {
        b.iter(|| {
            let _ = std::hint::black_box(parse_elements(A_NESTING, &criteria, ParseMode::Strict));
        })
    });
}

pub fn encode_then_decode(c: &mut Criterion) {
    let options = CodecOptions::default();
    c.bench_function("encode_then_decode", |b| {
        b.iter_batched(
            || EventTrigger {
                path: A_PATH.to_owned(),
                elements: some_elements(),
                action: ActionSpec::new("on", "siren-1"),
            },
            |trigger| {
                let _ = std::hint::black_box(trigger.encode(&options).decode(&options));
            },
            BatchSize::SmallInput,
        )
    });
}

#[derive(Deserialize)]
struct TriggersContent {
    snapshots: Vec<SnapshotContent>,
    eventmaps: Vec<EventMap>,
}

#[derive(Deserialize)]
struct SnapshotContent {
    path: String,
    #[serde(default)]
    event: HashMap<String, String>,
    #[serde(default)]
    variables: HashMap<String, String>,
}

pub fn evaluate_with_files(c: &mut Criterion) {
    let content: TriggersContent = serde_json::from_str(TRIGGERS_FILE).unwrap();
    let options = CodecOptions::default();
    let triggers = content
        .eventmaps
        .iter()
        .map(|map| map.decode(&options).unwrap())
        .collect_vec();
    let snapshots = content
        .snapshots
        .iter()
        .map(|snapshot| {
            let mut builder = Snapshot::builder(snapshot.path.clone());
            snapshot.event.iter().for_each(|(parameter, value)| {
                builder.with_event(parameter, value);
            });
            snapshot.variables.iter().for_each(|(name, value)| {
                builder.with_variable(name, value);
            });
            builder.build()
        })
        .collect_vec();
    c.bench_function("evaluate_with_files", |b| {
        b.iter(|| {
            for snapshot in &snapshots {
                for trigger in &triggers {
                    let _ = std::hint::black_box(trigger.evaluate(snapshot, &options));
                }
            }
        })
    });
}

criterion_group!(
    benches,
    serialize_elements,
    parse,
    encode_then_decode,
    evaluate_with_files
);
criterion_main!(benches);

use crate::{
    action::ActionSpec,
    config::CodecOptions,
    criteria::{CriteriaStore, CriterionRecord},
    decoder::{parse_elements_with, CriteriaMap},
    error::NestingError,
    evaluation::{evaluate_elements, Snapshot},
    expression::Group,
    serializer::serialize_into,
};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A stored automation: when an event of type `path` is raised and the criteria of `elements`
/// hold, `action` is sent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventTrigger {
    pub path: String,
    pub elements: Vec<Group>,
    pub action: ActionSpec,
}

/// The wire form of an [`EventTrigger`], as exchanged with the event controller.
///
/// ```rust
/// use ago_trigger::{CodecOptions, EventMap};
///
/// let map: EventMap = serde_json::from_str(r#"{
///     "event": "event.device.statechanged",
///     "criteria": {
///         "0": {"lval": {"type": "event", "parameter": "level"}, "comp": "gt", "rval": "50"},
///         "1": {"lval": {"type": "variable", "name": "mode"}, "comp": "eq", "rval": "away"}
///     },
///     "nesting": "(criteria[0] or criteria[1])",
///     "action": {"command": "on", "uuid": "siren"}
/// }"#).unwrap();
///
/// let trigger = map.decode(&CodecOptions::default()).unwrap();
/// assert_eq!(1, trigger.elements.len());
/// assert_eq!(map, trigger.encode(&CodecOptions::default()));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMap {
    pub event: String,
    #[serde(default, deserialize_with = "indexed")]
    pub criteria: BTreeMap<usize, CriterionRecord>,
    pub nesting: String,
    pub action: ActionSpec,
}

impl EventTrigger {
    pub fn encode(&self, options: &CodecOptions) -> EventMap {
        let mut store = CriteriaStore::new();
        let nesting = serialize_into(&mut store, &self.elements, options.connective);
        EventMap {
            event: self.path.clone(),
            criteria: store.to_records(),
            nesting,
            action: self.action.clone(),
        }
    }

    /// Whether the trigger fires for `snapshot`; it never fires on events of another type.
    pub fn evaluate(&self, snapshot: &Snapshot, options: &CodecOptions) -> Option<bool> {
        if snapshot.path() != self.path {
            return Some(false);
        }
        evaluate_elements(&self.elements, options.connective, snapshot)
    }
}

impl EventMap {
    pub fn decode(&self, options: &CodecOptions) -> Result<EventTrigger, NestingError> {
        let criteria = self
            .criteria
            .iter()
            .map(|(index, record)| (*index, record.clone().into_criterion(&self.event)))
            .collect::<CriteriaMap>();
        let elements = parse_elements_with(&self.nesting, &criteria, options)?;
        Ok(EventTrigger {
            path: self.event.clone(),
            elements,
            action: self.action.clone(),
        })
    }
}

/// Read the criteria keys as indices even when the map was buffered, as inside an RPC request.
fn indexed<'de, D>(deserializer: D) -> Result<BTreeMap<usize, CriterionRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    BTreeMap::<String, CriterionRecord>::deserialize(deserializer)?
        .into_iter()
        .map(|(key, record)| match key.parse() {
            Ok(index) => Ok((index, record)),
            Err(_) => Err(D::Error::custom(format!("criterion key {key:?} is not an index"))),
        })
        .collect()
}

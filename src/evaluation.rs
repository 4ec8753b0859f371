//! Check expression trees against the values seen when an event is raised.
use crate::{
    config::Connective,
    criteria::{scalar_text, Comparator, Criterion, Param},
    expression::{ExpressionNode, Group, Operator},
    schema::Device,
};
use rust_decimal::Decimal;
use std::{cmp::Ordering, collections::HashMap};

/// The values a trigger is checked against.
///
/// A value missing from the snapshot is undefined: a criterion reading it is neither true nor
/// false.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    path: String,
    event: HashMap<String, String>,
    devices: HashMap<(String, String), String>,
    variables: HashMap<String, String>,
}

/// A [`Snapshot`] builder
#[derive(Debug)]
pub struct SnapshotBuilder {
    snapshot: Snapshot,
}

impl Snapshot {
    /// Start a snapshot of an event of type `path`.
    ///
    /// ```rust
    /// use ago_trigger::{Comparator, Criterion, Param, Snapshot};
    ///
    /// let mut builder = Snapshot::builder("event.device.statechanged");
    /// builder.with_event("level", "75");
    /// builder.with_variable("mode", "away");
    /// let snapshot = builder.build();
    ///
    /// let criterion = Criterion::new(
    ///     "event.device.statechanged",
    ///     Param::event("level"),
    ///     Comparator::Gte,
    ///     "50",
    /// );
    /// assert_eq!(Some(true), criterion.evaluate(&snapshot));
    /// ```
    pub fn builder(path: impl Into<String>) -> SnapshotBuilder {
        SnapshotBuilder {
            snapshot: Self {
                path: path.into(),
                ..Self::default()
            },
        }
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn resolve(&self, param: &Param) -> Option<&str> {
        let value = match param {
            Param::Event { parameter } => self.event.get(parameter),
            Param::Device { uuid, parameter } => {
                self.devices.get(&(uuid.clone(), parameter.clone()))
            }
            Param::Variable { name } => self.variables.get(name),
        };
        value.map(String::as_str)
    }
}

impl SnapshotBuilder {
    pub fn build(self) -> Snapshot {
        self.snapshot
    }

    pub fn with_event(&mut self, parameter: &str, value: &str) -> &mut Self {
        self.snapshot
            .event
            .insert(parameter.to_owned(), value.to_owned());
        self
    }

    pub fn with_device(&mut self, uuid: &str, parameter: &str, value: &str) -> &mut Self {
        self.snapshot
            .devices
            .insert((uuid.to_owned(), parameter.to_owned()), value.to_owned());
        self
    }

    /// Add every scalar value last reported by `device`.
    pub fn with_device_values(&mut self, device: &Device) -> &mut Self {
        for (parameter, value) in &device.values {
            match scalar_text(value.clone()) {
                Ok(text) => {
                    self.with_device(&device.uuid, parameter, &text);
                }
                Err(reason) => {
                    tracing::debug!(uuid = %device.uuid, %parameter, %reason, "skipping device value");
                }
            }
        }
        self
    }

    pub fn with_variable(&mut self, name: &str, value: &str) -> &mut Self {
        self.snapshot
            .variables
            .insert(name.to_owned(), value.to_owned());
        self
    }
}

impl Comparator {
    /// Compare two raw values, as numbers when both are decimals and as text otherwise.
    pub fn compare(&self, actual: &str, expected: &str) -> bool {
        let ordering = match (actual.trim().parse::<Decimal>(), expected.trim().parse::<Decimal>()) {
            (Ok(actual), Ok(expected)) => actual.cmp(&expected),
            _ => actual.cmp(expected),
        };
        match self {
            Self::Eq => ordering == Ordering::Equal,
            Self::Ne => ordering != Ordering::Equal,
            Self::Gt => ordering == Ordering::Greater,
            Self::Lt => ordering == Ordering::Less,
            Self::Gte => ordering != Ordering::Less,
            Self::Lte => ordering != Ordering::Greater,
        }
    }
}

impl Criterion {
    pub fn evaluate(&self, snapshot: &Snapshot) -> Option<bool> {
        let actual = snapshot.resolve(self.param())?;
        Some(self.comparator().compare(actual, self.value()))
    }
}

impl Group {
    /// Three-valued evaluation; a group without children is true.
    pub fn evaluate(&self, snapshot: &Snapshot) -> Option<bool> {
        if self.is_empty() {
            return Some(true);
        }
        combine(
            self.operator(),
            self.children().iter().map(|child| match child {
                ExpressionNode::Leaf(criterion) => criterion.evaluate(snapshot),
                ExpressionNode::Group(group) => group.evaluate(snapshot),
            }),
        )
    }
}

/// Evaluate the top-level groups of a trigger.
///
/// No group at all is the unconditional `True` trigger.
pub fn evaluate_elements(
    elements: &[Group],
    connective: Connective,
    snapshot: &Snapshot,
) -> Option<bool> {
    if elements.is_empty() {
        return Some(true);
    }
    combine(
        connective.resolve(elements),
        elements.iter().map(|element| element.evaluate(snapshot)),
    )
}

fn combine(operator: Operator, results: impl Iterator<Item = Option<bool>>) -> Option<bool> {
    let (absorbing, neutral) = match operator {
        Operator::And => (false, true),
        Operator::Or => (true, false),
    };
    let mut acc = Some(neutral);
    for result in results {
        match result {
            Some(value) if value == absorbing => return Some(absorbing),
            Some(_) => {}
            None => acc = None,
        }
    }
    acc
}

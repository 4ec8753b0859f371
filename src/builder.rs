//! Turn the state of the trigger editor into expression trees.
//!
//! The editor is described with plain values: a [`GroupWidget`] holds the operator picked by its
//! radio buttons (if any) and its children in display order, each of which is either a nested
//! group or a [`SegmentWidget`] with the current selection of its drop-downs and its text input.
use crate::{
    criteria::{Comparator, Criterion, Param},
    expression::{ExpressionNode, Group, Operator},
};

/// The parameter a device segment compares when none was picked; it is always listed first.
pub const DEFAULT_DEVICE_PARAMETER: &str = "state";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupWidget {
    pub operator: Option<Operator>,
    pub children: Vec<Widget>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Widget {
    Segment(SegmentWidget),
    Group(GroupWidget),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SourceKind {
    #[default]
    Event,
    Device,
    Variable,
}

/// The selections of one criterion row.
///
/// Only the selections matching `source` are read: `parameter` for events, `device` and
/// `parameter` for devices, `variable` for variables.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SegmentWidget {
    pub source: Option<SourceKind>,
    pub parameter: Option<String>,
    pub device: Option<String>,
    pub variable: Option<String>,
    pub comparator: Option<Comparator>,
    pub value: String,
}

impl SegmentWidget {
    /// The criterion selected by the row, or `None` when a required selection is missing.
    ///
    /// Drop-downs without a selection fall back to their first entry: the `event` source, the
    /// `=` comparator and the `state` device parameter.
    pub fn criterion(&self, path: &str) -> Option<Criterion> {
        let param = match self.source.unwrap_or_default() {
            SourceKind::Event => Param::event(self.parameter.clone()?),
            SourceKind::Device => Param::device(
                self.device.clone()?,
                self.parameter
                    .clone()
                    .unwrap_or_else(|| DEFAULT_DEVICE_PARAMETER.to_owned()),
            ),
            SourceKind::Variable => Param::variable(self.variable.clone()?),
        };
        let comparator = self.comparator.unwrap_or(Comparator::Eq);
        Some(Criterion::new(path, param, comparator, self.value.clone()))
    }
}

impl From<&Criterion> for SegmentWidget {
    fn from(criterion: &Criterion) -> Self {
        let mut segment = Self {
            comparator: Some(criterion.comparator()),
            value: criterion.value().to_owned(),
            ..Self::default()
        };
        match criterion.param() {
            Param::Event { parameter } => {
                segment.source = Some(SourceKind::Event);
                segment.parameter = Some(parameter.clone());
            }
            Param::Device { uuid, parameter } => {
                segment.source = Some(SourceKind::Device);
                segment.device = Some(uuid.clone());
                segment.parameter = Some(parameter.clone());
            }
            Param::Variable { name } => {
                segment.source = Some(SourceKind::Variable);
                segment.variable = Some(name.clone());
            }
        }
        segment
    }
}

impl From<&Group> for GroupWidget {
    fn from(group: &Group) -> Self {
        Self {
            operator: Some(group.operator()),
            children: group
                .children()
                .iter()
                .map(|child| match child {
                    ExpressionNode::Leaf(criterion) => Widget::Segment(criterion.into()),
                    ExpressionNode::Group(group) => Widget::Group(group.into()),
                })
                .collect(),
        }
    }
}

impl From<SegmentWidget> for Widget {
    fn from(segment: SegmentWidget) -> Self {
        Self::Segment(segment)
    }
}

impl From<GroupWidget> for Widget {
    fn from(group: GroupWidget) -> Self {
        Self::Group(group)
    }
}

/// Build the top-level groups of a trigger on the event type `path`.
pub fn build_elements(path: &str, groups: &[GroupWidget]) -> Vec<Group> {
    groups.iter().map(|group| build_group(path, group)).collect()
}

pub fn build_group(path: &str, widget: &GroupWidget) -> Group {
    let mut group = Group::new(
        widget.operator.unwrap_or_default(),
        Vec::with_capacity(widget.children.len()),
    );
    for child in &widget.children {
        match child {
            Widget::Segment(segment) => match segment.criterion(path) {
                Some(criterion) => group.push(criterion),
                None => {
                    tracing::debug!(?segment, "skipping a segment with a missing selection");
                }
            },
            Widget::Group(nested) => group.push(build_group(path, nested)),
        }
    }
    group
}

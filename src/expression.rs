use crate::criteria::Criterion;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    #[default]
    And,
    Or,
}

impl Display for Operator {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::And => write!(formatter, "and"),
            Self::Or => write!(formatter, "or"),
        }
    }
}

/// A boolean combination of criteria and nested groups.
///
/// A group without children is always true.
///
/// Its JSON form is the one the trigger editor works with: `{"type": "and", "sub": [...]}` where
/// every entry of `sub` is either a nested group or a criterion.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    #[serde(rename = "type", default)]
    operator: Operator,
    #[serde(rename = "sub")]
    children: Vec<ExpressionNode>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpressionNode {
    Group(Group),
    Leaf(Criterion),
}

impl Group {
    pub fn new(operator: Operator, children: Vec<ExpressionNode>) -> Self {
        Self { operator, children }
    }

    #[inline]
    pub fn operator(&self) -> Operator {
        self.operator
    }

    #[inline]
    pub fn set_operator(&mut self, operator: Operator) {
        self.operator = operator;
    }

    #[inline]
    pub fn children(&self) -> &[ExpressionNode] {
        &self.children
    }

    #[inline]
    pub fn into_children(self) -> Vec<ExpressionNode> {
        self.children
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn push(&mut self, child: impl Into<ExpressionNode>) {
        self.children.push(child.into());
    }

    /// All the criteria of the group, depth-first, in the order in which they are numbered when
    /// serialized.
    pub fn criteria(&self) -> Vec<&Criterion> {
        let mut criteria = Vec::new();
        self.collect_criteria(&mut criteria);
        criteria
    }

    fn collect_criteria<'a>(&'a self, criteria: &mut Vec<&'a Criterion>) {
        for child in &self.children {
            match child {
                ExpressionNode::Leaf(criterion) => criteria.push(criterion),
                ExpressionNode::Group(group) => group.collect_criteria(criteria),
            }
        }
    }

    /// Whether this group or one of its descendants has no children.
    pub fn has_empty_group(&self) -> bool {
        self.children.is_empty()
            || self.children.iter().any(|child| match child {
                ExpressionNode::Group(group) => group.has_empty_group(),
                ExpressionNode::Leaf(_) => false,
            })
    }
}

impl From<Group> for ExpressionNode {
    fn from(group: Group) -> Self {
        Self::Group(group)
    }
}

impl From<Criterion> for ExpressionNode {
    fn from(criterion: Criterion) -> Self {
        Self::Leaf(criterion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        criteria::{Comparator, Param},
        test_utils::expression::{and, or},
    };
    use serde_json::json;

    const A_PATH: &str = "event.environment.temperaturechanged";

    fn a_criterion(value: &str) -> Criterion {
        Criterion::new(A_PATH, Param::event("level"), Comparator::Gt, value)
    }

    #[test]
    fn can_collect_the_criteria_depth_first() {
        let group = and!(
            a_criterion("1"),
            or!(a_criterion("2"), and!(a_criterion("3"))),
            a_criterion("4")
        );

        let values = group
            .criteria()
            .into_iter()
            .map(|criterion| criterion.value())
            .collect::<Vec<_>>();

        assert_eq!(vec!["1", "2", "3", "4"], values);
    }

    #[test]
    fn can_find_empty_groups() {
        assert!(and!().has_empty_group());
        assert!(and!(a_criterion("1"), or!()).has_empty_group());
        assert!(!and!(a_criterion("1"), or!(a_criterion("2"))).has_empty_group());
    }

    #[test]
    fn can_serialize_to_the_editor_json() {
        let group = or!(a_criterion("20"), and!());

        assert_eq!(
            json!({
                "type": "or",
                "sub": [
                    {
                        "path": A_PATH,
                        "param": {"type": "event", "parameter": "level"},
                        "comp": "gt",
                        "value": "20"
                    },
                    {"type": "and", "sub": []}
                ]
            }),
            serde_json::to_value(&group).unwrap()
        );
    }

    #[test]
    fn can_deserialize_from_the_editor_json() {
        let group: Group = serde_json::from_value(json!({
            "type": "and",
            "sub": [
                {
                    "path": A_PATH,
                    "param": {"type": "variable", "name": "mode"},
                    "comp": "eq",
                    "value": "away"
                },
                {"type": "or", "sub": [{
                    "path": A_PATH,
                    "param": {"type": "device", "uuid": "lamp", "parameter": "state"},
                    "comp": "ne",
                    "value": "0"
                }]}
            ]
        }))
        .unwrap();

        assert_eq!(
            and!(
                Criterion::new(A_PATH, Param::variable("mode"), Comparator::Eq, "away"),
                or!(Criterion::new(
                    A_PATH,
                    Param::device("lamp", "state"),
                    Comparator::Ne,
                    "0"
                ))
            ),
            group
        );
    }

    #[test]
    fn a_group_without_operator_defaults_to_and() {
        let group: Group = serde_json::from_value(json!({"sub": []})).unwrap();

        assert_eq!(Operator::And, group.operator());
    }
}

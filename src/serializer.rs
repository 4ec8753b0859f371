use crate::{
    config::Connective,
    criteria::CriteriaStore,
    expression::{ExpressionNode, Group},
};
use itertools::Itertools;

/// The nesting written when there is nothing to check.
pub const ALWAYS: &str = "True";

/// The result of flattening the top-level groups of a trigger.
#[derive(Clone, Debug)]
pub struct Serialized {
    pub criteria: CriteriaStore,
    pub nesting: String,
}

/// Flatten the top-level groups of a trigger into a fresh [`CriteriaStore`] and the nesting
/// string referring to it.
pub fn serialize(elements: &[Group], connective: Connective) -> Serialized {
    let mut criteria = CriteriaStore::new();
    let nesting = serialize_into(&mut criteria, elements, connective);
    Serialized { criteria, nesting }
}

/// Same as [`serialize()`] but reuses `criteria`, which is cleared first.
///
/// Indices are shared by all the top-level groups: the first criterion of a group is numbered
/// right after the last one of the previous group.
pub fn serialize_into(
    criteria: &mut CriteriaStore,
    elements: &[Group],
    connective: Connective,
) -> String {
    criteria.clear();
    if elements.is_empty() {
        return ALWAYS.to_owned();
    }

    let blocks = elements
        .iter()
        .map(|element| write_group(criteria, element))
        .collect_vec();
    if criteria.is_empty() {
        tracing::debug!(
            elements = elements.len(),
            "trigger has no criteria, writing an unconditional nesting"
        );
        return ALWAYS.to_owned();
    }

    let separator = format!(" {} ", connective.resolve(elements));
    blocks.join(&separator)
}

fn write_group(criteria: &mut CriteriaStore, group: &Group) -> String {
    if group.is_empty() {
        return format!("({ALWAYS})");
    }

    let separator = format!(" {} ", group.operator());
    let body = group
        .children()
        .iter()
        .map(|child| match child {
            ExpressionNode::Leaf(criterion) => {
                format!("criteria[{}]", criteria.allocate(criterion.clone()))
            }
            ExpressionNode::Group(group) => write_group(criteria, group),
        })
        .join(&separator);
    format!("({body})")
}

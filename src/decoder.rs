use crate::{
    ast::{Chain, Connectives, Term},
    config::{CodecOptions, Connective, ParseMode},
    criteria::Criterion,
    error::NestingError,
    expression::{ExpressionNode, Group, Operator},
    parser,
};
use std::collections::BTreeMap;

/// Criteria of a stored trigger by their index in its nesting string.
///
/// Indices may have gaps.
pub type CriteriaMap = BTreeMap<usize, Criterion>;

/// Rebuild the expression tree described by a nesting string.
///
/// The whole nesting is read as the content of one group. When that group only wraps another
/// group, the inner one is returned instead.
pub fn parse_nesting(
    nesting: &str,
    criteria: &CriteriaMap,
    mode: ParseMode,
) -> Result<Group, NestingError> {
    let chain = parser::parse(nesting, mode)?;
    let group = decode_group(&chain, criteria, mode)?;
    let operator = group.operator();
    let mut children = group.into_children();
    match (children.pop(), children.is_empty()) {
        (Some(ExpressionNode::Group(inner)), true) => Ok(inner),
        (last, _) => {
            children.extend(last);
            Ok(Group::new(operator, children))
        }
    }
}

/// Rebuild the top-level groups of a trigger from a nesting string whose groups are joined by
/// the operator of the last group.
///
/// `True` gives no group at all. A top level made only of bracketed groups gives one element per
/// group. Anything else at the top level is read as a single group.
pub fn parse_elements(
    nesting: &str,
    criteria: &CriteriaMap,
    mode: ParseMode,
) -> Result<Vec<Group>, NestingError> {
    let options = CodecOptions {
        connective: Connective::LastElement,
        parse_mode: mode,
    };
    parse_elements_with(nesting, criteria, &options)
}

/// Same as [`parse_elements()`] for groups joined as `options.connective` describes.
///
/// With [`Connective::LastElement`], the connective read between the groups is written back on
/// the last group when it has fewer than two children to carry it. A connective that the
/// elements cannot reproduce is an error in strict mode; lenient mode logs it and keeps the
/// elements as they are.
pub fn parse_elements_with(
    nesting: &str,
    criteria: &CriteriaMap,
    options: &CodecOptions,
) -> Result<Vec<Group>, NestingError> {
    let mode = options.parse_mode;
    let chain = parser::parse(nesting, mode)?;
    if chain.is_true() {
        return Ok(Vec::new());
    }

    let groups = chain
        .terms()
        .map(|term| match term {
            Term::Group(inner) => Some(inner),
            Term::True | Term::Criteria(_) => None,
        })
        .collect::<Option<Vec<_>>>();
    let Some(groups) = groups else {
        tracing::debug!("nesting has bare terms at the top level, reading it as one group");
        return Ok(vec![decode_group(&chain, criteria, mode)?]);
    };

    let found = operator(&chain, mode)?;
    let mut elements = groups
        .into_iter()
        .map(|group| decode_group(group, criteria, mode))
        .collect::<Result<Vec<_>, _>>()?;
    if elements.len() < 2 {
        return Ok(elements);
    }

    let expected = match (options.connective, elements.last_mut()) {
        (Connective::Fixed(expected), _) => expected,
        (Connective::LastElement, Some(last)) if last.children().len() < 2 => {
            last.set_operator(found);
            found
        }
        (Connective::LastElement, last) => last.map(|last| last.operator()).unwrap_or(found),
    };
    match (found == expected, mode) {
        (true, _) => {}
        (false, ParseMode::Lenient) => {
            tracing::warn!(%found, %expected, "top-level connective cannot be kept");
        }
        (false, ParseMode::Strict) => {
            return Err(NestingError::ConnectiveMismatch { found, expected });
        }
    }
    Ok(elements)
}

/// Rebuild one group from the chain of terms written between its brackets.
pub fn decode_group(
    chain: &Chain,
    criteria: &CriteriaMap,
    mode: ParseMode,
) -> Result<Group, NestingError> {
    if chain.is_true() {
        return Ok(Group::default());
    }

    let mut group = Group::new(operator(chain, mode)?, Vec::with_capacity(chain.len()));
    for term in chain.terms() {
        match term {
            Term::True => group.push(Group::default()),
            Term::Criteria(index) => match (criteria.get(index), mode) {
                (Some(criterion), _) => group.push(criterion.clone()),
                (None, ParseMode::Lenient) => {
                    tracing::warn!(index, "dropping reference to an unknown criterion");
                }
                (None, ParseMode::Strict) => return Err(NestingError::UnknownCriterion(*index)),
            },
            Term::Group(inner) => group.push(decode_group(inner, criteria, mode)?),
        }
    }
    Ok(group)
}

fn operator(chain: &Chain, mode: ParseMode) -> Result<Operator, NestingError> {
    match (chain.connectives(), mode) {
        (Connectives::None, _) => Ok(Operator::default()),
        (Connectives::Uniform(operator), _) => Ok(operator),
        (Connectives::Mixed { first }, ParseMode::Lenient) => {
            tracing::warn!(%first, "group mixes connectives, keeping the first one");
            Ok(first)
        }
        (Connectives::Mixed { .. }, ParseMode::Strict) => Err(NestingError::MixedOperators),
    }
}

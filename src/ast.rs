use crate::expression::Operator;
use itertools::Itertools;

/// A sequence of terms joined by connectives, as written between a pair of brackets (or at the
/// top level of a nesting string).
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Chain {
    first: Box<Term>,
    rest: Vec<(Operator, Term)>,
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Term {
    True,
    Criteria(usize),
    Group(Chain),
}

/// What the connectives of a [`Chain`] agree on.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Connectives {
    None,
    Uniform(Operator),
    Mixed { first: Operator },
}

impl Chain {
    pub fn new(first: Term, rest: Vec<(Operator, Term)>) -> Self {
        Self {
            first: Box::new(first),
            rest,
        }
    }

    #[inline]
    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        std::iter::once(self.first.as_ref()).chain(self.rest.iter().map(|(_, term)| term))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rest.len() + 1
    }

    #[inline]
    pub fn is_true(&self) -> bool {
        self.rest.is_empty() && *self.first == Term::True
    }

    pub fn connectives(&self) -> Connectives {
        let mut operators = self.rest.iter().map(|(operator, _)| *operator);
        let Some(first) = operators.clone().next() else {
            return Connectives::None;
        };
        if operators.all_equal() {
            Connectives::Uniform(first)
        } else {
            Connectives::Mixed { first }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_single_term_has_no_connectives() {
        let chain = Chain::new(Term::Criteria(0), vec![]);

        assert_eq!(Connectives::None, chain.connectives());
        assert_eq!(1, chain.len());
    }

    #[test]
    fn can_detect_uniform_connectives() {
        let chain = Chain::new(
            Term::Criteria(0),
            vec![
                (Operator::Or, Term::Criteria(1)),
                (Operator::Or, Term::Criteria(2)),
            ],
        );

        assert_eq!(Connectives::Uniform(Operator::Or), chain.connectives());
    }

    #[test]
    fn can_detect_mixed_connectives() {
        let chain = Chain::new(
            Term::Criteria(0),
            vec![
                (Operator::And, Term::Criteria(1)),
                (Operator::Or, Term::Criteria(2)),
            ],
        );

        assert_eq!(
            Connectives::Mixed {
                first: Operator::And
            },
            chain.connectives()
        );
    }

    #[test]
    fn iterate_the_terms_in_order() {
        let chain = Chain::new(
            Term::Criteria(3),
            vec![(Operator::And, Term::True), (Operator::And, Term::Criteria(1))],
        );

        assert_eq!(
            vec![&Term::Criteria(3), &Term::True, &Term::Criteria(1)],
            chain.terms().collect::<Vec<_>>()
        );
    }

    #[test]
    fn only_a_lone_true_term_is_true() {
        assert!(Chain::new(Term::True, vec![]).is_true());
        assert!(!Chain::new(Term::True, vec![(Operator::And, Term::True)]).is_true());
        assert!(!Chain::new(Term::Criteria(0), vec![]).is_true());
    }

    #[test]
    fn can_nest_groups_as_the_first_term() {
        let innermost = Chain::new(Term::True, vec![]);
        let inner = Chain::new(Term::Group(innermost.clone()), vec![]);
        let chain = Chain::new(
            Term::Group(inner.clone()),
            vec![(Operator::Or, Term::Criteria(0))],
        );

        assert_eq!(
            vec![&Term::Group(inner), &Term::Criteria(0)],
            chain.terms().collect::<Vec<_>>()
        );
        assert!(!chain.is_true());
        assert!(innermost.is_true());
    }
}

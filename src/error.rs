use crate::{
    expression::Operator,
    lexer::{LexicalError, Token},
};
use lalrpop_util::ParseError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParserError {
    #[error("failed to lex the nesting with {0:?}")]
    Lexical(LexicalError),
}

pub type NestingParseError = ParseError<usize, Token, ParserError>;

/// Failure to turn a nesting string back into an expression tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NestingError {
    #[error("malformed nesting: {0}")]
    Syntax(NestingParseError),
    #[error("nesting refers to criteria[{0}] which is not part of the criteria map")]
    UnknownCriterion(usize),
    #[error("a group mixes `and` and `or` connectives")]
    MixedOperators,
    #[error("top-level groups are joined with `{found}` where `{expected}` was expected")]
    ConnectiveMismatch { found: Operator, expected: Operator },
}

impl From<NestingParseError> for NestingError {
    fn from(error: NestingParseError) -> Self {
        Self::Syntax(error)
    }
}

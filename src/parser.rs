use crate::{
    ast::Chain,
    config::ParseMode,
    error::{NestingParseError, ParserError},
    lexer::{Lexer, Spanned, Token},
};
use lalrpop_util::lalrpop_mod;

lalrpop_mod!(grammar);

use self::grammar::NestingParser;

#[inline]
pub fn parse(input: &str, mode: ParseMode) -> Result<Chain, NestingParseError> {
    match mode {
        ParseMode::Strict => parse_strict(input),
        ParseMode::Lenient => parse_lenient(input),
    }
}

#[inline]
pub fn parse_strict(input: &str) -> Result<Chain, NestingParseError> {
    NestingParser::new().parse(Lexer::new(input))
}

/// Parse after dropping the unmatched closing brackets and closing whatever is left open at the
/// end of the input.
pub fn parse_lenient(input: &str) -> Result<Chain, NestingParseError> {
    let tokens = Lexer::new(input)
        .collect::<Result<Vec<_>, ParserError>>()
        .map_err(|error| NestingParseError::User { error })?;
    NestingParser::new().parse(balance(tokens, input.len()))
}

fn balance(
    tokens: Vec<(usize, Token, usize)>,
    end: usize,
) -> Vec<Spanned<Token, usize, ParserError>> {
    let mut depth = 0usize;
    let mut balanced = Vec::with_capacity(tokens.len());
    for (start, token, stop) in tokens {
        match token {
            Token::LeftParenthesis => depth += 1,
            Token::RightParenthesis if depth == 0 => {
                tracing::warn!(position = start, "dropping unmatched `)` from nesting");
                continue;
            }
            Token::RightParenthesis => depth -= 1,
            _ => {}
        }
        balanced.push(Ok((start, token, stop)));
    }

    if depth > 0 {
        tracing::warn!(missing = depth, "closing unterminated groups of nesting");
    }
    balanced.extend((0..depth).map(|_| Ok((end, Token::RightParenthesis, end))));
    balanced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ast::Term, expression::Operator, lexer::LexicalError};

    #[test]
    fn return_an_error_on_empty_input() {
        assert!(parse_strict("").is_err());
    }

    #[test]
    fn return_an_error_on_empty_brackets() {
        assert!(parse_strict("()").is_err());
    }

    #[test]
    fn return_an_error_on_invalid_input() {
        assert!(parse_strict(")(invalid-").is_err());
    }

    #[test]
    fn return_a_user_error_on_lexical_failures() {
        let parsed = parse_strict("(criteria[0] xor criteria[1])");

        assert!(matches!(
            parsed,
            Err(NestingParseError::User {
                error: ParserError::Lexical(LexicalError::InvalidToken)
            })
        ));
    }

    #[test]
    fn can_parse_true() {
        let parsed = parse_strict("True");

        assert_eq!(Ok(Chain::new(Term::True, vec![])), parsed);
    }

    #[test]
    fn can_parse_a_single_criteria_group() {
        let parsed = parse_strict("(criteria[0])");

        assert_eq!(
            Ok(Chain::new(
                Term::Group(Chain::new(Term::Criteria(0), vec![])),
                vec![]
            )),
            parsed
        );
    }

    #[test]
    fn can_parse_a_nested_group() {
        let parsed = parse_strict("(criteria[0] and (criteria[1] or criteria[2]))");

        let inner = Chain::new(
            Term::Criteria(1),
            vec![(Operator::Or, Term::Criteria(2))],
        );
        let outer = Chain::new(
            Term::Criteria(0),
            vec![(Operator::And, Term::Group(inner))],
        );
        assert_eq!(Ok(Chain::new(Term::Group(outer), vec![])), parsed);
    }

    #[test]
    fn can_parse_top_level_groups_joined_by_a_connective() {
        let parsed = parse_strict("(criteria[0] and criteria[1]) or (criteria[2])");

        let first = Chain::new(
            Term::Criteria(0),
            vec![(Operator::And, Term::Criteria(1))],
        );
        let second = Chain::new(Term::Criteria(2), vec![]);
        assert_eq!(
            Ok(Chain::new(
                Term::Group(first),
                vec![(Operator::Or, Term::Group(second))]
            )),
            parsed
        );
    }

    #[test]
    fn can_parse_bare_criteria_at_the_top_level() {
        let parsed = parse_strict("criteria[0] or criteria[1]");

        assert_eq!(
            Ok(Chain::new(
                Term::Criteria(0),
                vec![(Operator::Or, Term::Criteria(1))]
            )),
            parsed
        );
    }

    #[test]
    fn can_parse_true_inside_a_group() {
        let parsed = parse_strict("(criteria[0] and (True))");

        let empty = Chain::new(Term::True, vec![]);
        let outer = Chain::new(
            Term::Criteria(0),
            vec![(Operator::And, Term::Group(empty))],
        );
        assert_eq!(Ok(Chain::new(Term::Group(outer), vec![])), parsed);
    }

    #[test]
    fn can_parse_the_legacy_double_brackets() {
        let parsed = parse_strict("(criteria[0] and ((criteria[1] or criteria[2])))");

        assert!(parsed.is_ok());
    }

    #[test]
    fn return_an_error_on_a_missing_closing_bracket() {
        let parsed = parse_strict("(criteria[0] and criteria[1]");

        assert!(matches!(
            parsed,
            Err(NestingParseError::UnrecognizedEof { .. })
        ));
    }

    #[test]
    fn return_an_error_on_a_dangling_connective() {
        assert!(parse_strict("(criteria[0] and)").is_err());
        assert!(parse_strict("and (criteria[0])").is_err());
    }

    #[test]
    fn lenient_parsing_closes_unterminated_groups() {
        let parsed = parse_lenient("(criteria[0] and (criteria[1] or criteria[2]");

        assert_eq!(
            parse_strict("(criteria[0] and (criteria[1] or criteria[2]))"),
            parsed
        );
    }

    #[test]
    fn lenient_parsing_drops_unmatched_closing_brackets() {
        let parsed = parse_lenient("(criteria[0])) or (criteria[1]))");

        assert_eq!(parse_strict("(criteria[0]) or (criteria[1])"), parsed);
    }

    #[test]
    fn lenient_parsing_still_fails_on_lexical_errors() {
        let parsed = parse_lenient("(criteria[0] && criteria[1]");

        assert!(matches!(parsed, Err(NestingParseError::User { .. })));
    }

    #[test]
    fn lenient_parsing_still_fails_on_dangling_connectives() {
        assert!(parse_lenient("(criteria[0] or").is_err());
    }

    #[test]
    fn dispatch_on_the_parse_mode() {
        let input = "(criteria[0]";

        assert!(parse(input, ParseMode::Strict).is_err());
        assert!(parse(input, ParseMode::Lenient).is_ok());
    }
}

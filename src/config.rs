use crate::expression::{Group, Operator};
use serde::{Deserialize, Serialize};

/// How nesting strings are parsed back into trees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    /// Reject anything that does not follow the nesting grammar.
    #[default]
    Strict,
    /// Repair unbalanced brackets, ignore unknown criteria and keep the first connective of a
    /// group that mixes `and` and `or`.
    Lenient,
}

/// The connective written between the top-level groups of a trigger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connective {
    /// Use the operator of the last top-level group.
    ///
    /// This is what the event controller has always received, even though the operators of the
    /// other top-level groups are ignored for that purpose.
    #[default]
    LastElement,
    /// Always use the given operator.
    Fixed(Operator),
}

impl Connective {
    pub fn resolve(&self, elements: &[Group]) -> Operator {
        match self {
            Self::LastElement => elements
                .last()
                .map(Group::operator)
                .unwrap_or_default(),
            Self::Fixed(operator) => *operator,
        }
    }
}

/// Options shared by the encoding and the decoding of event maps.
///
/// ```rust
/// use ago_trigger::{CodecOptions, Connective, Operator, ParseMode};
///
/// let options: CodecOptions =
///     serde_json::from_str(r#"{"connective": {"fixed": "or"}, "parse_mode": "lenient"}"#).unwrap();
/// assert_eq!(Connective::Fixed(Operator::Or), options.connective);
/// assert_eq!(ParseMode::Lenient, options.parse_mode);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    pub connective: Connective,
    pub parse_mode: ParseMode,
}

impl CodecOptions {
    pub fn lenient() -> Self {
        Self {
            parse_mode: ParseMode::Lenient,
            ..Self::default()
        }
    }

    pub fn with_connective(self, connective: Connective) -> Self {
        Self { connective, ..self }
    }
}

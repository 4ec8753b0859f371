//! Build, store and read back the conditions of home-automation event triggers.
//!
//! A trigger fires an [`ActionSpec`] when an event of a given type is raised and its criteria
//! hold. Its criteria are edited as a tree of `and`/`or` [`Group`]s whose leaves are
//! [`Criterion`]s. The event controller stores that tree flattened into an [`EventMap`]: the
//! criteria numbered from 0 and a nesting string that refers to them.
//!
//! # Examples
//!
//! ```
//! use ago_trigger::{
//!     ActionSpec, CodecOptions, Comparator, Editor, Operator, SegmentWidget, SourceKind,
//! };
//!
//! let mut editor = Editor::new("event.device.statechanged");
//! editor.add_segment(&[0], SegmentWidget {
//!     source: Some(SourceKind::Event),
//!     parameter: Some("level".to_owned()),
//!     comparator: Some(Comparator::Gt),
//!     value: "50".to_owned(),
//!     ..SegmentWidget::default()
//! }).unwrap();
//! let nested = editor.add_group(&[0], Operator::Or).unwrap();
//! for mode in ["away", "vacation"] {
//!     editor.add_segment(&nested, SegmentWidget {
//!         source: Some(SourceKind::Variable),
//!         variable: Some("mode".to_owned()),
//!         value: mode.to_owned(),
//!         ..SegmentWidget::default()
//!     }).unwrap();
//! }
//!
//! let trigger = editor.trigger(ActionSpec::new("on", "siren"));
//! let map = trigger.encode(&CodecOptions::default());
//! assert_eq!("(criteria[0] and (criteria[1] or criteria[2]))", map.nesting);
//! assert_eq!(3, map.criteria.len());
//!
//! // And back
//! assert_eq!(Ok(trigger), map.decode(&CodecOptions::default()));
//! ```
//!
//! # Nesting strings
//!
//! The nesting string follows this grammar:
//!
//! ```text
//! expr    := "True" | group (("and"|"or") group)*
//! group   := "(" term (("and"|"or") term)* ")"
//! term    := "criteria[" INTEGER "]" | "True" | group
//! ```
//!
//! Every top-level group is written in brackets and the groups are joined by the operator of the
//! last one (see [`Connective`]). An empty group is written `(True)` and a trigger without any
//! criterion is just `True`.
//!
//! Nesting strings written by older consoles are not always well formed. They are rejected by
//! default; [`ParseMode::Lenient`] reads them on a best-effort basis instead.
mod action;
mod ast;
mod builder;
mod config;
mod criteria;
mod decoder;
mod editor;
mod error;
mod evaluation;
mod expression;
mod lexer;
mod parser;
mod rpc;
mod schema;
mod serializer;
#[cfg(test)]
mod test_utils;
mod trigger;

pub use crate::{
    action::{ActionError, ActionField, ActionForm, ActionSpec},
    builder::{
        build_elements, build_group, GroupWidget, SegmentWidget, SourceKind, Widget,
        DEFAULT_DEVICE_PARAMETER,
    },
    config::{CodecOptions, Connective, ParseMode},
    criteria::{Comparator, CriteriaStore, Criterion, CriterionRecord, Param},
    decoder::{parse_elements, parse_elements_with, parse_nesting, CriteriaMap},
    editor::{Editor, EditorError},
    error::{NestingError, NestingParseError, ParserError},
    evaluation::{evaluate_elements, Snapshot, SnapshotBuilder},
    expression::{ExpressionNode, Group, Operator},
    lexer::{LexicalError, Token},
    rpc::{GetEventReply, Request, RpcError, SetEventReply},
    schema::{
        action_targets, events, CommandSchema, Device, DeviceTypeSchema, EventSchema,
        ParameterSchema, Schema, EVENT_DEVICE_TYPE,
    },
    serializer::{serialize, serialize_into, Serialized, ALWAYS},
    trigger::{EventMap, EventTrigger},
};

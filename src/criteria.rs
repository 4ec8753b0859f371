use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use slab::Slab;
use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
};

/// One comparison between a runtime value and a literal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Criterion {
    path: String,
    param: Param,
    comp: Comparator,
    #[serde(deserialize_with = "raw_text")]
    value: String,
}

/// Where the runtime value of a [`Criterion`] comes from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Param {
    /// A field of the event that fired the trigger.
    Event { parameter: String },
    /// A value reported by a device.
    Device { uuid: String, parameter: String },
    /// A global variable.
    Variable { name: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparator {
    Eq,
    #[serde(alias = "new", alias = "neq")]
    Ne,
    Gt,
    Lt,
    Gte,
    Lte,
}

impl Criterion {
    pub fn new(
        path: impl Into<String>,
        param: Param,
        comp: Comparator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            param,
            comp,
            value: value.into(),
        }
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    pub fn param(&self) -> &Param {
        &self.param
    }

    #[inline]
    pub fn comparator(&self) -> Comparator {
        self.comp
    }

    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The wire form of the criterion; its path travels once for the whole event map.
    pub fn to_record(&self) -> CriterionRecord {
        CriterionRecord {
            lval: self.param.clone(),
            comp: self.comp,
            rval: self.value.clone(),
        }
    }
}

impl Display for Criterion {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{} {} {:?}", self.param, self.comp, self.value)
    }
}

impl Param {
    pub fn event(parameter: impl Into<String>) -> Self {
        Self::Event {
            parameter: parameter.into(),
        }
    }

    pub fn device(uuid: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self::Device {
            uuid: uuid.into(),
            parameter: parameter.into(),
        }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable { name: name.into() }
    }
}

impl Display for Param {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Event { parameter } => write!(formatter, "event.{parameter}"),
            Self::Device { uuid, parameter } => write!(formatter, "device({uuid}).{parameter}"),
            Self::Variable { name } => write!(formatter, "variable.{name}"),
        }
    }
}

impl Display for Comparator {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Gte => ">=",
            Self::Lte => "<=",
        };
        formatter.write_str(symbol)
    }
}

/// A criterion as the event controller stores it: `{"lval": ..., "comp": ..., "rval": ...}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionRecord {
    pub lval: Param,
    pub comp: Comparator,
    #[serde(deserialize_with = "raw_text")]
    pub rval: String,
}

impl CriterionRecord {
    pub fn into_criterion(self, path: &str) -> Criterion {
        Criterion::new(path, self.lval, self.comp, self.rval)
    }
}

/// Criteria numbered in the order they are allocated, starting at 0.
///
/// The indices only mean something for the nesting string produced alongside the store; they are
/// handed out again from 0 after [`CriteriaStore::clear()`].
#[derive(Clone, Debug, Default)]
pub struct CriteriaStore {
    criteria: Slab<Criterion>,
}

impl CriteriaStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn allocate(&mut self, criterion: Criterion) -> usize {
        self.criteria.insert(criterion)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.criteria.clear();
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Criterion> {
        self.criteria.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Criterion)> {
        self.criteria.iter()
    }

    pub fn to_records(&self) -> BTreeMap<usize, CriterionRecord> {
        self.iter()
            .map(|(index, criterion)| (index, criterion.to_record()))
            .collect()
    }
}

/// Accept any JSON scalar and keep its text; the event controller does not always quote numbers.
pub(crate) fn raw_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    scalar_text(Value::deserialize(deserializer)?).map_err(D::Error::custom)
}

pub(crate) fn scalar_text(value: Value) -> Result<String, String> {
    match value {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(format!("expected a scalar value, found {other}")),
    }
}

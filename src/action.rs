use crate::{
    criteria::scalar_text,
    schema::{Device, Schema},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("action has no {0:?} field")]
    MissingField(&'static str),
    #[error("action field {field:?} is invalid: {reason}")]
    InvalidField { field: String, reason: String },
    #[error("device type {devicetype:?} has no command {command:?}")]
    UnknownCommand { devicetype: String, command: String },
    #[error("command has no parameter {0:?}")]
    UnknownParameter(String),
    #[error("{value:?} is not a choice of parameter {parameter:?}")]
    InvalidOption { parameter: String, value: String },
}

/// The command sent to a device when a trigger fires.
///
/// On the wire the parameters sit beside `command` and `uuid`:
/// `{"command": "setlevel", "uuid": "...", "level": "50"}`. Their values are kept as text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, Value>")]
pub struct ActionSpec {
    pub command: String,
    pub uuid: String,
    #[serde(flatten)]
    pub parameters: BTreeMap<String, String>,
}

impl ActionSpec {
    pub fn new(command: impl Into<String>, uuid: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            uuid: uuid.into(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }
}

impl TryFrom<BTreeMap<String, Value>> for ActionSpec {
    type Error = ActionError;

    fn try_from(mut fields: BTreeMap<String, Value>) -> Result<Self, Self::Error> {
        let mut take = |field: &'static str| -> Result<String, ActionError> {
            let value = fields.remove(field).ok_or(ActionError::MissingField(field))?;
            scalar_text(value).map_err(|reason| ActionError::InvalidField {
                field: field.to_owned(),
                reason,
            })
        };
        let command = take("command")?;
        let uuid = take("uuid")?;
        let parameters = fields
            .into_iter()
            .map(|(field, value)| match scalar_text(value) {
                Ok(text) => Ok((field, text)),
                Err(reason) => Err(ActionError::InvalidField { field, reason }),
            })
            .collect::<Result<_, _>>()?;
        Ok(Self {
            command,
            uuid,
            parameters,
        })
    }
}

/// One input of the action form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionField {
    pub parameter: String,
    pub label: String,
    /// Allowed values; empty for a free text input.
    pub choices: Vec<String>,
    pub value: String,
}

/// The inputs of one command of one device.
///
/// Every parameter the command declares gets a field. A field with choices starts on the first
/// one, a free text field starts empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionForm {
    uuid: String,
    command: String,
    fields: Vec<ActionField>,
}

impl ActionForm {
    pub fn new(schema: &Schema, device: &Device, command: &str) -> Result<Self, ActionError> {
        let Some((_, declared)) = schema
            .commands_of(&device.devicetype)
            .find(|(name, _)| *name == command)
        else {
            return Err(ActionError::UnknownCommand {
                devicetype: device.devicetype.clone(),
                command: command.to_owned(),
            });
        };

        let fields = declared
            .parameters
            .iter()
            .map(|(parameter, declared)| {
                let choices = if declared.is_option() {
                    declared.options.clone()
                } else {
                    Vec::new()
                };
                ActionField {
                    parameter: parameter.clone(),
                    label: declared.name.clone(),
                    value: choices.first().cloned().unwrap_or_default(),
                    choices,
                }
            })
            .collect();

        Ok(Self {
            uuid: device.uuid.clone(),
            command: command.to_owned(),
            fields,
        })
    }

    /// Fill the fields with the values of an existing action, skipping those that no longer fit.
    pub fn with_defaults(mut self, defaults: &ActionSpec) -> Self {
        for (parameter, value) in &defaults.parameters {
            if let Err(error) = self.set(parameter, value.clone()) {
                tracing::debug!(%error, "ignoring a stored action parameter");
            }
        }
        self
    }

    #[inline]
    pub fn fields(&self) -> &[ActionField] {
        &self.fields
    }

    pub fn set(&mut self, parameter: &str, value: impl Into<String>) -> Result<(), ActionError> {
        let value = value.into();
        let field = self
            .fields
            .iter_mut()
            .find(|field| field.parameter == parameter)
            .ok_or_else(|| ActionError::UnknownParameter(parameter.to_owned()))?;
        if !field.choices.is_empty() && !field.choices.contains(&value) {
            return Err(ActionError::InvalidOption {
                parameter: parameter.to_owned(),
                value,
            });
        }
        field.value = value;
        Ok(())
    }

    /// The action described by the form, one parameter per field.
    pub fn build(&self) -> ActionSpec {
        ActionSpec {
            command: self.command.clone(),
            uuid: self.uuid.clone(),
            parameters: self
                .fields
                .iter()
                .map(|field| (field.parameter.clone(), field.value.clone()))
                .collect(),
        }
    }
}

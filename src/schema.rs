//! What the backend declares about events, device types and commands, and the devices it knows.
use crate::builder::DEFAULT_DEVICE_PARAMETER;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The device type of the triggers themselves.
pub const EVENT_DEVICE_TYPE: &str = "event";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub events: BTreeMap<String, EventSchema>,
    #[serde(default)]
    pub devicetypes: BTreeMap<String, DeviceTypeSchema>,
    #[serde(default)]
    pub commands: BTreeMap<String, CommandSchema>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSchema {
    #[serde(default)]
    pub description: Option<String>,
    /// Parameters carried by the event, as offered to event criteria.
    #[serde(default)]
    pub parameters: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceTypeSchema {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub commands: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSchema {
    pub name: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, ParameterSchema>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Label of the parameter.
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
}

impl ParameterSchema {
    /// Whether the value must be one of [`ParameterSchema::options`].
    pub fn is_option(&self) -> bool {
        self.kind.as_deref() == Some("option")
    }
}

impl Schema {
    pub fn event(&self, path: &str) -> Option<&EventSchema> {
        self.events.get(path)
    }

    pub fn command(&self, command: &str) -> Option<&CommandSchema> {
        self.commands.get(command)
    }

    /// The commands a device type declares, in declaration order, skipping the undeclared ones.
    pub fn commands_of<'a>(
        &'a self,
        devicetype: &str,
    ) -> impl Iterator<Item = (&'a str, &'a CommandSchema)> + 'a {
        self.devicetypes
            .get(devicetype)
            .into_iter()
            .flat_map(|devicetype| devicetype.commands.iter())
            .filter_map(move |command| {
                let schema = self.commands.get(command);
                if schema.is_none() {
                    tracing::debug!(%command, "device type declares an unknown command");
                }
                Some((command.as_str(), schema?))
            })
    }

    /// Whether a device of this type can be the target of an action.
    pub fn is_actionable(&self, devicetype: &str) -> bool {
        self.devicetypes
            .get(devicetype)
            .is_some_and(|devicetype| !devicetype.commands.is_empty())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub room: Option<String>,
    pub devicetype: String,
    /// Last values reported by the device, by parameter.
    #[serde(default)]
    pub values: BTreeMap<String, Value>,
}

impl Device {
    /// `room - name`, or just the name for a device without a room.
    pub fn display_name(&self) -> String {
        match self.room.as_deref().filter(|room| !room.is_empty()) {
            Some(room) => format!("{room} - {}", self.name),
            None => self.name.clone(),
        }
    }

    /// Parameters offered to device criteria, `state` first.
    pub fn parameters(&self) -> Vec<&str> {
        std::iter::once(DEFAULT_DEVICE_PARAMETER)
            .chain(
                self.values
                    .keys()
                    .map(String::as_str)
                    .filter(|key| *key != DEFAULT_DEVICE_PARAMETER),
            )
            .collect()
    }
}

/// Devices that can be the target of an action: named ones whose type declares a command.
pub fn action_targets<'a>(schema: &Schema, devices: &'a [Device]) -> Vec<&'a Device> {
    devices
        .iter()
        .filter(|device| !device.name.is_empty() && schema.is_actionable(&device.devicetype))
        .collect()
}

/// The stored triggers, sorted by name.
pub fn events(devices: &[Device]) -> Vec<&Device> {
    let mut events = devices
        .iter()
        .filter(|device| device.devicetype == EVENT_DEVICE_TYPE)
        .collect::<Vec<_>>();
    events.sort_by(|left, right| left.name.cmp(&right.name));
    events
}

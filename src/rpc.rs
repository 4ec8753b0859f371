//! Payloads exchanged with the event controller and the device registry.
use crate::trigger::EventMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    #[error("an event needs a name")]
    EmptyName,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum Request {
    /// Fetch the map of a stored trigger.
    GetEvent { uuid: String, event: String },
    /// Store a trigger; without `event` a new one is created.
    SetEvent {
        uuid: String,
        eventmap: EventMap,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        event: Option<String>,
    },
    DelEvent { uuid: String, event: String },
    /// Rename a device, triggers included.
    SetDeviceName {
        uuid: String,
        device: String,
        name: String,
    },
}

impl Request {
    pub fn get_event(controller: impl Into<String>, event: impl Into<String>) -> Self {
        Self::GetEvent {
            uuid: controller.into(),
            event: event.into(),
        }
    }

    pub fn create_event(controller: impl Into<String>, eventmap: EventMap) -> Self {
        Self::SetEvent {
            uuid: controller.into(),
            eventmap,
            event: None,
        }
    }

    pub fn update_event(
        controller: impl Into<String>,
        event: impl Into<String>,
        eventmap: EventMap,
    ) -> Self {
        Self::SetEvent {
            uuid: controller.into(),
            eventmap,
            event: Some(event.into()),
        }
    }

    pub fn delete_event(controller: impl Into<String>, event: impl Into<String>) -> Self {
        Self::DelEvent {
            uuid: controller.into(),
            event: event.into(),
        }
    }

    /// Name a device; surrounding blanks are dropped and a blank name is refused.
    pub fn set_device_name(
        controller: impl Into<String>,
        device: impl Into<String>,
        name: &str,
    ) -> Result<Self, RpcError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RpcError::EmptyName);
        }
        Ok(Self::SetDeviceName {
            uuid: controller.into(),
            device: device.into(),
            name: name.to_owned(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetEventReply {
    pub eventmap: EventMap,
}

/// The reply to `setevent`: the id of the stored trigger, if it was stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetEventReply {
    #[serde(default)]
    pub event: Option<String>,
}

impl SetEventReply {
    /// The request naming a newly created trigger.
    pub fn name_request(
        &self,
        registry: impl Into<String>,
        name: &str,
    ) -> Option<Result<Request, RpcError>> {
        let event = self.event.as_deref()?;
        Some(Request::set_device_name(registry, event, name))
    }
}

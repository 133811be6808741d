//! JSON messages exchanged with the Stream Deck application.

use promdeck_types::{ButtonId, Coordinates, Settings};
use serde::{Deserialize, Serialize};

/// Render to both the hardware key and the on-screen canvas.
pub const TARGET_ALL: u8 = 0;

/// Events the host sends to the plugin.
///
/// Anything other than the three lifecycle events is accepted and ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum InboundEvent {
    WillAppear(ActionEvent),
    DidReceiveSettings(ActionEvent),
    WillDisappear(ActionEvent),
    #[serde(other)]
    Unknown,
}

impl InboundEvent {
    pub fn name(&self) -> &'static str {
        match self {
            InboundEvent::WillAppear(_) => "willAppear",
            InboundEvent::DidReceiveSettings(_) => "didReceiveSettings",
            InboundEvent::WillDisappear(_) => "willDisappear",
            InboundEvent::Unknown => "unknown",
        }
    }

    /// The action payload, for the events that carry one.
    pub fn action_event(&self) -> Option<&ActionEvent> {
        match self {
            InboundEvent::WillAppear(e)
            | InboundEvent::DidReceiveSettings(e)
            | InboundEvent::WillDisappear(e) => Some(e),
            InboundEvent::Unknown => None,
        }
    }
}

/// An event addressed to one action instance.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionEvent {
    pub action: String,
    pub context: String,
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default)]
    pub payload: ActionPayload,
}

impl ActionEvent {
    /// Identity of the button slot this event is about.
    ///
    /// Keys on the grid are identified by position. Entries without one
    /// (inside a multi-action) fall back to the host context.
    pub fn button_id(&self) -> ButtonId {
        match self.payload.coordinates {
            Some(coordinates) => ButtonId::from(coordinates),
            None => ButtonId::new(self.context.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPayload {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub is_in_multi_action: bool,
}

/// First frame on a new connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Registration {
    pub event: String,
    pub uuid: String,
}

/// Frames the plugin sends to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum OutboundMessage {
    SetImage { context: String, payload: ImagePayload },
    SetTitle { context: String, payload: TitlePayload },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImagePayload {
    pub image: String,
    pub target: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitlePayload {
    pub title: String,
    pub target: u8,
}

impl OutboundMessage {
    pub fn set_image(context: &str, image: String) -> Self {
        OutboundMessage::SetImage {
            context: context.to_string(),
            payload: ImagePayload {
                image,
                target: TARGET_ALL,
            },
        }
    }

    pub fn set_title(context: &str, title: &str) -> Self {
        OutboundMessage::SetTitle {
            context: context.to_string(),
            payload: TitlePayload {
                title: title.to_string(),
                target: TARGET_ALL,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_will_appear() {
        let raw = json!({
            "event": "willAppear",
            "action": "dev.promdeck.stat",
            "context": "ABC123",
            "device": "D1",
            "payload": {
                "settings": {
                    "prometheusEndpoint": "http://prom:9090",
                    "prometheusUsername": "grafana",
                    "prometheusPassword": "secret",
                    "prometheusQuery": "up",
                    "threshold": "5,10"
                },
                "coordinates": { "column": 3, "row": 1 },
                "isInMultiAction": false
            }
        });

        let event: InboundEvent = serde_json::from_value(raw).unwrap();
        let InboundEvent::WillAppear(action) = &event else {
            panic!("expected willAppear, got {event:?}");
        };
        assert_eq!(action.context, "ABC123");
        assert_eq!(action.payload.settings.query, "up");
        assert_eq!(action.payload.settings.threshold.as_deref(), Some("5,10"));
        assert_eq!(action.button_id().as_str(), "1:3");
        assert_eq!(event.name(), "willAppear");
    }

    #[test]
    fn multi_action_entry_falls_back_to_context() {
        let raw = json!({
            "event": "didReceiveSettings",
            "action": "dev.promdeck.stat",
            "context": "CTX9",
            "payload": { "settings": {}, "isInMultiAction": true }
        });

        let event: InboundEvent = serde_json::from_value(raw).unwrap();
        let action = event.action_event().unwrap();
        assert!(action.payload.is_in_multi_action);
        assert_eq!(action.button_id().as_str(), "CTX9");
        assert!(!action.payload.settings.is_complete());
    }

    #[test]
    fn missing_payload_defaults() {
        let raw = r#"{"event":"willDisappear","action":"a","context":"c"}"#;
        let event: InboundEvent = serde_json::from_str(raw).unwrap();
        let action = event.action_event().unwrap();
        assert_eq!(action.payload, ActionPayload::default());
    }

    #[test]
    fn unknown_events_are_tolerated() {
        let raw = json!({
            "event": "keyDown",
            "action": "dev.promdeck.stat",
            "context": "c",
            "payload": { "state": 0 }
        });
        let event: InboundEvent = serde_json::from_value(raw).unwrap();
        assert_eq!(event, InboundEvent::Unknown);
        assert!(event.action_event().is_none());

        let event: InboundEvent =
            serde_json::from_str(r#"{"event":"deviceDidConnect","device":"D1"}"#).unwrap();
        assert_eq!(event, InboundEvent::Unknown);
    }

    #[test]
    fn outbound_frames_match_host_format() {
        let image = serde_json::to_value(OutboundMessage::set_image("ctx", "data:x".into())).unwrap();
        assert_eq!(
            image,
            json!({
                "event": "setImage",
                "context": "ctx",
                "payload": { "image": "data:x", "target": 0 }
            })
        );

        let title = serde_json::to_value(OutboundMessage::set_title("ctx", "12.3")).unwrap();
        assert_eq!(
            title,
            json!({
                "event": "setTitle",
                "context": "ctx",
                "payload": { "title": "12.3", "target": 0 }
            })
        );
    }

    #[test]
    fn registration_frame() {
        let frame = Registration {
            event: "registerPlugin".to_string(),
            uuid: "UUID-1".to_string(),
        };
        assert_eq!(
            serde_json::to_value(frame).unwrap(),
            json!({ "event": "registerPlugin", "uuid": "UUID-1" })
        );
    }
}

//! JS callbacks registered by the host page.
//!
//! Calls are collected while the runner is borrowed and dispatched after
//! the borrow ends, so a callback may safely call back into the exports.
//! Exceptions thrown by a callback are logged and swallowed.

use galaxy_engine::{MapEvent, SoundEvent};
use js_sys::Function;
use log::warn;
use wasm_bindgen::JsValue;

/// One pending call into the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    PointClick { id: String, json: String },
    Sound(u32),
    Notification { message: String, visible: bool },
}

impl HostCall {
    /// Host-facing calls for a tick's worth of map output. Events the host
    /// reads from the shared buffer instead are skipped.
    pub fn collect(events: &[MapEvent], sounds: &[SoundEvent]) -> Vec<HostCall> {
        let mut calls = Vec::new();
        for event in events {
            match event {
                MapEvent::PointClicked { point, .. } => match serde_json::to_string(point) {
                    Ok(json) => calls.push(HostCall::PointClick { id: point.id.clone(), json }),
                    Err(e) => warn!("Point {} not serializable: {}", point.id, e),
                },
                MapEvent::NotificationShown { message } => calls.push(HostCall::Notification {
                    message: message.clone(),
                    visible: true,
                }),
                MapEvent::NotificationDismissed => calls.push(HostCall::Notification {
                    message: String::new(),
                    visible: false,
                }),
                _ => {}
            }
        }
        calls.extend(sounds.iter().map(|s| HostCall::Sound(s.0)));
        calls
    }
}

#[derive(Default, Clone)]
pub struct HostCallbacks {
    pub on_point_click: Option<Function>,
    pub on_sound: Option<Function>,
    pub on_notification: Option<Function>,
}

impl HostCallbacks {
    pub fn dispatch(&self, calls: &[HostCall]) {
        for call in calls {
            let result = match call {
                HostCall::PointClick { id, json } => self.on_point_click.as_ref().map(|f| {
                    f.call2(&JsValue::NULL, &JsValue::from_str(id), &JsValue::from_str(json))
                }),
                HostCall::Sound(id) => self
                    .on_sound
                    .as_ref()
                    .map(|f| f.call1(&JsValue::NULL, &JsValue::from(*id))),
                HostCall::Notification { message, visible } => {
                    self.on_notification.as_ref().map(|f| {
                        f.call2(&JsValue::NULL, &JsValue::from_str(message), &JsValue::from_bool(*visible))
                    })
                }
            };
            if let Some(Err(e)) = result {
                warn!("Host callback failed for {:?}: {:?}", call, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_engine::default_points;
    use galaxy_engine::glam::Vec2;

    #[test]
    fn collects_clicks_notifications_and_sounds() {
        let point = default_points().remove(0);
        let events = vec![
            MapEvent::Moved { position: Vec2::ZERO, heading: 0.0 },
            MapEvent::PointClicked { index: 0, point: point.clone() },
            MapEvent::NotificationShown { message: "hi".into() },
            MapEvent::FlashChanged { on: true },
        ];
        let calls = HostCall::collect(&events, &[SoundEvent::COLLISION]);
        assert_eq!(calls.len(), 3);
        match &calls[0] {
            HostCall::PointClick { id, json } => {
                assert_eq!(id, &point.id);
                assert!(json.contains("\"type\""));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(calls[2], HostCall::Sound(3));
    }
}

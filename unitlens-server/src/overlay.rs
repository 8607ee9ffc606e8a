//! Inline overlay sink
//!
//! Tracks which view currently shows hints so they can be replaced or
//! cleared, and hands back the `hints/decorations` notifications the editor
//! renders. An empty decoration list clears the view.

use crate::protocol::Notification;
use serde::Serialize;
use serde_json::json;
use unitlens::InlineHint;
use unitlens_core::Position;

pub const DECORATIONS_METHOD: &str = "hints/decorations";

/// Rendering hint for the editor: muted, italic, slightly detached
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecorationStyle {
    pub color: &'static str,
    pub font_style: &'static str,
    pub margin: &'static str,
}

pub const TRAILING_HINT: DecorationStyle = DecorationStyle {
    color: "disabledForeground",
    font_style: "italic",
    margin: "0 0 0 4px",
};

/// Zero-width trailing decoration at `position`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decoration {
    pub position: Position,
    pub text: String,
    pub converter: &'static str,
    pub style: DecorationStyle,
}

impl From<InlineHint> for Decoration {
    fn from(hint: InlineHint) -> Self {
        Self {
            position: hint.position,
            text: hint.text,
            converter: hint.converter,
            style: TRAILING_HINT,
        }
    }
}

#[derive(Debug, Default)]
pub struct Overlay {
    current: Option<String>,
    released: bool,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Replace the hints shown for `uri`. Switching views clears the
    /// previous one first so no stale hints stay behind.
    pub fn publish(&mut self, uri: &str, hints: Vec<InlineHint>) -> Vec<Notification> {
        if self.released {
            return Vec::new();
        }

        let mut out = Vec::new();
        if let Some(previous) = self.current.take() {
            if previous != uri {
                out.push(decorations(&previous, Vec::new()));
            }
        }

        let decorations_for_uri: Vec<Decoration> = hints.into_iter().map(Decoration::from).collect();
        out.push(decorations(uri, decorations_for_uri));
        self.current = Some(uri.to_string());
        out
    }

    /// Clear the active view and stop publishing. Only the first call
    /// yields a notification.
    pub fn release(&mut self) -> Option<Notification> {
        if self.released {
            return None;
        }
        self.released = true;
        self.current
            .take()
            .map(|uri| decorations(&uri, Vec::new()))
    }
}

fn decorations(uri: &str, decorations: Vec<Decoration>) -> Notification {
    Notification::new(
        DECORATIONS_METHOD,
        json!({ "uri": uri, "decorations": decorations }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hint(character: u32) -> InlineHint {
        InlineHint {
            position: Position::new(0, character),
            text: " // 1rem".to_string(),
            converter: "pxToRem",
        }
    }

    #[test]
    fn test_publish_replaces_same_view() {
        let mut overlay = Overlay::new();
        let first = overlay.publish("file:///a.json", vec![hint(7)]);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].params["decorations"][0]["position"]["character"], 7);
        assert_eq!(first[0].params["decorations"][0]["style"]["fontStyle"], "italic");

        let second = overlay.publish("file:///a.json", Vec::new());
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].params["decorations"], json!([]));
    }

    #[test]
    fn test_switching_view_clears_previous() {
        let mut overlay = Overlay::new();
        overlay.publish("file:///a.json", vec![hint(7)]);
        let out = overlay.publish("file:///b.json", vec![hint(3)]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].params["uri"], "file:///a.json");
        assert_eq!(out[0].params["decorations"], json!([]));
        assert_eq!(out[1].params["uri"], "file:///b.json");
        assert_eq!(overlay.current(), Some("file:///b.json"));
    }

    #[test]
    fn test_release_once() {
        let mut overlay = Overlay::new();
        overlay.publish("file:///a.json", vec![hint(7)]);

        let cleared = overlay.release().unwrap();
        assert_eq!(cleared.method, DECORATIONS_METHOD);
        assert_eq!(cleared.params["decorations"], json!([]));

        assert!(overlay.release().is_none());
        assert!(overlay.is_released());
        assert!(overlay.publish("file:///a.json", vec![hint(1)]).is_empty());
    }

    #[test]
    fn test_release_without_view() {
        let mut overlay = Overlay::new();
        assert!(overlay.release().is_none());
        assert!(overlay.is_released());
    }
}

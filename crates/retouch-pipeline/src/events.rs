//! Input events delivered by the front end.
//!
//! Events are plain serde data so a front end can record a session and a
//! headless driver can replay it through [`Session::handle`].
//!
//! ```json
//! [
//!   { "event": "toggle", "toggle": "grayscale" },
//!   { "event": "morphology", "op": "erode" },
//!   { "event": "set_parameter", "parameter": { "kernel_size": 5 } },
//!   { "event": "pointer_press", "x": 10, "y": 10 },
//!   { "event": "pointer_release", "x": 50, "y": 50 }
//! ]
//! ```
//!
//! [`Session::handle`]: crate::Session::handle

use serde::{Deserialize, Serialize};

use crate::selection::SourceRect;
use crate::types::{MorphOp, Parameter, Toggle};

/// A discrete user action.
///
/// Pointer coordinates are in input-preview pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A toggle button was pressed.
    Toggle { toggle: Toggle },
    /// An erode or dilate button was pressed.
    Morphology { op: MorphOp },
    /// A slider or checkbox changed.
    SetParameter { parameter: Parameter },
    PointerPress { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerRelease { x: f64, y: f64 },
    /// Set the region directly in source pixels.
    SetRegion { region: SourceRect },
    /// Return to the full source image.
    ClearRegion,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_documented_script() {
        let json = r#"[
            { "event": "toggle", "toggle": "grayscale" },
            { "event": "morphology", "op": "erode" },
            { "event": "set_parameter", "parameter": { "kernel_size": 5 } },
            { "event": "pointer_press", "x": 10, "y": 10 },
            { "event": "pointer_release", "x": 50.5, "y": 50 },
            { "event": "clear_region" }
        ]"#;
        let events: Vec<SessionEvent> = serde_json::from_str(json).unwrap();
        assert_eq!(
            events,
            vec![
                SessionEvent::Toggle {
                    toggle: Toggle::Grayscale
                },
                SessionEvent::Morphology { op: MorphOp::Erode },
                SessionEvent::SetParameter {
                    parameter: Parameter::KernelSize(5)
                },
                SessionEvent::PointerPress { x: 10.0, y: 10.0 },
                SessionEvent::PointerRelease { x: 50.5, y: 50.0 },
                SessionEvent::ClearRegion,
            ],
        );
    }

    #[test]
    fn set_region_round_trip() {
        let event = SessionEvent::SetRegion {
            region: SourceRect::from_corners((1, 2), (3, 4)),
        };
        let json = serde_json::to_string(&event).unwrap();
        let deserialized: SessionEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deserialized);
    }

    #[test]
    fn unknown_event_rejected() {
        let result = serde_json::from_str::<SessionEvent>(r#"{ "event": "undo" }"#);
        assert!(result.is_err());
    }
}

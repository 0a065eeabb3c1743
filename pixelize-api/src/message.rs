//! Message envelopes exchanged between the two controllers.
//!
//! Each direction is a closed, tagged set: the tag travels as a `"type"`
//! field in kebab-case, payload fields in camelCase. Decoding an envelope
//! with an unknown tag is an error; dispatchers log and drop it rather than
//! fail (the transport may outlive any one plugin version).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{FillDescriptor, SelectionSnapshot, ShapeId};

/// Messages emitted by the host-side controller to the panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HostEvent {
    /// The host application theme changed.
    Theme { content: String },

    /// The selection changed. `None` means no single object is selected.
    Selection {
        content: Option<SelectionSnapshot>,
    },

    /// Raster export for the current selection started or finished.
    #[serde(rename_all = "camelCase")]
    SelectionLoading { is_loading: bool },

    /// The raster export finished for the named selection.
    #[serde(rename_all = "camelCase")]
    SelectionLoaded {
        image_data: Vec<u8>,
        width: u32,
        height: u32,
        selection_id: ShapeId,
    },

    /// A fill upload requested by the panel completed on the host.
    FillUploadComplete,

    /// A host-side export or upload failed; carries a user-facing string.
    ExportError { error: String },
}

/// Requests emitted by the panel to the host-side controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum UiRequest {
    /// Upload a processed raster and attach it to the document: as the
    /// selection's top fill, or as the sole fill of a new shape when
    /// `add_new_layer` is set. `original_fill` is the background fill used
    /// as the style template for the new one.
    #[serde(rename_all = "camelCase")]
    UpdateImageFill {
        image_data: Vec<u8>,
        original_fill: FillDescriptor,
        should_delete_first: bool,
        add_new_layer: bool,
    },

    /// Drop the top (first) fill of the selection.
    DeleteTopLayer,
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub fn encode_event(event: &HostEvent) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(event)?)
}

pub fn decode_event(raw: &str) -> Result<HostEvent, ProtocolError> {
    Ok(serde_json::from_str(raw)?)
}

pub fn encode_request(request: &UiRequest) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(request)?)
}

pub fn decode_request(raw: &str) -> Result<UiRequest, ProtocolError> {
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Fills;

    #[test]
    fn test_event_tags_are_kebab_case() {
        let cases = [
            (
                HostEvent::Theme {
                    content: "dark".to_string(),
                },
                "theme",
            ),
            (HostEvent::Selection { content: None }, "selection"),
            (
                HostEvent::SelectionLoading { is_loading: true },
                "selection-loading",
            ),
            (HostEvent::FillUploadComplete, "fill-upload-complete"),
            (
                HostEvent::ExportError {
                    error: "nope".to_string(),
                },
                "export-error",
            ),
        ];
        for (event, tag) in cases {
            let value: serde_json::Value =
                serde_json::from_str(&encode_event(&event).unwrap()).unwrap();
            assert_eq!(value["type"], tag);
        }
    }

    #[test]
    fn test_selection_loaded_fields_are_camel_case() {
        let event = HostEvent::SelectionLoaded {
            image_data: vec![1, 2, 3],
            width: 4,
            height: 5,
            selection_id: ShapeId::from("shape-1"),
        };
        let value: serde_json::Value =
            serde_json::from_str(&encode_event(&event).unwrap()).unwrap();
        assert_eq!(value["type"], "selection-loaded");
        assert_eq!(value["imageData"], serde_json::json!([1, 2, 3]));
        assert_eq!(value["width"], 4);
        assert_eq!(value["selectionId"], "shape-1");
    }

    #[test]
    fn test_selection_with_mixed_fills_roundtrip() {
        let event = HostEvent::Selection {
            content: Some(SelectionSnapshot {
                id: ShapeId::from("g-7"),
                name: "Group".to_string(),
                fills: Fills::Mixed,
            }),
        };
        let raw = encode_event(&event).unwrap();
        assert!(raw.contains("\"mixed\""));
        assert_eq!(decode_event(&raw).unwrap(), event);
    }

    #[test]
    fn test_update_image_fill_roundtrip() {
        let request = UiRequest::UpdateImageFill {
            image_data: vec![9, 8, 7],
            original_fill: FillDescriptor {
                fill_color: Some("#121212".to_string()),
                fill_opacity: Some(0.5),
                fill_image: None,
            },
            should_delete_first: true,
            add_new_layer: false,
        };
        let raw = encode_request(&request).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["type"], "update-image-fill");
        assert_eq!(value["shouldDeleteFirst"], true);
        assert_eq!(value["addNewLayer"], false);
        assert_eq!(decode_request(&raw).unwrap(), request);
    }

    #[test]
    fn test_unknown_tag_is_an_error() {
        assert!(decode_event(r#"{"type":"resize-viewport","content":1}"#).is_err());
        assert!(decode_request(r#"{"type":"clear-all-layers"}"#).is_err());
    }

    #[test]
    fn test_null_selection_roundtrip() {
        let raw = r#"{"type":"selection","content":null}"#;
        assert_eq!(
            decode_event(raw).unwrap(),
            HostEvent::Selection { content: None }
        );
    }
}

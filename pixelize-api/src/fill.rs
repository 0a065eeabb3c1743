//! Fill descriptors - the paint entries attached to a shape.
//!
//! A selection's fills are either a concrete ordered list or the host's
//! "mixed" sentinel (a multi-object group with heterogeneous fills). The
//! sentinel gets its own variant so downstream code can never iterate it by
//! accident; on the wire it stays the literal string `"mixed"`.

use std::fmt;

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const MIXED_SENTINEL: &str = "mixed";

/// One paint entry of a shape. Only the style fields the plugin reads or
/// carries over are modeled; absent fields stay absent on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_image: Option<MediaRef>,
}

impl FillDescriptor {
    /// Template spread: keep this descriptor's style, point it at an
    /// uploaded image. Used to build the pixelated fill from the background
    /// fill it replaces or stacks on.
    pub fn with_image(&self, image: MediaRef) -> FillDescriptor {
        FillDescriptor {
            fill_image: Some(image),
            ..self.clone()
        }
    }
}

/// Reference to uploaded media, usable as a fill image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRef {
    pub id: String,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtype: Option<String>,
}

/// The fills of a selection: a concrete list, or the mixed sentinel.
#[derive(Debug, Clone, PartialEq)]
pub enum Fills {
    Uniform(Vec<FillDescriptor>),
    Mixed,
}

impl Fills {
    pub fn as_uniform(&self) -> Option<&[FillDescriptor]> {
        match self {
            Fills::Uniform(fills) => Some(fills),
            Fills::Mixed => None,
        }
    }

    /// The last (bottom/background) fill, used as the style template.
    pub fn last(&self) -> Option<&FillDescriptor> {
        self.as_uniform().and_then(|fills| fills.last())
    }

    /// Number of fill layers; a mixed selection counts as zero.
    pub fn layer_count(&self) -> usize {
        self.as_uniform().map_or(0, |fills| fills.len())
    }

    /// Whether the selection can be pixelated: a concrete, non-empty list.
    pub fn is_processable(&self) -> bool {
        self.layer_count() > 0
    }
}

impl Serialize for Fills {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Fills::Uniform(fills) => fills.serialize(serializer),
            Fills::Mixed => serializer.serialize_str(MIXED_SENTINEL),
        }
    }
}

impl<'de> Deserialize<'de> for Fills {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FillsVisitor;

        impl<'de> Visitor<'de> for FillsVisitor {
            type Value = Fills;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a fill list or the string \"mixed\"")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Fills, E> {
                if value == MIXED_SENTINEL {
                    Ok(Fills::Mixed)
                } else {
                    Err(E::invalid_value(de::Unexpected::Str(value), &self))
                }
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Fills, A::Error> {
                let mut fills = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(fill) = seq.next_element()? {
                    fills.push(fill);
                }
                Ok(Fills::Uniform(fills))
            }
        }

        deserializer.deserialize_any(FillsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(hex: &str) -> FillDescriptor {
        FillDescriptor {
            fill_color: Some(hex.to_string()),
            fill_opacity: Some(1.0),
            fill_image: None,
        }
    }

    #[test]
    fn test_mixed_sentinel_roundtrip() {
        let json = serde_json::to_string(&Fills::Mixed).unwrap();
        assert_eq!(json, "\"mixed\"");
        let back: Fills = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Fills::Mixed);
    }

    #[test]
    fn test_uniform_roundtrip() {
        let fills = Fills::Uniform(vec![color("#112233"), color("#445566")]);
        let json = serde_json::to_string(&fills).unwrap();
        let back: Fills = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fills);
    }

    #[test]
    fn test_unexpected_string_rejected() {
        assert!(serde_json::from_str::<Fills>("\"heterogeneous\"").is_err());
    }

    #[test]
    fn test_mixed_is_not_processable() {
        assert!(!Fills::Mixed.is_processable());
        assert_eq!(Fills::Mixed.layer_count(), 0);
        assert!(Fills::Mixed.last().is_none());
    }

    #[test]
    fn test_empty_uniform_is_not_processable() {
        assert!(!Fills::Uniform(Vec::new()).is_processable());
        assert!(Fills::Uniform(vec![color("#000000")]).is_processable());
    }

    #[test]
    fn test_with_image_keeps_style() {
        let template = color("#abcdef");
        let media = MediaRef {
            id: "m1".to_string(),
            width: 10,
            height: 20,
            name: Some("pixelized-image".to_string()),
            mtype: Some("image/png".to_string()),
        };
        let fill = template.with_image(media.clone());
        assert_eq!(fill.fill_color.as_deref(), Some("#abcdef"));
        assert_eq!(fill.fill_opacity, Some(1.0));
        assert_eq!(fill.fill_image, Some(media));
    }

    #[test]
    fn test_absent_fields_stay_absent() {
        let json = serde_json::to_string(&color("#010203")).unwrap();
        assert!(!json.contains("fillImage"));
        assert!(json.contains("fillColor"));
    }
}

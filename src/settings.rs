//! Typed construction settings.
//!
//! Every recognized key is a field; unrecognized keys are dropped when
//! deserializing. Ad-level keys are snake_case, attribute keys of creatives,
//! media files and icons use the VAST camelCase spelling.

use serde::Deserialize;

use crate::models::{AdParameters, Pricing, Resource};

/// Default VAST schema version of new documents
pub const DEFAULT_VERSION: &str = "3.0";

/// Document-level settings
#[derive(Debug, Deserialize, PartialEq, Clone)]
#[serde(default)]
pub struct VastSettings {
    /// The VAST version attribute of the root element
    pub version: String,

    /// Error URI emitted when the document carries no ads
    pub vast_error_uri: Option<String>,
}

impl Default for VastSettings {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            vast_error_uri: None,
        }
    }
}

/// Settings of a single Ad
#[derive(Debug, Deserialize, PartialEq, Clone, Default)]
#[serde(default)]
pub struct AdSettings {
    pub id: Option<String>,

    /// "wrapper" (any case) selects a Wrapper ad, anything else an InLine ad
    pub structure: Option<String>,

    pub ad_system: Option<String>,
    pub ad_title: Option<String>,
    pub vast_ad_tag_uri: Option<String>,
    pub sequence: Option<u32>,
    pub error: Option<String>,
    pub description: Option<String>,
    pub advertiser: Option<String>,
    pub pricing: Option<Pricing>,
}

/// Settings of a Creative
#[derive(Debug, Deserialize, PartialEq, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CreativeSettings {
    pub id: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub expanded_width: Option<u32>,
    pub expanded_height: Option<u32>,
    pub scalable: Option<bool>,
    pub maintain_aspect_ratio: Option<bool>,
    pub min_suggested_duration: Option<String>,
    pub api_framework: Option<String>,

    /// Required for Linear creatives
    pub duration: Option<String>,

    pub skipoffset: Option<String>,
    pub ad_parameters: Option<AdParameters>,
}

/// Settings of a MediaFile; `type`, `width`, `height` and `delivery` are required
#[derive(Debug, Deserialize, PartialEq, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct MediaFileSettings {
    #[serde(rename = "type")]
    pub mime_type: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub delivery: Option<String>,
    pub id: Option<String>,
    pub bitrate: Option<u32>,
    pub min_bitrate: Option<u32>,
    pub max_bitrate: Option<u32>,
    pub scalable: Option<bool>,
    pub codec: Option<String>,
    pub api_framework: Option<String>,
    pub maintain_aspect_ratio: Option<bool>,
}

/// Settings of an Icon
#[derive(Debug, Deserialize, PartialEq, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct IconSettings {
    pub program: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub x_position: Option<String>,
    pub y_position: Option<String>,
    pub duration: Option<String>,
    pub offset: Option<String>,
    pub api_framework: Option<String>,
    pub resource: Option<Resource>,
    pub click_through: Option<String>,
    pub click_tracking: Option<String>,
    pub view_tracking: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vast_settings_default_version() {
        let settings: VastSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.version, "3.0");
        assert!(settings.vast_error_uri.is_none());
    }

    #[test]
    fn test_unrecognized_keys_are_ignored() {
        let settings: AdSettings = serde_json::from_str(
            r#"{"id": "1", "ad_system": "sys", "ad_title": "t", "colour": "blue"}"#,
        )
        .unwrap();
        assert_eq!(settings.id.as_deref(), Some("1"));
        assert_eq!(settings.ad_title.as_deref(), Some("t"));
    }

    #[test]
    fn test_camel_case_attribute_keys() {
        let settings: MediaFileSettings = serde_json::from_str(
            r#"{"type": "video/mp4", "width": 640, "height": 360, "delivery": "progressive", "minBitrate": 300, "maintainAspectRatio": true}"#,
        )
        .unwrap();
        assert_eq!(settings.mime_type.as_deref(), Some("video/mp4"));
        assert_eq!(settings.min_bitrate, Some(300));
        assert_eq!(settings.maintain_aspect_ratio, Some(true));

        let settings: CreativeSettings = serde_json::from_str(
            r#"{"duration": "00:00:15", "expandedWidth": 600, "adParameters": {"data": "x", "xmlEncoded": false}}"#,
        )
        .unwrap();
        assert_eq!(settings.expanded_width, Some(600));
        assert_eq!(settings.ad_parameters.unwrap().xml_encoded, Some(false));
    }
}

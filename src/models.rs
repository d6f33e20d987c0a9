use serde::{Deserialize, Serialize};

use crate::error::{Result, VastError};
use crate::settings::{IconSettings, MediaFileSettings};

/// An ordered list of XML attributes, emitted in declaration order
pub type Attributes = Vec<(&'static str, String)>;

/// Represents a tracking event fired when the player reaches a playback milestone
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct TrackingEvent {
    /// The event type (e.g., "start", "firstQuartile", "midpoint", "thirdQuartile", "complete", etc.)
    pub event: String,

    /// The tracking URL
    pub url: String,

    /// The playback offset for "progress" events (e.g., "00:00:05" or "10%")
    #[serde(default)]
    pub offset: Option<String>,
}

impl TrackingEvent {
    pub fn new(event: impl Into<String>, url: impl Into<String>, offset: Option<String>) -> Self {
        Self {
            event: event.into(),
            url: url.into(),
            offset,
        }
    }

    pub(crate) fn attributes(&self) -> Attributes {
        let mut attributes = vec![("event", self.event.clone())];
        if let Some(offset) = &self.offset {
            attributes.push(("offset", offset.clone()));
        }
        attributes
    }
}

/// Represents a media file of a linear creative
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct MediaFile {
    /// The media file URL
    pub url: String,

    /// The media file MIME type
    pub mime_type: String,

    /// The media file width
    pub width: u32,

    /// The media file height
    pub height: u32,

    /// The media file delivery type (progressive or streaming)
    pub delivery: String,

    pub id: Option<String>,
    pub bitrate: Option<u32>,
    pub min_bitrate: Option<u32>,
    pub max_bitrate: Option<u32>,
    pub scalable: Option<bool>,
    pub codec: Option<String>,
    pub api_framework: Option<String>,
    pub maintain_aspect_ratio: Option<bool>,
}

impl MediaFile {
    /// Build a media file, failing on the first absent required attribute
    /// (checked in the order type, width, height, delivery)
    pub fn new(url: impl Into<String>, settings: MediaFileSettings) -> Result<Self> {
        let mime_type = settings.mime_type.ok_or_else(|| missing("type"))?;
        let width = settings.width.ok_or_else(|| missing("width"))?;
        let height = settings.height.ok_or_else(|| missing("height"))?;
        let delivery = settings.delivery.ok_or_else(|| missing("delivery"))?;

        Ok(Self {
            url: url.into(),
            mime_type,
            width,
            height,
            delivery,
            id: settings.id,
            bitrate: settings.bitrate,
            min_bitrate: settings.min_bitrate,
            max_bitrate: settings.max_bitrate,
            scalable: settings.scalable,
            codec: settings.codec,
            api_framework: settings.api_framework,
            maintain_aspect_ratio: settings.maintain_aspect_ratio,
        })
    }

    pub(crate) fn attributes(&self) -> Attributes {
        let mut attributes = vec![
            ("type", self.mime_type.clone()),
            ("width", self.width.to_string()),
            ("height", self.height.to_string()),
            ("delivery", self.delivery.clone()),
        ];
        push_opt(&mut attributes, "id", &self.id);
        push_opt(&mut attributes, "bitrate", &self.bitrate);
        push_opt(&mut attributes, "minBitrate", &self.min_bitrate);
        push_opt(&mut attributes, "maxBitrate", &self.max_bitrate);
        push_opt(&mut attributes, "scalable", &self.scalable);
        push_opt(&mut attributes, "codec", &self.codec);
        push_opt(&mut attributes, "apiFramework", &self.api_framework);
        push_opt(&mut attributes, "maintainAspectRatio", &self.maintain_aspect_ratio);
        attributes
    }
}

fn missing(name: &str) -> VastError {
    VastError::MissingField(name.to_string())
}

/// Represents a creative resource (StaticResource, IFrameResource or HTMLResource)
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// The resource element name
    #[serde(rename = "type")]
    pub resource_type: String,

    /// The resource URI or HTML content
    pub uri: String,

    /// The resource MIME type (e.g., "image/png")
    #[serde(default)]
    pub creative_type: Option<String>,
}

impl Resource {
    pub fn new(resource_type: impl Into<String>, uri: impl Into<String>, creative_type: Option<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            uri: uri.into(),
            creative_type,
        }
    }

    pub(crate) fn attributes(&self) -> Attributes {
        let mut attributes = Vec::new();
        push_opt(&mut attributes, "creativeType", &self.creative_type);
        attributes
    }
}

/// Represents a non-linear click (the element name is the click type)
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Click {
    pub click_type: String,
    pub uri: String,
}

/// Represents an icon overlay (e.g., AdChoices) on a linear creative
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Icon {
    pub program: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub x_position: Option<String>,
    pub y_position: Option<String>,
    pub duration: Option<String>,
    pub offset: Option<String>,
    pub api_framework: Option<String>,

    /// The icon resource
    pub resource: Option<Resource>,

    /// The icon click-through URL
    pub click_through: Option<String>,

    /// The icon click tracking URL
    pub click_tracking: Option<String>,

    /// The icon view tracking URL
    pub view_tracking: Option<String>,
}

impl Icon {
    pub fn new(settings: IconSettings) -> Self {
        Self {
            program: settings.program,
            width: settings.width,
            height: settings.height,
            x_position: settings.x_position,
            y_position: settings.y_position,
            duration: settings.duration,
            offset: settings.offset,
            api_framework: settings.api_framework,
            resource: settings.resource,
            click_through: settings.click_through,
            click_tracking: settings.click_tracking,
            view_tracking: settings.view_tracking,
        }
    }

    pub fn set_resource(
        &mut self,
        resource_type: impl Into<String>,
        uri: impl Into<String>,
        creative_type: Option<&str>,
    ) -> &mut Self {
        self.resource = Some(Resource::new(resource_type, uri, creative_type.map(str::to_string)));
        self
    }

    pub fn set_click_through(&mut self, url: impl Into<String>) -> &mut Self {
        self.click_through = Some(url.into());
        self
    }

    pub fn set_click_tracking(&mut self, url: impl Into<String>) -> &mut Self {
        self.click_tracking = Some(url.into());
        self
    }

    pub fn set_view_tracking(&mut self, url: impl Into<String>) -> &mut Self {
        self.view_tracking = Some(url.into());
        self
    }

    pub(crate) fn attributes(&self) -> Attributes {
        let mut attributes = Vec::new();
        push_opt(&mut attributes, "program", &self.program);
        push_opt(&mut attributes, "width", &self.width);
        push_opt(&mut attributes, "height", &self.height);
        push_opt(&mut attributes, "xPosition", &self.x_position);
        push_opt(&mut attributes, "yPosition", &self.y_position);
        push_opt(&mut attributes, "duration", &self.duration);
        push_opt(&mut attributes, "offset", &self.offset);
        push_opt(&mut attributes, "apiFramework", &self.api_framework);
        attributes
    }
}

/// Represents an impression tracking URL
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Impression {
    /// The impression tracking URL
    pub url: String,

    /// The impression ID
    #[serde(default)]
    pub id: Option<String>,
}

impl Impression {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), id: None }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Represents a survey URL
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Survey {
    pub url: String,

    /// The survey MIME type
    #[serde(default, rename = "type")]
    pub survey_type: Option<String>,
}

/// Represents pricing information
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Pricing {
    /// The pricing model (e.g., "CPM", "CPC", etc.)
    pub model: String,

    /// The pricing currency (e.g., "USD", "EUR", etc.)
    pub currency: String,

    /// The price value
    pub value: String,
}

/// Represents an extension carrying a raw XML fragment
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Extension {
    /// The extension type
    #[serde(default, rename = "type")]
    pub extension_type: Option<String>,

    /// The raw XML fragment, inlined as the child of the Extension element
    pub xml: String,
}

/// Represents the AdParameters payload of a creative
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AdParameters {
    pub data: String,

    #[serde(default)]
    pub xml_encoded: Option<bool>,
}

pub(crate) fn push_opt<T: ToString>(attributes: &mut Attributes, name: &'static str, value: &Option<T>) {
    if let Some(value) = value {
        attributes.push((name, value.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_settings() -> MediaFileSettings {
        MediaFileSettings {
            mime_type: Some("video/mp4".to_string()),
            width: Some(640),
            height: Some(360),
            delivery: Some("progressive".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_media_file_requires_delivery() {
        let settings = MediaFileSettings {
            delivery: None,
            ..complete_settings()
        };
        let err = MediaFile::new("http://x/a.mp4", settings).unwrap_err();
        assert!(matches!(err, VastError::MissingField(ref name) if name == "delivery"));
    }

    #[test]
    fn test_media_file_reports_first_missing_attribute() {
        let err = MediaFile::new("http://x/a.mp4", MediaFileSettings::default()).unwrap_err();
        assert!(matches!(err, VastError::MissingField(ref name) if name == "type"));
    }

    #[test]
    fn test_media_file_attribute_order() {
        let settings = MediaFileSettings {
            bitrate: Some(800),
            codec: Some("H.264".to_string()),
            ..complete_settings()
        };
        let media = MediaFile::new("http://x/a.mp4", settings).unwrap();
        let names: Vec<&str> = media.attributes().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["type", "width", "height", "delivery", "bitrate", "codec"]);
    }

    #[test]
    fn test_tracking_event_offset_attribute() {
        let event = TrackingEvent::new("progress", "http://t/p", Some("00:00:05".to_string()));
        assert_eq!(
            event.attributes(),
            vec![("event", "progress".to_string()), ("offset", "00:00:05".to_string())]
        );
        let event = TrackingEvent::new("start", "http://t/s", None);
        assert_eq!(event.attributes().len(), 1);
    }

    #[test]
    fn test_icon_setters() {
        let mut icon = Icon::new(IconSettings {
            program: Some("AdChoices".to_string()),
            ..Default::default()
        });
        icon.set_resource("StaticResource", "http://i/icon.png", Some("image/png"))
            .set_click_through("http://i/click");
        assert_eq!(icon.resource.as_ref().unwrap().creative_type.as_deref(), Some("image/png"));
        assert_eq!(icon.click_through.as_deref(), Some("http://i/click"));
        assert_eq!(icon.attributes(), vec![("program", "AdChoices".to_string())]);
    }
}

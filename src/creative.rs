use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, VastError};
use crate::models::{
    push_opt, AdParameters, Attributes, Click, Icon, MediaFile, Resource, TrackingEvent,
};
use crate::settings::{CreativeSettings, IconSettings, MediaFileSettings};

/// Click type used when `attach_click` is given none
pub const DEFAULT_CLICK_TYPE: &str = "NonLinearClickThrough";

/// The kind of a creative
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub enum CreativeType {
    Linear,
    NonLinear,
    CompanionAds,
}

impl CreativeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreativeType::Linear => "Linear",
            CreativeType::NonLinear => "NonLinear",
            CreativeType::CompanionAds => "CompanionAds",
        }
    }
}

impl FromStr for CreativeType {
    type Err = VastError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Linear" => Ok(CreativeType::Linear),
            "NonLinear" => Ok(CreativeType::NonLinear),
            "CompanionAds" => Ok(CreativeType::CompanionAds),
            other => Err(VastError::InvalidCreativeType(other.to_string())),
        }
    }
}

impl fmt::Display for CreativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of a video click; doubles as the element name
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub enum VideoClickType {
    ClickThrough,
    ClickTracking,
    CustomClick,
}

impl VideoClickType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoClickType::ClickThrough => "ClickThrough",
            VideoClickType::ClickTracking => "ClickTracking",
            VideoClickType::CustomClick => "CustomClick",
        }
    }
}

impl FromStr for VideoClickType {
    type Err = VastError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ClickThrough" => Ok(VideoClickType::ClickThrough),
            "ClickTracking" => Ok(VideoClickType::ClickTracking),
            "CustomClick" => Ok(VideoClickType::CustomClick),
            other => Err(VastError::InvalidClickType(other.to_string())),
        }
    }
}

/// Represents a video click-through, click-tracking or custom click URL
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct VideoClick {
    pub click_type: VideoClickType,
    pub url: String,
    pub id: Option<String>,
}

/// Creative attributes, emitted on the NonLinear and Companion elements
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct CreativeAttributes {
    pub id: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub expanded_width: Option<u32>,
    pub expanded_height: Option<u32>,
    pub scalable: Option<bool>,
    pub maintain_aspect_ratio: Option<bool>,
    pub min_suggested_duration: Option<String>,
    pub api_framework: Option<String>,
}

impl CreativeAttributes {
    pub(crate) fn to_attributes(&self) -> Attributes {
        let mut attributes = Vec::new();
        push_opt(&mut attributes, "id", &self.id);
        push_opt(&mut attributes, "width", &self.width);
        push_opt(&mut attributes, "height", &self.height);
        push_opt(&mut attributes, "expandedWidth", &self.expanded_width);
        push_opt(&mut attributes, "expandedHeight", &self.expanded_height);
        push_opt(&mut attributes, "scalable", &self.scalable);
        push_opt(&mut attributes, "maintainAspectRatio", &self.maintain_aspect_ratio);
        push_opt(&mut attributes, "minSuggestedDuration", &self.min_suggested_duration);
        push_opt(&mut attributes, "apiFramework", &self.api_framework);
        attributes
    }
}

/// A renderable ad unit attached to an Ad.
///
/// Every `attach_*` call appends in call order; the serialized document
/// preserves that order within each list.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct Creative {
    creative_type: CreativeType,
    attributes: CreativeAttributes,
    duration: Option<String>,
    skipoffset: Option<String>,
    ad_parameters: Option<AdParameters>,
    media_files: Vec<MediaFile>,
    tracking_events: Vec<TrackingEvent>,
    video_clicks: Vec<VideoClick>,
    click_throughs: Vec<String>,
    clicks: Vec<Click>,
    resources: Vec<Resource>,
    icons: Vec<Icon>,
    non_linear_click_tracking: Option<String>,
}

impl Creative {
    /// Create a creative from its type name ("Linear", "NonLinear" or "CompanionAds")
    pub fn new(creative_type: &str, settings: CreativeSettings) -> Result<Self> {
        Self::with_type(creative_type.parse()?, settings)
    }

    pub fn with_type(creative_type: CreativeType, settings: CreativeSettings) -> Result<Self> {
        if creative_type == CreativeType::Linear && settings.duration.is_none() {
            return Err(VastError::MissingDuration);
        }

        Ok(Self {
            creative_type,
            attributes: CreativeAttributes {
                id: settings.id,
                width: settings.width,
                height: settings.height,
                expanded_width: settings.expanded_width,
                expanded_height: settings.expanded_height,
                scalable: settings.scalable,
                maintain_aspect_ratio: settings.maintain_aspect_ratio,
                min_suggested_duration: settings.min_suggested_duration,
                api_framework: settings.api_framework,
            },
            duration: settings.duration,
            skipoffset: settings.skipoffset,
            ad_parameters: settings.ad_parameters,
            media_files: Vec::new(),
            tracking_events: Vec::new(),
            video_clicks: Vec::new(),
            click_throughs: Vec::new(),
            clicks: Vec::new(),
            resources: Vec::new(),
            icons: Vec::new(),
            non_linear_click_tracking: None,
        })
    }

    pub fn attach_media_file(&mut self, url: impl Into<String>, settings: MediaFileSettings) -> Result<&mut Self> {
        let media_file = MediaFile::new(url, settings)?;
        debug!("Attaching media file {} to {} creative", media_file.url, self.creative_type);
        self.media_files.push(media_file);
        Ok(self)
    }

    /// Event types are not checked against the VAST vocabulary
    pub fn attach_tracking_event(
        &mut self,
        event: impl Into<String>,
        url: impl Into<String>,
        offset: Option<&str>,
    ) -> &mut Self {
        self.tracking_events
            .push(TrackingEvent::new(event, url, offset.map(str::to_string)));
        self
    }

    pub fn attach_video_click(&mut self, click_type: &str, url: impl Into<String>, id: Option<&str>) -> Result<&mut Self> {
        let click_type = click_type.parse()?;
        self.video_clicks.push(VideoClick {
            click_type,
            url: url.into(),
            id: id.map(str::to_string),
        });
        Ok(self)
    }

    pub fn attach_click_through(&mut self, url: impl Into<String>) -> &mut Self {
        self.click_throughs.push(url.into());
        self
    }

    pub fn attach_click(&mut self, uri: impl Into<String>, click_type: Option<&str>) -> &mut Self {
        self.clicks.push(Click {
            click_type: click_type.unwrap_or(DEFAULT_CLICK_TYPE).to_string(),
            uri: uri.into(),
        });
        self
    }

    pub fn attach_resource(
        &mut self,
        resource_type: impl Into<String>,
        uri: impl Into<String>,
        creative_type: Option<&str>,
    ) -> &mut Self {
        self.resources
            .push(Resource::new(resource_type, uri, creative_type.map(str::to_string)));
        self
    }

    /// Attach an icon and return it for further configuration
    pub fn attach_icon(&mut self, settings: IconSettings) -> &mut Icon {
        self.icons.push(Icon::new(settings));
        let index = self.icons.len() - 1;
        &mut self.icons[index]
    }

    /// Replace the AdParameters payload; the last call wins
    pub fn set_ad_parameters(&mut self, data: impl Into<String>, xml_encoded: bool) -> &mut Self {
        self.ad_parameters = Some(AdParameters {
            data: data.into(),
            xml_encoded: Some(xml_encoded),
        });
        self
    }

    pub fn attach_non_linear_click_tracking(&mut self, url: impl Into<String>) -> &mut Self {
        self.non_linear_click_tracking = Some(url.into());
        self
    }

    pub fn icon_mut(&mut self, index: usize) -> Option<&mut Icon> {
        self.icons.get_mut(index)
    }

    pub fn creative_type(&self) -> CreativeType {
        self.creative_type
    }

    pub fn attributes(&self) -> &CreativeAttributes {
        &self.attributes
    }

    pub fn duration(&self) -> Option<&str> {
        self.duration.as_deref()
    }

    pub fn skipoffset(&self) -> Option<&str> {
        self.skipoffset.as_deref()
    }

    pub fn ad_parameters(&self) -> Option<&AdParameters> {
        self.ad_parameters.as_ref()
    }

    pub fn media_files(&self) -> &[MediaFile] {
        &self.media_files
    }

    pub fn tracking_events(&self) -> &[TrackingEvent] {
        &self.tracking_events
    }

    pub fn video_clicks(&self) -> &[VideoClick] {
        &self.video_clicks
    }

    pub fn click_throughs(&self) -> &[String] {
        &self.click_throughs
    }

    pub fn clicks(&self) -> &[Click] {
        &self.clicks
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn icons(&self) -> &[Icon] {
        &self.icons
    }

    pub fn non_linear_click_tracking(&self) -> Option<&str> {
        self.non_linear_click_tracking.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear() -> Creative {
        Creative::new(
            "Linear",
            CreativeSettings {
                duration: Some("00:00:15".to_string()),
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_creative_type() {
        let err = Creative::new("Banner", CreativeSettings::default()).unwrap_err();
        assert!(matches!(err, VastError::InvalidCreativeType(ref t) if t == "Banner"));
    }

    #[test]
    fn test_linear_requires_duration() {
        let err = Creative::new("Linear", CreativeSettings::default()).unwrap_err();
        assert!(matches!(err, VastError::MissingDuration));
        assert_eq!(linear().duration(), Some("00:00:15"));
    }

    #[test]
    fn test_non_linear_without_duration() {
        let creative = Creative::new("NonLinear", CreativeSettings::default()).unwrap();
        assert_eq!(creative.creative_type(), CreativeType::NonLinear);
        assert!(creative.duration().is_none());
    }

    #[test]
    fn test_attributes_copied_from_settings() {
        let creative = Creative::new(
            "CompanionAds",
            CreativeSettings {
                id: Some("c1".to_string()),
                width: Some(300),
                height: Some(250),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(
            creative.attributes().to_attributes(),
            vec![
                ("id", "c1".to_string()),
                ("width", "300".to_string()),
                ("height", "250".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_video_click_type() {
        let mut creative = linear();
        let err = creative
            .attach_video_click("ClickAway", "http://c", None)
            .unwrap_err();
        assert!(matches!(err, VastError::InvalidClickType(ref t) if t == "ClickAway"));
        assert!(creative.video_clicks().is_empty());
    }

    #[test]
    fn test_tracking_events_keep_attach_order() {
        let mut creative = linear();
        creative
            .attach_tracking_event("complete", "http://t/complete", None)
            .attach_tracking_event("start", "http://t/start", None)
            .attach_tracking_event("vendorSpecific", "http://t/vendor", Some("5%"));
        let events: Vec<&str> = creative
            .tracking_events()
            .iter()
            .map(|e| e.event.as_str())
            .collect();
        assert_eq!(events, vec!["complete", "start", "vendorSpecific"]);
    }

    #[test]
    fn test_ad_parameters_last_write_wins() {
        let mut creative = linear();
        creative
            .set_ad_parameters("first", false)
            .set_ad_parameters("second", true);
        let params = creative.ad_parameters().unwrap();
        assert_eq!(params.data, "second");
        assert_eq!(params.xml_encoded, Some(true));
    }

    #[test]
    fn test_attach_click_defaults_type_and_appends() {
        let mut creative = Creative::new("NonLinear", CreativeSettings::default()).unwrap();
        creative
            .attach_click("http://c/1", None)
            .attach_click("http://c/2", Some("NonLinearClickTracking"));
        assert_eq!(creative.clicks().len(), 2);
        assert_eq!(creative.clicks()[0].click_type, DEFAULT_CLICK_TYPE);
        assert_eq!(creative.clicks()[1].click_type, "NonLinearClickTracking");
    }

    #[test]
    fn test_attach_icon_returns_live_icon() {
        let mut creative = linear();
        creative
            .attach_icon(IconSettings::default())
            .set_view_tracking("http://i/view");
        assert_eq!(creative.icons()[0].view_tracking.as_deref(), Some("http://i/view"));
        assert!(creative.icon_mut(1).is_none());
    }
}

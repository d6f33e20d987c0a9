use log::debug;
use serde::Serialize;

use crate::creative::Creative;
use crate::error::{Result, VastError};
use crate::models::{Extension, Impression, Pricing, Survey};
use crate::settings::{AdSettings, CreativeSettings};

/// Whether an Ad carries its creative payload or redirects to another VAST tag
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
pub enum AdStructure {
    InLine,
    Wrapper,
}

impl AdStructure {
    /// "wrapper" in any case selects a Wrapper; anything else, including no value, is InLine
    pub fn from_setting(structure: Option<&str>) -> Self {
        match structure {
            Some(s) if s.eq_ignore_ascii_case("wrapper") => AdStructure::Wrapper,
            _ => AdStructure::InLine,
        }
    }
}

/// Represents an Ad within a VAST document
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct Ad {
    id: String,
    structure: AdStructure,
    ad_system: String,
    ad_title: Option<String>,
    vast_ad_tag_uri: Option<String>,
    sequence: Option<u32>,
    error: Option<String>,
    description: Option<String>,
    advertiser: Option<String>,
    pricing: Option<Pricing>,
    impressions: Vec<Impression>,
    surveys: Vec<Survey>,
    creatives: Vec<Creative>,
    extensions: Vec<Extension>,
}

impl Ad {
    /// Create an Ad, checking the required settings of its structure in order:
    /// `id`, `ad_system`, then `ad_title` (InLine) or `vast_ad_tag_uri` (Wrapper)
    pub fn new(settings: AdSettings) -> Result<Self> {
        let structure = AdStructure::from_setting(settings.structure.as_deref());

        let id = required(settings.id, "id")?;
        let ad_system = required(settings.ad_system, "ad_system")?;
        let (ad_title, vast_ad_tag_uri) = match structure {
            AdStructure::InLine => (Some(required(settings.ad_title, "ad_title")?), settings.vast_ad_tag_uri),
            AdStructure::Wrapper => (
                settings.ad_title,
                Some(required(settings.vast_ad_tag_uri, "vast_ad_tag_uri")?),
            ),
        };

        debug!("Created {:?} ad {}", structure, id);

        Ok(Self {
            id,
            structure,
            ad_system,
            ad_title,
            vast_ad_tag_uri,
            sequence: settings.sequence,
            error: settings.error,
            description: settings.description,
            advertiser: settings.advertiser,
            pricing: settings.pricing,
            impressions: Vec::new(),
            surveys: Vec::new(),
            creatives: Vec::new(),
            extensions: Vec::new(),
        })
    }

    pub fn attach_impression(&mut self, impression: Impression) -> &mut Self {
        self.impressions.push(impression);
        self
    }

    pub fn attach_survey(&mut self, survey: Survey) -> &mut Self {
        self.surveys.push(survey);
        self
    }

    /// Construct a creative, append it, and return it for further building
    pub fn attach_creative(&mut self, creative_type: &str, settings: CreativeSettings) -> Result<&mut Creative> {
        let creative = Creative::new(creative_type, settings)?;
        debug!("Attaching {} creative to ad {}", creative.creative_type(), self.id);
        Ok(self.push_creative(creative))
    }

    /// Append an already built creative
    pub fn push_creative(&mut self, creative: Creative) -> &mut Creative {
        self.creatives.push(creative);
        let index = self.creatives.len() - 1;
        &mut self.creatives[index]
    }

    /// Attach an extension; the fragment is parsed when the document is serialized
    pub fn attach_extension(&mut self, extension_type: impl Into<String>, xml: impl Into<String>) -> &mut Self {
        let extension_type = extension_type.into();
        self.extensions.push(Extension {
            extension_type: (!extension_type.is_empty()).then_some(extension_type),
            xml: xml.into(),
        });
        self
    }

    pub fn creative_mut(&mut self, index: usize) -> Option<&mut Creative> {
        self.creatives.get_mut(index)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn structure(&self) -> AdStructure {
        self.structure
    }

    pub fn is_wrapper(&self) -> bool {
        self.structure == AdStructure::Wrapper
    }

    pub fn ad_system(&self) -> &str {
        &self.ad_system
    }

    pub fn ad_title(&self) -> Option<&str> {
        self.ad_title.as_deref()
    }

    pub fn vast_ad_tag_uri(&self) -> Option<&str> {
        self.vast_ad_tag_uri.as_deref()
    }

    pub fn sequence(&self) -> Option<u32> {
        self.sequence
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn advertiser(&self) -> Option<&str> {
        self.advertiser.as_deref()
    }

    pub fn pricing(&self) -> Option<&Pricing> {
        self.pricing.as_ref()
    }

    pub fn impressions(&self) -> &[Impression] {
        &self.impressions
    }

    pub fn surveys(&self) -> &[Survey] {
        &self.surveys
    }

    pub fn creatives(&self) -> &[Creative] {
        &self.creatives
    }

    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    value.ok_or_else(|| VastError::MissingRequiredSetting(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inline_settings() -> AdSettings {
        AdSettings {
            id: Some("ad-1".to_string()),
            ad_system: Some("ExampleServer".to_string()),
            ad_title: Some("Summer Sale".to_string()),
            ..Default::default()
        }
    }

    fn wrapper_settings() -> AdSettings {
        AdSettings {
            id: Some("ad-2".to_string()),
            structure: Some("Wrapper".to_string()),
            ad_system: Some("ExampleServer".to_string()),
            vast_ad_tag_uri: Some("http://wrapped/vast.xml".to_string()),
            ..Default::default()
        }
    }

    fn missing(err: VastError) -> String {
        match err {
            VastError::MissingRequiredSetting(name) => name,
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_inline_construction() {
        let ad = Ad::new(inline_settings()).unwrap();
        assert_eq!(ad.structure(), AdStructure::InLine);
        assert_eq!(ad.ad_title(), Some("Summer Sale"));
        assert!(!ad.is_wrapper());
    }

    #[test]
    fn test_inline_missing_each_required_setting() {
        let err = Ad::new(AdSettings { id: None, ..inline_settings() }).unwrap_err();
        assert_eq!(missing(err), "id");
        let err = Ad::new(AdSettings { ad_system: None, ..inline_settings() }).unwrap_err();
        assert_eq!(missing(err), "ad_system");
        let err = Ad::new(AdSettings { ad_title: None, ..inline_settings() }).unwrap_err();
        assert_eq!(missing(err), "ad_title");
    }

    #[test]
    fn test_first_missing_setting_is_reported() {
        let err = Ad::new(AdSettings::default()).unwrap_err();
        assert_eq!(missing(err), "id");
    }

    #[test]
    fn test_wrapper_construction() {
        let ad = Ad::new(wrapper_settings()).unwrap();
        assert!(ad.is_wrapper());
        assert_eq!(ad.vast_ad_tag_uri(), Some("http://wrapped/vast.xml"));
        assert!(ad.ad_title().is_none());

        let err = Ad::new(AdSettings { vast_ad_tag_uri: None, ..wrapper_settings() }).unwrap_err();
        assert_eq!(missing(err), "vast_ad_tag_uri");
    }

    #[test]
    fn test_structure_is_case_insensitive() {
        assert_eq!(AdStructure::from_setting(Some("WRAPPER")), AdStructure::Wrapper);
        assert_eq!(AdStructure::from_setting(Some("wrapper")), AdStructure::Wrapper);
        assert_eq!(AdStructure::from_setting(Some("inline")), AdStructure::InLine);
        assert_eq!(AdStructure::from_setting(None), AdStructure::InLine);
    }

    #[test]
    fn test_wrapper_does_not_need_title() {
        let settings = AdSettings {
            ad_title: Some("Passthrough".to_string()),
            ..wrapper_settings()
        };
        let ad = Ad::new(settings).unwrap();
        assert_eq!(ad.ad_title(), Some("Passthrough"));
    }

    #[test]
    fn test_attach_creative_returns_live_creative() {
        let mut ad = Ad::new(inline_settings()).unwrap();
        ad.attach_creative(
            "Linear",
            CreativeSettings {
                duration: Some("00:00:30".to_string()),
                ..Default::default()
            },
        )
        .unwrap()
        .attach_tracking_event("start", "http://t/start", None);

        assert_eq!(ad.creatives().len(), 1);
        assert_eq!(ad.creatives()[0].tracking_events().len(), 1);
        assert!(ad.creative_mut(0).is_some());
    }

    #[test]
    fn test_failed_creative_is_not_attached() {
        let mut ad = Ad::new(inline_settings()).unwrap();
        assert!(ad.attach_creative("Linear", CreativeSettings::default()).is_err());
        assert!(ad.creatives().is_empty());
    }

    #[test]
    fn test_impressions_keep_attach_order() {
        let mut ad = Ad::new(inline_settings()).unwrap();
        ad.attach_impression(Impression::new("http://i/2"))
            .attach_impression(Impression::new("http://i/1").with_id("first"));
        let urls: Vec<&str> = ad.impressions().iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, vec!["http://i/2", "http://i/1"]);
    }
}

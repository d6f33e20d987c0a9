use log::debug;
use serde::Serialize;

use crate::ad::Ad;
use crate::error::Result;
use crate::settings::{AdSettings, VastSettings};
use crate::writer;

/// Represents a VAST document (Video Ad Serving Template)
///
/// Ads are emitted in the order they were created or attached.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct Vast {
    version: String,
    vast_error_uri: Option<String>,
    ads: Vec<Ad>,
}

impl Vast {
    pub fn new(settings: VastSettings) -> Self {
        Self {
            version: settings.version,
            vast_error_uri: settings.vast_error_uri,
            ads: Vec::new(),
        }
    }

    /// Build an Ad from settings, append it, and return it for further building
    pub fn create_ad(&mut self, settings: AdSettings) -> Result<&mut Ad> {
        let ad = Ad::new(settings)?;
        Ok(self.attach_ad(ad))
    }

    pub fn attach_ad(&mut self, ad: Ad) -> &mut Ad {
        debug!("Attaching ad {} at position {}", ad.id(), self.ads.len());
        self.ads.push(ad);
        let index = self.ads.len() - 1;
        &mut self.ads[index]
    }

    pub fn ad_mut(&mut self, index: usize) -> Option<&mut Ad> {
        self.ads.get_mut(index)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn vast_error_uri(&self) -> Option<&str> {
        self.vast_error_uri.as_deref()
    }

    pub fn ads(&self) -> &[Ad] {
        &self.ads
    }

    /// Serialize to a pretty-printed UTF-8 XML document
    pub fn to_xml(&self) -> Result<String> {
        writer::vast_to_xml(self)
    }

    /// Serialize without indentation
    pub fn to_xml_compact(&self) -> Result<String> {
        writer::vast_to_xml_compact(self)
    }
}

impl Default for Vast {
    fn default() -> Self {
        Self::new(VastSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ad_settings(id: &str) -> AdSettings {
        AdSettings {
            id: Some(id.to_string()),
            ad_system: Some("sys".to_string()),
            ad_title: Some("title".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_document() {
        let vast = Vast::default();
        assert_eq!(vast.version(), "3.0");
        assert!(vast.vast_error_uri().is_none());
        assert!(vast.ads().is_empty());
    }

    #[test]
    fn test_ads_keep_insertion_order() {
        let mut vast = Vast::default();
        vast.create_ad(ad_settings("b")).unwrap();
        vast.attach_ad(Ad::new(ad_settings("a")).unwrap());
        vast.create_ad(ad_settings("c")).unwrap();
        let ids: Vec<&str> = vast.ads().iter().map(|ad| ad.id()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_invalid_ad_is_not_appended() {
        let mut vast = Vast::default();
        assert!(vast.create_ad(AdSettings::default()).is_err());
        assert!(vast.ads().is_empty());
        assert!(vast.ad_mut(0).is_none());
    }
}

//! Declarative JSON description of a whole VAST document.
//!
//! A manifest is replayed through the builder API, so it is subject to the
//! same validation as code that calls `create_ad` / `attach_*` directly.

use log::debug;
use serde::Deserialize;

use crate::error::Result;
use crate::models::{Extension, Impression, Resource, Survey, TrackingEvent};
use crate::settings::{AdSettings, CreativeSettings, IconSettings, MediaFileSettings, VastSettings};
use crate::vast::Vast;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Manifest {
    #[serde(flatten)]
    pub settings: VastSettings,
    pub ads: Vec<AdManifest>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct AdManifest {
    #[serde(flatten)]
    pub settings: AdSettings,
    pub impressions: Vec<Impression>,
    pub surveys: Vec<Survey>,
    pub creatives: Vec<CreativeManifest>,
    pub extensions: Vec<Extension>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeManifest {
    #[serde(rename = "type")]
    pub creative_type: String,
    #[serde(flatten)]
    pub settings: CreativeSettings,
    #[serde(default)]
    pub media_files: Vec<MediaFileManifest>,
    #[serde(default)]
    pub tracking_events: Vec<TrackingEvent>,
    #[serde(default)]
    pub video_clicks: Vec<VideoClickManifest>,
    #[serde(default)]
    pub click_throughs: Vec<String>,
    #[serde(default)]
    pub clicks: Vec<ClickManifest>,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub icons: Vec<IconSettings>,
    #[serde(default)]
    pub non_linear_click_tracking: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MediaFileManifest {
    pub url: String,
    #[serde(flatten)]
    pub settings: MediaFileSettings,
}

#[derive(Debug, Deserialize)]
pub struct VideoClickManifest {
    #[serde(rename = "type")]
    pub click_type: String,
    pub url: String,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClickManifest {
    pub uri: String,
    #[serde(default, rename = "type")]
    pub click_type: Option<String>,
}

impl Manifest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the document, stopping at the first validation failure
    pub fn build(self) -> Result<Vast> {
        let mut vast = Vast::new(self.settings);

        for ad_manifest in self.ads {
            let ad = vast.create_ad(ad_manifest.settings)?;

            for impression in ad_manifest.impressions {
                ad.attach_impression(impression);
            }
            for survey in ad_manifest.surveys {
                ad.attach_survey(survey);
            }

            for creative_manifest in ad_manifest.creatives {
                let creative = ad.attach_creative(&creative_manifest.creative_type, creative_manifest.settings)?;

                for media_file in creative_manifest.media_files {
                    creative.attach_media_file(media_file.url, media_file.settings)?;
                }
                for event in creative_manifest.tracking_events {
                    creative.attach_tracking_event(event.event, event.url, event.offset.as_deref());
                }
                for click in creative_manifest.video_clicks {
                    creative.attach_video_click(&click.click_type, click.url, click.id.as_deref())?;
                }
                for url in creative_manifest.click_throughs {
                    creative.attach_click_through(url);
                }
                for click in creative_manifest.clicks {
                    creative.attach_click(click.uri, click.click_type.as_deref());
                }
                for resource in creative_manifest.resources {
                    creative.attach_resource(resource.resource_type, resource.uri, resource.creative_type.as_deref());
                }
                for icon in creative_manifest.icons {
                    creative.attach_icon(icon);
                }
                if let Some(url) = creative_manifest.non_linear_click_tracking {
                    creative.attach_non_linear_click_tracking(url);
                }
            }

            for extension in ad_manifest.extensions {
                ad.attach_extension(extension.extension_type.unwrap_or_default(), extension.xml);
            }
        }

        debug!("Built document with {} ads from manifest", vast.ads().len());
        Ok(vast)
    }
}

/// Parse a JSON manifest, build it, and serialize the pretty-printed document
pub fn render_manifest(json: &str) -> Result<String> {
    Manifest::from_json(json)?.build()?.to_xml()
}

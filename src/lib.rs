pub mod ad;
pub mod creative;
pub mod error;
pub mod manifest;
pub mod models;
pub mod settings;
pub mod vast;
pub mod writer;

pub use ad::{Ad, AdStructure};
pub use creative::{Creative, CreativeType, VideoClickType};
pub use error::{Result, VastError};
pub use manifest::{render_manifest, Manifest};
pub use vast::Vast;

pub mod async_api {
    use crate::error::Result;
    use crate::manifest::Manifest;

    pub async fn render_manifest(json: &str) -> Result<String> {
        // Building and serializing are CPU-bound, so we can just wrap the sync version
        crate::manifest::render_manifest(json)
    }

    pub async fn render_manifest_compact(json: &str) -> Result<String> {
        Manifest::from_json(json)?.build()?.to_xml_compact()
    }
}

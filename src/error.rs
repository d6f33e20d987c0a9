use thiserror::Error;

/// Errors that can occur when building or serializing a VAST document
#[derive(Error, Debug)]
pub enum VastError {
    #[error("Missing required setting: {0}")]
    MissingRequiredSetting(String),

    #[error("Invalid creative type: {0} (expected Linear, NonLinear or CompanionAds)")]
    InvalidCreativeType(String),

    #[error("Invalid video click type: {0} (expected ClickThrough, ClickTracking or CustomClick)")]
    InvalidClickType(String),

    #[error("A Duration is required for Linear creatives, consider defaulting to \"00:00:00\"")]
    MissingDuration,

    #[error("MediaFile missing required attribute: {0}")]
    MissingField(String),

    #[error("Malformed extension XML: {0}")]
    MalformedExtensionXml(String),

    #[error("Invalid XML element name: {0:?}")]
    InvalidElementName(String),

    #[error("Failed to write XML: {0}")]
    XmlWriteError(#[from] quick_xml::Error),

    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialized document is not valid UTF-8: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    #[error("Failed to parse manifest: {0}")]
    ManifestError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VastError>;

use log::{debug, trace};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::ad::Ad;
use crate::creative::{Creative, CreativeType, VideoClickType};
use crate::error::{Result, VastError};
use crate::models::{push_opt, AdParameters, Icon, Resource, TrackingEvent};
use crate::vast::Vast;

const INDENT_SIZE: usize = 2;

/// Convert a Vast document to pretty-printed XML
pub fn vast_to_xml(vast: &Vast) -> Result<String> {
    render(vast, Writer::new_with_indent(Vec::new(), b' ', INDENT_SIZE))
}

/// Convert a Vast document to XML without indentation
pub fn vast_to_xml_compact(vast: &Vast) -> Result<String> {
    render(vast, Writer::new(Vec::new()))
}

fn render(vast: &Vast, writer: Writer<Vec<u8>>) -> Result<String> {
    let mut xml = XmlEmitter { writer };

    xml.declaration()?;
    xml.start("VAST", &[("version", vast.version().to_string())])?;

    if vast.ads().is_empty() {
        if let Some(error_uri) = present(vast.vast_error_uri()) {
            debug!("No ads in document, emitting fallback error URI");
            xml.cdata_element("Error", &[], error_uri)?;
        }
    } else {
        for ad in vast.ads() {
            write_ad(&mut xml, ad)?;
        }
    }

    xml.end("VAST")?;

    Ok(String::from_utf8(xml.writer.into_inner())?)
}

/// Thin helper over the quick-xml writer for the element shapes VAST uses
struct XmlEmitter {
    writer: Writer<Vec<u8>>,
}

impl XmlEmitter {
    fn declaration(&mut self) -> Result<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(())
    }

    fn start(&mut self, name: &str, attributes: &[(&str, String)]) -> Result<()> {
        let mut start = BytesStart::new(name);
        for (key, value) in attributes {
            start.push_attribute((*key, value.as_str()));
        }
        self.writer.write_event(Event::Start(start))?;
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Write text as CDATA, splitting around any `]]>` in the payload
    fn cdata(&mut self, text: &str) -> Result<()> {
        let mut parts = text.split("]]>").peekable();
        let mut first = true;
        while let Some(part) = parts.next() {
            let mut chunk = String::with_capacity(part.len() + 3);
            if !first {
                chunk.push('>');
            }
            chunk.push_str(part);
            if parts.peek().is_some() {
                chunk.push_str("]]");
            }
            self.writer.write_event(Event::CData(BytesCData::new(chunk)))?;
            first = false;
        }
        Ok(())
    }

    fn cdata_element(&mut self, name: &str, attributes: &[(&str, String)], text: &str) -> Result<()> {
        self.start(name, attributes)?;
        self.cdata(text)?;
        self.end(name)
    }

    fn text_element(&mut self, name: &str, attributes: &[(&str, String)], text: &str) -> Result<()> {
        self.start(name, attributes)?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    /// Parse a raw XML fragment and re-emit it as child content.
    ///
    /// The fragment must hold exactly one root element.
    fn fragment(&mut self, fragment: &str) -> Result<()> {
        let mut reader = Reader::from_str(fragment);
        reader.trim_text(true);

        let mut depth = 0usize;
        let mut roots = 0usize;

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(e) => {
                    return Err(malformed(format!("{} at position {}", e, reader.buffer_position())));
                }
            };

            match &event {
                Event::Start(e) | Event::Empty(e) => {
                    for attr in e.attributes() {
                        attr.map_err(|e| malformed(e.to_string()))?;
                    }
                    if depth == 0 {
                        roots += 1;
                        if roots > 1 {
                            return Err(malformed("more than one root element".to_string()));
                        }
                    }
                    if matches!(event, Event::Start(_)) {
                        depth += 1;
                    }
                }
                Event::End(_) => {
                    if depth == 0 {
                        return Err(malformed("closing tag without an open element".to_string()));
                    }
                    depth -= 1;
                }
                Event::Text(e) => {
                    e.unescape().map_err(|e| malformed(e.to_string()))?;
                    if depth == 0 {
                        return Err(malformed("text outside the root element".to_string()));
                    }
                }
                Event::CData(_) if depth == 0 => {
                    return Err(malformed("text outside the root element".to_string()));
                }
                Event::Decl(_) | Event::PI(_) | Event::DocType(_) | Event::Comment(_) if depth == 0 => continue,
                Event::Eof => break,
                _ => (),
            }

            self.writer.write_event(event)?;
        }

        if depth > 0 {
            return Err(malformed("unclosed element".to_string()));
        }
        if roots == 0 {
            return Err(malformed("no root element".to_string()));
        }
        Ok(())
    }
}

fn malformed(reason: String) -> VastError {
    VastError::MalformedExtensionXml(reason)
}

/// Optional text that is absent or empty is not emitted
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

/// Check a caller-supplied element name (resource or click type) against the XML Name production
fn element_name(name: &str) -> Result<&str> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_alphabetic() || first == '_' || first == ':')
                && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.'))
        }
        None => false,
    };
    if valid {
        Ok(name)
    } else {
        Err(VastError::InvalidElementName(name.to_string()))
    }
}

fn write_ad(xml: &mut XmlEmitter, ad: &Ad) -> Result<()> {
    let mut attributes = vec![("id", ad.id().to_string())];
    push_opt(&mut attributes, "sequence", &ad.sequence().filter(|sequence| *sequence != 0));

    xml.start("Ad", &attributes)?;
    if ad.is_wrapper() {
        write_wrapper(xml, ad)?;
    } else {
        write_inline(xml, ad)?;
    }
    xml.end("Ad")
}

fn write_wrapper(xml: &mut XmlEmitter, ad: &Ad) -> Result<()> {
    xml.start("Wrapper", &[])?;

    xml.text_element("AdSystem", &[], ad.ad_system())?;
    xml.cdata_element("VASTAdTagURI", &[], ad.vast_ad_tag_uri().unwrap_or_default())?;

    if let Some(error) = present(ad.error()) {
        xml.cdata_element("Error", &[], error)?;
    }

    write_impressions(xml, ad)?;
    write_creatives(xml, ad)?;

    xml.end("Wrapper")
}

fn write_inline(xml: &mut XmlEmitter, ad: &Ad) -> Result<()> {
    xml.start("InLine", &[])?;

    xml.text_element("AdSystem", &[], ad.ad_system())?;
    xml.cdata_element("AdTitle", &[], ad.ad_title().unwrap_or_default())?;

    if let Some(description) = present(ad.description()) {
        xml.cdata_element("Description", &[], description)?;
    }

    if let Some(advertiser) = ad.advertiser() {
        xml.text_element("Advertiser", &[], advertiser)?;
    }

    if let Some(pricing) = ad.pricing() {
        let attributes = [
            ("model", pricing.model.clone()),
            ("currency", pricing.currency.clone()),
        ];
        xml.text_element("Pricing", &attributes, &pricing.value)?;
    }

    for survey in ad.surveys() {
        let mut attributes = Vec::new();
        push_opt(&mut attributes, "type", &survey.survey_type);
        xml.cdata_element("Survey", &attributes, &survey.url)?;
    }

    if let Some(error) = present(ad.error()) {
        xml.cdata_element("Error", &[], error)?;
    }

    write_impressions(xml, ad)?;
    write_creatives(xml, ad)?;

    if !ad.extensions().is_empty() {
        xml.start("Extensions", &[])?;
        for extension in ad.extensions() {
            let mut attributes = Vec::new();
            push_opt(&mut attributes, "type", &extension.extension_type);
            xml.start("Extension", &attributes)?;
            xml.fragment(&extension.xml)?;
            xml.end("Extension")?;
        }
        xml.end("Extensions")?;
    }

    xml.end("InLine")
}

fn write_impressions(xml: &mut XmlEmitter, ad: &Ad) -> Result<()> {
    for impression in ad.impressions() {
        let mut attributes = Vec::new();
        push_opt(&mut attributes, "id", &impression.id);
        xml.cdata_element("Impression", &attributes, &impression.url)?;
    }
    Ok(())
}

/// Emit the Creatives block: Linear creatives, then NonLinear, then one
/// CompanionAds group, each in attach order
fn write_creatives(xml: &mut XmlEmitter, ad: &Ad) -> Result<()> {
    let of_type = |creative_type: CreativeType| {
        ad.creatives()
            .iter()
            .filter(move |creative| creative.creative_type() == creative_type)
    };

    xml.start("Creatives", &[])?;

    for creative in of_type(CreativeType::Linear) {
        write_linear(xml, creative, ad.is_wrapper())?;
    }

    for creative in of_type(CreativeType::NonLinear) {
        write_non_linear(xml, creative)?;
    }

    let companions: Vec<&Creative> = of_type(CreativeType::CompanionAds).collect();
    if !companions.is_empty() {
        write_companion_ads(xml, &companions)?;
    }

    xml.end("Creatives")
}

fn write_linear(xml: &mut XmlEmitter, creative: &Creative, wrapper: bool) -> Result<()> {
    let mut creative_attributes = Vec::new();
    push_opt(&mut creative_attributes, "id", &creative.attributes().id);
    xml.start("Creative", &creative_attributes)?;

    let mut linear_attributes = Vec::new();
    push_opt(&mut linear_attributes, "skipoffset", &present(creative.skipoffset()));
    xml.start("Linear", &linear_attributes)?;

    xml.text_element("Duration", &[], creative.duration().unwrap_or_default())?;

    if let Some(ad_parameters) = creative.ad_parameters() {
        write_ad_parameters(xml, ad_parameters)?;
    }

    write_tracking_events(xml, creative.tracking_events())?;

    if !creative.video_clicks().is_empty() {
        xml.start("VideoClicks", &[])?;
        for click in creative.video_clicks() {
            // The wrapped tag owns the click-through
            if wrapper && click.click_type == VideoClickType::ClickThrough {
                trace!("Skipping ClickThrough {} on wrapper", click.url);
                continue;
            }
            let mut attributes = Vec::new();
            push_opt(&mut attributes, "id", &click.id);
            xml.cdata_element(click.click_type.as_str(), &attributes, &click.url)?;
        }
        xml.end("VideoClicks")?;
    }

    if !creative.media_files().is_empty() {
        if wrapper {
            trace!("Omitting {} media files on wrapper", creative.media_files().len());
        } else {
            xml.start("MediaFiles", &[])?;
            for media_file in creative.media_files() {
                xml.cdata_element("MediaFile", &media_file.attributes(), &media_file.url)?;
            }
            xml.end("MediaFiles")?;
        }
    }

    if !creative.icons().is_empty() {
        xml.start("Icons", &[])?;
        for icon in creative.icons() {
            write_icon(xml, icon)?;
        }
        xml.end("Icons")?;
    }

    xml.end("Linear")?;
    xml.end("Creative")
}

fn write_non_linear(xml: &mut XmlEmitter, creative: &Creative) -> Result<()> {
    xml.start("Creative", &[])?;
    xml.start("NonLinearAds", &[])?;
    xml.start("NonLinear", &creative.attributes().to_attributes())?;

    for resource in creative.resources() {
        write_resource(xml, resource)?;
    }

    if let Some(ad_parameters) = creative.ad_parameters() {
        write_ad_parameters(xml, ad_parameters)?;
    }

    for click in creative.clicks() {
        xml.cdata_element(element_name(&click.click_type)?, &[], &click.uri)?;
    }

    if let Some(url) = creative.non_linear_click_tracking() {
        xml.cdata_element("NonLinearClickTracking", &[], url)?;
    }

    xml.end("NonLinear")?;
    write_tracking_events(xml, creative.tracking_events())?;
    xml.end("NonLinearAds")?;
    xml.end("Creative")
}

fn write_companion_ads(xml: &mut XmlEmitter, companions: &[&Creative]) -> Result<()> {
    xml.start("Creative", &[])?;
    xml.start("CompanionAds", &[])?;

    for creative in companions {
        xml.start("Companion", &creative.attributes().to_attributes())?;

        for resource in creative.resources() {
            write_resource(xml, resource)?;
        }

        if let Some(ad_parameters) = creative.ad_parameters() {
            write_ad_parameters(xml, ad_parameters)?;
        }

        for url in creative.click_throughs() {
            xml.cdata_element("CompanionClickThrough", &[], url)?;
        }

        if let Some(url) = creative.non_linear_click_tracking() {
            xml.cdata_element("CompanionClickTracking", &[], url)?;
        }

        write_tracking_events(xml, creative.tracking_events())?;

        xml.end("Companion")?;
    }

    xml.end("CompanionAds")?;
    xml.end("Creative")
}

fn write_ad_parameters(xml: &mut XmlEmitter, ad_parameters: &AdParameters) -> Result<()> {
    let mut attributes = Vec::new();
    if ad_parameters.xml_encoded == Some(true) {
        attributes.push(("xmlEncoded", "true".to_string()));
    }
    xml.cdata_element("AdParameters", &attributes, &ad_parameters.data)
}

fn write_tracking_events(xml: &mut XmlEmitter, events: &[TrackingEvent]) -> Result<()> {
    if events.is_empty() {
        return Ok(());
    }
    xml.start("TrackingEvents", &[])?;
    for event in events {
        xml.cdata_element("Tracking", &event.attributes(), &event.url)?;
    }
    xml.end("TrackingEvents")
}

fn write_resource(xml: &mut XmlEmitter, resource: &Resource) -> Result<()> {
    xml.cdata_element(element_name(&resource.resource_type)?, &resource.attributes(), &resource.uri)
}

fn write_icon(xml: &mut XmlEmitter, icon: &Icon) -> Result<()> {
    xml.start("Icon", &icon.attributes())?;

    if let Some(resource) = &icon.resource {
        write_resource(xml, resource)?;
    }

    if icon.click_through.is_some() || icon.click_tracking.is_some() {
        xml.start("IconClicks", &[])?;
        if let Some(url) = &icon.click_through {
            xml.cdata_element("IconClickThrough", &[], url)?;
        }
        if let Some(url) = &icon.click_tracking {
            xml.cdata_element("IconClickTracking", &[], url)?;
        }
        xml.end("IconClicks")?;
    }

    if let Some(url) = &icon.view_tracking {
        xml.cdata_element("IconViewTracking", &[], url)?;
    }

    xml.end("Icon")
}

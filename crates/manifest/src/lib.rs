#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! `imsmanifest.xml` handling
//!
//! Only two facts are read from a manifest: the `href` of the first
//! `resources/resource` element (the entry page) and the text of
//! `metadata/schemaversion` (the SCORM version hint). Both are looked up
//! directly under the document root.
//!
//! Manifests disagree on which namespace they use and how they prefix it,
//! so parsing runs in two passes: the first finds the default namespace
//! declared anywhere in the document, the second matches elements by their
//! resolved namespace.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::{NsReader, Reader};
use scorm_errors::{Error, PackageError};
use scorm_types::{PackageDescriptor, ScormVersion};
use serde::{Deserialize, Serialize};

/// Entry page used when the resource element carries no `href`
pub const DEFAULT_ENTRY_PAGE: &str = "index.html";

/// File name of the manifest at the package root
pub const MANIFEST_FILE: &str = "imsmanifest.xml";

/// Facts extracted from a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Entry page relative to the package root
    pub entry_page_path: String,
    /// Raw `schemaversion` text, when the element exists
    pub schema_version: Option<String>,
}

impl Manifest {
    /// Parse manifest bytes.
    ///
    /// # Errors
    ///
    /// Returns `PackageError::InvalidManifest` if the document is not
    /// well-formed XML or uses an undeclared namespace prefix.
    pub fn parse(bytes: &[u8]) -> Result<Self, Error> {
        let namespace = default_namespace(bytes)?;
        let manifest = scan(bytes, namespace.as_deref())?;
        tracing::debug!(
            namespace = ?namespace.as_deref().map(String::from_utf8_lossy),
            entry_page = %manifest.entry_page_path,
            schema_version = ?manifest.schema_version,
            "parsed manifest"
        );
        Ok(manifest)
    }

    #[must_use]
    pub fn scorm_version(&self) -> ScormVersion {
        ScormVersion::from_schema_version(self.schema_version.as_deref())
    }

    #[must_use]
    pub fn into_descriptor(self) -> PackageDescriptor {
        PackageDescriptor {
            scorm_version: self.scorm_version(),
            entry_page_path: self.entry_page_path,
        }
    }
}

fn malformed(err: impl std::fmt::Display) -> Error {
    PackageError::InvalidManifest {
        message: format!("malformed {MANIFEST_FILE}: {err}"),
    }
    .into()
}

/// First unprefixed `xmlns` declaration in document order.
///
/// An empty declaration still ends the search and means "no namespace".
fn default_namespace(bytes: &[u8]) -> Result<Option<Vec<u8>>, Error> {
    let mut reader = Reader::from_reader(bytes);
    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) | Event::Empty(e) => {
                for attr in e.attributes() {
                    let attr = attr.map_err(malformed)?;
                    if attr.key.as_ref() == b"xmlns" {
                        let value = attr.unescape_value().map_err(malformed)?;
                        return Ok((!value.is_empty()).then(|| value.as_bytes().to_vec()));
                    }
                }
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Root,
    Resources,
    Metadata,
    SchemaVersion,
    Other,
}

#[derive(Default)]
struct ScanState {
    stack: Vec<Frame>,
    seen_root: bool,
    /// `Some(href)` once the first resource element was seen
    resource: Option<Option<String>>,
    schema_version: Option<String>,
    capturing_text: bool,
}

impl ScanState {
    fn open(&mut self, element: &BytesStart<'_>, in_namespace: bool) -> Result<Frame, Error> {
        let local = element.local_name();
        let local = local.as_ref();

        // Only text before the first child counts
        self.capturing_text = false;

        let frame = match self.stack.last() {
            None => {
                if self.seen_root {
                    return Err(malformed("more than one root element"));
                }
                self.seen_root = true;
                Frame::Root
            }
            Some(Frame::Root) if in_namespace && local == b"resources" => Frame::Resources,
            Some(Frame::Root) if in_namespace && local == b"metadata" => Frame::Metadata,
            Some(Frame::Resources) if in_namespace && local == b"resource" => {
                if self.resource.is_none() {
                    self.resource = Some(href_attribute(element)?);
                }
                Frame::Other
            }
            Some(Frame::Metadata)
                if in_namespace && local == b"schemaversion" && self.schema_version.is_none() =>
            {
                self.schema_version = Some(String::new());
                Frame::SchemaVersion
            }
            _ => Frame::Other,
        };
        Ok(frame)
    }

    fn push(&mut self, frame: Frame) {
        self.capturing_text = frame == Frame::SchemaVersion;
        self.stack.push(frame);
    }

    fn close(&mut self) -> Result<(), Error> {
        self.capturing_text = false;
        self.stack
            .pop()
            .map(|_| ())
            .ok_or_else(|| malformed("unexpected closing tag"))
    }

    fn text(&mut self, text: &str) -> Result<(), Error> {
        if self.stack.is_empty() {
            if !text.trim().is_empty() {
                return Err(malformed("text outside the root element"));
            }
            return Ok(());
        }
        if self.capturing_text {
            if let Some(schema_version) = self.schema_version.as_mut() {
                schema_version.push_str(text);
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<Manifest, Error> {
        if !self.seen_root {
            return Err(malformed("no root element"));
        }
        if !self.stack.is_empty() {
            return Err(malformed("unclosed element at end of document"));
        }
        let entry_page_path = match self.resource {
            Some(Some(href)) => href,
            _ => DEFAULT_ENTRY_PAGE.to_string(),
        };
        Ok(Manifest {
            entry_page_path,
            schema_version: self.schema_version,
        })
    }
}

/// Unprefixed `href` of a resource element, kept verbatim even when blank
fn href_attribute(element: &BytesStart<'_>) -> Result<Option<String>, Error> {
    for attr in element.attributes() {
        let attr = attr.map_err(malformed)?;
        if attr.key.as_ref() == b"href" {
            return Ok(Some(attr.unescape_value().map_err(malformed)?.into_owned()));
        }
    }
    Ok(None)
}

fn element_in_namespace(
    resolved: &ResolveResult<'_>,
    target: Option<&[u8]>,
) -> Result<bool, Error> {
    match (resolved, target) {
        (ResolveResult::Bound(Namespace(ns)), Some(target)) => Ok(*ns == target),
        (ResolveResult::Unbound, None) => Ok(true),
        (ResolveResult::Unknown(prefix), _) => Err(malformed(format!(
            "undeclared namespace prefix '{}'",
            String::from_utf8_lossy(prefix)
        ))),
        _ => Ok(false),
    }
}

/// Reject attributes whose prefix was never declared
fn check_attribute_prefixes(
    reader: &NsReader<&[u8]>,
    element: &BytesStart<'_>,
) -> Result<(), Error> {
    for attr in element.attributes() {
        let attr = attr.map_err(malformed)?;
        let Some(prefix) = attr.key.prefix() else {
            continue;
        };
        if matches!(prefix.as_ref(), b"xml" | b"xmlns") {
            continue;
        }
        if let (ResolveResult::Unknown(prefix), _) = reader.resolve_attribute(attr.key) {
            return Err(malformed(format!(
                "undeclared namespace prefix '{}'",
                String::from_utf8_lossy(&prefix)
            )));
        }
    }
    Ok(())
}

fn scan(bytes: &[u8], namespace: Option<&[u8]>) -> Result<Manifest, Error> {
    let mut reader = NsReader::from_reader(bytes);
    let mut state = ScanState::default();

    loop {
        let (resolved, event) = reader.read_resolved_event().map_err(malformed)?;
        match event {
            Event::Start(e) => {
                let in_namespace = element_in_namespace(&resolved, namespace)?;
                check_attribute_prefixes(&reader, &e)?;
                let frame = state.open(&e, in_namespace)?;
                state.push(frame);
            }
            Event::Empty(e) => {
                let in_namespace = element_in_namespace(&resolved, namespace)?;
                check_attribute_prefixes(&reader, &e)?;
                state.open(&e, in_namespace)?;
            }
            Event::End(_) => state.close()?,
            Event::Text(t) => {
                let text = t.unescape().map_err(malformed)?;
                state.text(&text)?;
            }
            Event::CData(c) => {
                let text = std::str::from_utf8(&c).map_err(malformed)?;
                state.text(text)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    state.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_namespace_first_in_document_order() {
        let xml = br#"<manifest><inner xmlns="urn:late"/><x xmlns="urn:later"/></manifest>"#;
        assert_eq!(
            default_namespace(xml).unwrap().as_deref(),
            Some(&b"urn:late"[..])
        );
    }

    #[test]
    fn test_empty_default_namespace_means_none() {
        let xml = br#"<manifest xmlns=""><x xmlns="urn:later"/></manifest>"#;
        assert_eq!(default_namespace(xml).unwrap(), None);
    }

    #[test]
    fn test_prefixed_declarations_are_not_default() {
        let xml = br#"<m:manifest xmlns:m="urn:m"/>"#;
        assert_eq!(default_namespace(xml).unwrap(), None);
    }

    #[test]
    fn test_schemaversion_text_stops_at_first_child() {
        let xml = br"<manifest><metadata><schemaversion>1.2<b/>tail</schemaversion></metadata></manifest>";
        let manifest = Manifest::parse(xml).unwrap();
        assert_eq!(manifest.schema_version.as_deref(), Some("1.2"));
    }

    #[test]
    fn test_padded_schemaversion_is_2004() {
        let xml = b"<manifest><metadata><schemaversion>\n  1.2\n</schemaversion></metadata></manifest>";
        let manifest = Manifest::parse(xml).unwrap();
        assert_eq!(manifest.schema_version.as_deref(), Some("\n  1.2\n"));
        assert_eq!(manifest.scorm_version(), ScormVersion::Scorm2004);

        let xml = b"<manifest><metadata><schemaversion>1.2\n</schemaversion></metadata></manifest>";
        let manifest = Manifest::parse(xml).unwrap();
        assert_eq!(manifest.scorm_version(), ScormVersion::Scorm12);
    }

    #[test]
    fn test_nested_resources_are_ignored() {
        let xml = br#"<manifest><organizations><resources><resource href="deep.html"/></resources></organizations></manifest>"#;
        let manifest = Manifest::parse(xml).unwrap();
        assert_eq!(manifest.entry_page_path, DEFAULT_ENTRY_PAGE);
    }
}

//! SBML document I/O.
//!
//! The reader turns SBML XML into the identifier-level
//! [`crate::model::SbmlDocument`]; the writer regenerates XML text from it.
//! Both are deliberately tolerant of material the converter does not model:
//! unknown elements are skipped on read and simply absent on write.
//!
//! - [`read`] – roxmltree-based parser (core + `qual` + `layout` extensions)
//! - [`write`] – deterministic XML text generation

pub mod read;
pub mod write;

use camino::Utf8Path;

/// File extensions recognized as SBML documents.
pub const EXTENSIONS: &[&str] = &["sbml", "xml"];

/// Namespace authority prefix shared by every SBML level and version.
pub const NAMESPACE_AUTHORITY: &str = "http://www.sbml.org/sbml";

/// Whether a path carries one of the recognized SBML extensions.
pub fn has_sbml_extension(path: &Utf8Path) -> bool {
    path.extension()
        .map(|ext| EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Sniff whether the document's root element lives in an SBML namespace.
/// `.xml` is shared by many formats, so extension checks alone are not
/// enough. Returns `false` for unparseable text.
pub fn looks_like_sbml(text: &str) -> bool {
    match roxmltree::Document::parse(text) {
        Ok(doc) => doc
            .root_element()
            .tag_name()
            .namespace()
            .map(|ns| ns.starts_with(NAMESPACE_AUTHORITY))
            .unwrap_or(false),
        Err(_) => false,
    }
}

//! Seam between the layout interpreter and the PDF library.
//!
//! [`LayoutAnalyzer`](super::layout::LayoutAnalyzer) only sees page ids,
//! decoded content operators and font resources; everything lopdf-specific
//! stays behind [`PdfBackend`].

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Page object reference: (object number, generation).
pub type PageId = (u32, u16);

/// Letter size, used when a page has no usable MediaBox.
pub const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// A font entry from a page's `/Resources /Font` dictionary.
#[derive(Debug, Clone)]
pub struct FontResource {
    /// Resource key used by `Tf` (e.g. `F1`).
    pub name: Vec<u8>,
    /// `BaseFont` value, e.g. "Times-Roman".
    pub base_font: String,
}

/// Content stream operand, reduced to what the interpreter reads.
#[derive(Debug, Clone)]
pub enum Operand {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<Operand>),
    Other,
}

/// One operator with its operands, in stream order.
#[derive(Debug, Clone)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<Operand>,
}

impl ContentOp {
    /// Numeric operand at `idx`, if present.
    pub fn number(&self, idx: usize) -> Option<f32> {
        self.operands.get(idx).and_then(operand_number)
    }
}

/// Read-only access to a decoded PDF.
pub trait PdfBackend {
    /// Page number (1-based) to page reference, in page order.
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Page (width, height) in points from the effective MediaBox.
    fn page_size(&self, page: PageId) -> (f32, f32);

    /// Fonts declared in the page resources.
    fn page_fonts(&self, page: PageId) -> Result<Vec<FontResource>>;

    /// Concatenated, decompressed content stream bytes.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>>;

    /// Split content bytes into operators.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>>;

    /// Decode a shown string with the encoding of `font_name`, or
    /// [`decode_fallback`] when the font has none.
    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String;
}

/// Decode string bytes without a font encoding: UTF-16BE with BOM, then
/// UTF-8, then Latin-1.
pub fn decode_fallback(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
        },
    }
}

use lopdf::{Dictionary, Document as LopdfDocument, Object};

/// [`PdfBackend`] over an in-memory `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;
        Ok(Self { doc })
    }

    /// Header version, e.g. "1.5".
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Find a page attribute, following the `Parent` chain for inherited keys.
    fn inherited<'a>(&'a self, page: PageId, key: &[u8]) -> Option<&'a Object> {
        let mut dict: &Dictionary = self.doc.get_dictionary(page).ok()?;
        // Page trees are shallow; the bound guards against reference cycles.
        for _ in 0..32 {
            if let Ok(value) = dict.get(key) {
                return Some(value);
            }
            let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
            dict = self.doc.get_dictionary(parent).ok()?;
        }
        None
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_size(&self, page: PageId) -> (f32, f32) {
        let media_box = self.inherited(page, b"MediaBox").and_then(|obj| match obj {
            Object::Reference(r) => self.doc.get_object(*r).ok(),
            other => Some(other),
        });

        if let Some(Ok(array)) = media_box.map(|o| o.as_array()) {
            let coords: Vec<f32> = array.iter().filter_map(|o| o.as_float().ok()).collect();
            if coords.len() >= 4 {
                let width = (coords[2] - coords[0]).abs();
                let height = (coords[3] - coords[1]).abs();
                if width > 0.0 && height > 0.0 {
                    return (width, height);
                }
            }
        }

        DEFAULT_PAGE_SIZE
    }

    fn page_fonts(&self, page: PageId) -> Result<Vec<FontResource>> {
        let lopdf_fonts = self
            .doc
            .get_page_fonts(page)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut result = Vec::with_capacity(lopdf_fonts.len());
        for (name, font_dict) in &lopdf_fonts {
            let base_font = font_dict
                .get(b"BaseFont")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            result.push(FontResource {
                name: name.clone(),
                base_font,
            });
        }
        Ok(result)
    }

    fn page_content(&self, page_id: PageId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            // A page without a content stream is blank, not broken.
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r) {
                Ok(Object::Stream(s)) => Ok(stream_bytes(s)),
                Ok(Object::Array(arr)) => Ok(self.concat_streams(arr)),
                _ => Err(Error::PdfParse("Invalid content stream".to_string())),
            },
            Object::Array(arr) => Ok(self.concat_streams(arr)),
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
        let content =
            lopdf::content::Content::decode(data).map_err(|e| Error::PdfParse(e.to_string()))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }

    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String {
        if let Ok(lopdf_fonts) = self.doc.get_page_fonts(page) {
            if let Some(font_dict) = lopdf_fonts.get(font_name) {
                if let Ok(enc) = font_dict.get_font_encoding(&self.doc) {
                    if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                        return text;
                    }
                }
            }
        }
        decode_fallback(bytes)
    }
}

impl LopdfBackend {
    fn concat_streams(&self, arr: &[Object]) -> Vec<u8> {
        let mut content = Vec::new();
        for obj in arr {
            if let Object::Reference(r) = obj {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    content.extend_from_slice(&stream_bytes(s));
                    content.push(b' ');
                }
            }
        }
        content
    }
}

/// Decompressed stream data; unfiltered streams are returned as stored.
fn stream_bytes(stream: &lopdf::Stream) -> Vec<u8> {
    stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone())
}

fn convert_object(obj: &Object) -> Operand {
    match obj {
        Object::Integer(i) => Operand::Integer(*i),
        Object::Real(r) => Operand::Real(*r),
        Object::Name(n) => Operand::Name(n.clone()),
        Object::String(b, _) => Operand::Str(b.clone()),
        Object::Array(arr) => Operand::Array(arr.iter().map(convert_object).collect()),
        _ => Operand::Other,
    }
}

/// Numeric value of an operand.
pub fn operand_number(val: &Operand) -> Option<f32> {
    match val {
        Operand::Integer(i) => Some(*i as f32),
        Operand::Real(r) => Some(*r),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_fallback() {
        assert_eq!(decode_fallback(b"Abstract"), "Abstract");
        assert_eq!(decode_fallback(&[0x52, 0xE9, 0x73, 0x75, 0x6D, 0xE9]), "Résumé");
        assert_eq!(decode_fallback(&[0xFE, 0xFF, 0x00, 0x5B, 0x00, 0x31, 0x00, 0x5D]), "[1]");
        assert_eq!(decode_fallback(&[0xFE, 0xFF, 0x00]), "");
    }

    #[test]
    fn test_operand_numbers() {
        let op = ContentOp {
            operator: "Td".to_string(),
            operands: vec![
                Operand::Integer(54),
                Operand::Real(-12.5),
                Operand::Name(b"F1".to_vec()),
            ],
        };
        assert_eq!(op.number(0), Some(54.0));
        assert_eq!(op.number(1), Some(-12.5));
        assert_eq!(op.number(2), None);
        assert_eq!(op.number(3), None);
        assert_eq!(operand_number(&Operand::Other), None);
    }

    #[test]
    fn test_load_bytes_rejects_garbage() {
        assert!(LopdfBackend::load_bytes(b"definitely not a pdf").is_err());
    }
}

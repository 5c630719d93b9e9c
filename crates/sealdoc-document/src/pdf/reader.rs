// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader: open existing PDF documents with `lopdf`, locate pages and
// resolve inherited page attributes for the stamp compositor.

use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};
use sealdoc_core::error::{Result, SealdocError};
use tracing::{debug, info, instrument, warn};

/// A page's MediaBox as `[llx, lly, urx, ury]` in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaBox {
    pub llx: f64,
    pub lly: f64,
    pub urx: f64,
    pub ury: f64,
}

impl MediaBox {
    /// US Letter, assumed when a page tree carries no MediaBox at all.
    pub const LETTER: MediaBox = MediaBox {
        llx: 0.0,
        lly: 0.0,
        urx: 612.0,
        ury: 792.0,
    };

    pub fn width(&self) -> f64 {
        self.urx - self.llx
    }

    pub fn height(&self) -> f64 {
        self.ury - self.lly
    }
}

/// Reads existing PDF files.
///
/// Wraps `lopdf::Document` with 1-indexed page lookup and attribute
/// inheritance through the page tree.
pub struct PdfReader {
    document: Document,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        // Read first so a missing file surfaces as Io rather than Pdf.
        let data = std::fs::read(path_ref)?;
        let document = Document::load_mem(&data).map_err(|err| {
            SealdocError::Pdf(format!("failed to parse {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self { document })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            SealdocError::Pdf(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self { document })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Object id of page `page_number` (1-indexed).
    pub fn page_id(&self, page_number: u32) -> Result<ObjectId> {
        let pages = self.document.get_pages();
        pages
            .get(&page_number)
            .copied()
            .ok_or(SealdocError::PageIndex {
                requested: page_number,
                page_count: pages.len(),
            })
    }

    /// MediaBox of a page, inherited from ancestors when the page has none.
    pub fn media_box(&self, page_id: ObjectId) -> Result<MediaBox> {
        let Some(object) = inherited_attribute(&self.document, page_id, b"MediaBox")? else {
            warn!(?page_id, "Page tree has no MediaBox, assuming US Letter");
            return Ok(MediaBox::LETTER);
        };

        let values = resolve(&self.document, object)?
            .as_array()
            .map_err(|err| SealdocError::Pdf(format!("MediaBox is not an array: {}", err)))?
            .iter()
            .map(|value| {
                resolve(&self.document, value)?
                    .as_float()
                    .map(f64::from)
                    .map_err(|err| SealdocError::Pdf(format!("MediaBox entry is not a number: {}", err)))
            })
            .collect::<Result<Vec<f64>>>()?;

        match values.as_slice() {
            &[x0, y0, x1, y1] => Ok(MediaBox {
                llx: x0.min(x1),
                lly: y0.min(y1),
                urx: x0.max(x1),
                ury: y0.max(y1),
            }),
            other => Err(SealdocError::Pdf(format!(
                "MediaBox has {} entries, expected 4",
                other.len()
            ))),
        }
    }
}

/// Follow one level of indirection.
pub(crate) fn resolve<'a>(document: &'a Document, object: &'a Object) -> Result<&'a Object> {
    match object {
        Object::Reference(id) => document
            .get_object(*id)
            .map_err(|err| SealdocError::Pdf(format!("cannot resolve {:?}: {}", id, err))),
        other => Ok(other),
    }
}

/// Page dictionary for `page_id`.
pub(crate) fn page_dict(document: &Document, page_id: ObjectId) -> Result<&Dictionary> {
    document
        .get_dictionary(page_id)
        .map_err(|err| SealdocError::Pdf(format!("cannot read page object {:?}: {}", page_id, err)))
}

/// Look up an inheritable page attribute (`Resources`, `MediaBox`, ...) on
/// the page or the nearest ancestor that defines it.
pub(crate) fn inherited_attribute<'a>(
    document: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>> {
    let mut node = page_dict(document, page_id)?;
    // Bounded walk; malformed trees can contain Parent cycles.
    for _ in 0..64 {
        if let Ok(value) = node.get(key) {
            return Ok(Some(value));
        }
        match node.get(b"Parent") {
            Ok(Object::Reference(parent)) => {
                node = document.get_dictionary(*parent).map_err(|err| {
                    SealdocError::Pdf(format!("cannot read parent {:?}: {}", parent, err))
                })?;
            }
            _ => return Ok(None),
        }
    }
    Ok(None)
}

/// Deep-clone a single lopdf Object from `source` into `target`, adding every
/// referenced object to `target` and rewriting references to the new ids.
///
/// `/Parent` is skipped to avoid walking back up a page tree.
pub(crate) fn deep_clone_object(
    source: &Document,
    target: &mut Document,
    object: &Object,
) -> Result<Object> {
    match object {
        Object::Dictionary(dict) => Ok(Object::Dictionary(clone_dictionary(source, target, dict)?)),
        Object::Array(arr) => {
            let mut new_arr = Vec::with_capacity(arr.len());
            for item in arr {
                new_arr.push(deep_clone_object(source, target, item)?);
            }
            Ok(Object::Array(new_arr))
        }
        Object::Reference(ref_id) => match source.get_object(*ref_id) {
            Ok(referenced) => {
                let cloned = deep_clone_object(source, target, referenced)?;
                let new_id = target.add_object(cloned);
                Ok(Object::Reference(new_id))
            }
            Err(err) => {
                warn!(?ref_id, %err, "Cannot resolve reference, using Null");
                Ok(Object::Null)
            }
        },
        Object::Stream(stream) => {
            let dict = clone_dictionary(source, target, &stream.dict)?;
            Ok(Object::Stream(lopdf::Stream::new(dict, stream.content.clone())))
        }
        other => Ok(other.clone()),
    }
}

fn clone_dictionary(source: &Document, target: &mut Document, dict: &Dictionary) -> Result<Dictionary> {
    let mut new_dict = Dictionary::new();
    for (key, value) in dict.iter() {
        if key == b"Parent" {
            continue;
        }
        let cloned_value = deep_clone_object(source, target, value)?;
        new_dict.set(key.clone(), cloned_value);
    }
    Ok(new_dict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    /// Two-page document whose MediaBox lives only on the Pages node.
    fn inherited_box_document() -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let kids: Vec<Object> = (0..2)
            .map(|_| {
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                })
                .into()
            })
            .collect();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => 2,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), Object::Real(842.0)],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("serialise fixture");
        bytes
    }

    #[test]
    fn pages_are_one_indexed() {
        let reader = PdfReader::from_bytes(&inherited_box_document()).expect("load");
        assert_eq!(reader.page_count(), 2);
        assert!(reader.page_id(1).is_ok());
        assert!(reader.page_id(2).is_ok());

        for bad in [0, 3] {
            match reader.page_id(bad) {
                Err(SealdocError::PageIndex {
                    requested,
                    page_count,
                }) => {
                    assert_eq!(requested, bad);
                    assert_eq!(page_count, 2);
                }
                other => panic!("expected PageIndex, got {other:?}"),
            }
        }
    }

    #[test]
    fn media_box_is_inherited() {
        let reader = PdfReader::from_bytes(&inherited_box_document()).expect("load");
        let page = reader.page_id(2).expect("page");
        let media_box = reader.media_box(page).expect("media box");
        assert_eq!(media_box.width(), 595.0);
        assert_eq!(media_box.height(), 842.0);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = PdfReader::open("/nonexistent/source.pdf").err().expect("error");
        assert!(matches!(err, SealdocError::Io(_)));
    }

    #[test]
    fn garbage_is_pdf_error() {
        let err = PdfReader::from_bytes(b"%PDF-nonsense").err().expect("error");
        assert!(matches!(err, SealdocError::Pdf(_)));
    }

    #[test]
    fn deep_clone_rewrites_references() {
        let mut source = Document::with_version("1.5");
        let leaf = source.add_object(dictionary! { "Kind" => "Leaf" });
        let root = Object::Dictionary(dictionary! { "Child" => leaf, "Parent" => leaf });

        let mut target = Document::with_version("1.5");
        let cloned = deep_clone_object(&source, &mut target, &root).expect("clone");
        let dict = cloned.as_dict().expect("dict");
        assert!(dict.get(b"Parent").is_err());
        let child_id = dict.get(b"Child").and_then(Object::as_reference).expect("ref");
        let child = target.get_dictionary(child_id).expect("child in target");
        assert_eq!(child.get(b"Kind").and_then(Object::as_name).expect("name"), b"Leaf");
    }
}

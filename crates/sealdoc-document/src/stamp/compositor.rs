// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stamp compositor: merge a stamp overlay onto one page of an existing PDF.
//
// The target page's existing content streams are kept, in order, between a
// new `q` stream and a stream that starts with `Q`, followed by the overlay's
// drawing operations. The page's resources are copied onto the page itself
// before the overlay image is added, so pages sharing a resource dictionary
// are never affected.

use std::path::{Path, PathBuf};

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use sealdoc_core::Rectangle;
use sealdoc_core::error::{Result, SealdocError};
use tracing::{debug, info, instrument, warn};

use super::overlay::OverlayPlan;
use crate::output::write_atomically;
use crate::pdf::reader::{PdfReader, deep_clone_object, inherited_attribute, page_dict, resolve};

/// Prefix of the XObject name the stamp image is registered under.
const XOBJECT_PREFIX: &str = "SealdocStamp";

/// Stamp page `page_number` (1-indexed) of the PDF at `source` and write the
/// result to `output`, or back over `source` when `output` is `None`.
///
/// `target` must have finite coordinates and a positive size. Nothing is
/// written unless every step succeeds.
#[instrument(skip(source, image_bytes), fields(source = %source.display(), image_len = image_bytes.len()))]
pub fn composite(
    source: &Path,
    page_number: u32,
    target: Rectangle,
    image_bytes: &[u8],
    output: Option<&Path>,
) -> Result<PathBuf> {
    target.validate()?;
    let reader = PdfReader::open(source)?;
    let mut document = stamp_document(reader, page_number, target, image_bytes)?;
    let bytes = save(&mut document)?;

    let destination = output.unwrap_or(source).to_path_buf();
    write_atomically(&destination, &bytes)?;
    info!(output = %destination.display(), page_number, "Stamp applied");
    Ok(destination)
}

/// In-memory form of [`composite`].
pub fn composite_bytes(
    source_pdf: &[u8],
    page_number: u32,
    target: Rectangle,
    image_bytes: &[u8],
) -> Result<Vec<u8>> {
    target.validate()?;
    let reader = PdfReader::from_bytes(source_pdf)?;
    let mut document = stamp_document(reader, page_number, target, image_bytes)?;
    save(&mut document)
}

fn stamp_document(
    reader: PdfReader,
    page_number: u32,
    target: Rectangle,
    image_bytes: &[u8],
) -> Result<Document> {
    let page_id = reader.page_id(page_number)?;
    let media_box = reader.media_box(page_id)?;
    let plan = OverlayPlan::prepare(image_bytes, target, media_box)?;

    let mut document = reader.into_document();
    let (resources, xobjects) = page_resources(&document, page_id)?;
    let name = free_xobject_name(&xobjects);
    debug!(?page_id, %name, rect = %target, "Merging overlay");

    let overlay = plan.build_overlay(media_box, &name)?;
    merge_overlay(&mut document, page_id, resources, xobjects, &overlay)?;
    Ok(document)
}

fn save(document: &mut Document) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    document
        .save_to(&mut bytes)
        .map_err(|err| SealdocError::Pdf(format!("failed to serialise stamped PDF: {}", err)))?;
    Ok(bytes)
}

/// Owned copies of the page's effective Resources and its XObject subdictionary.
fn page_resources(document: &Document, page_id: ObjectId) -> Result<(Dictionary, Dictionary)> {
    let resources = match inherited_attribute(document, page_id, b"Resources")? {
        Some(object) => resolve(document, object)?
            .as_dict()
            .map_err(|err| SealdocError::Pdf(format!("Resources is not a dictionary: {}", err)))?
            .clone(),
        None => Dictionary::new(),
    };
    let xobjects = match resources.get(b"XObject") {
        Ok(object) => resolve(document, object)?
            .as_dict()
            .map_err(|err| SealdocError::Pdf(format!("XObject is not a dictionary: {}", err)))?
            .clone(),
        Err(_) => Dictionary::new(),
    };
    Ok((resources, xobjects))
}

fn free_xobject_name(xobjects: &Dictionary) -> String {
    (0..)
        .map(|n| format!("{XOBJECT_PREFIX}{n}"))
        .find(|name| !xobjects.has(name.as_bytes()))
        .unwrap_or_else(|| XOBJECT_PREFIX.to_string())
}

fn merge_overlay(
    document: &mut Document,
    page_id: ObjectId,
    mut resources: Dictionary,
    mut xobjects: Dictionary,
    overlay: &Document,
) -> Result<()> {
    let overlay_page = overlay
        .get_pages()
        .get(&1)
        .copied()
        .ok_or_else(|| SealdocError::Pdf("overlay has no page".to_string()))?;
    let overlay_content = overlay
        .get_page_content(overlay_page)
        .map_err(|err| SealdocError::Pdf(format!("cannot read overlay content: {}", err)))?;
    let (_, overlay_xobjects) = page_resources(overlay, overlay_page)?;

    for (name, object) in overlay_xobjects.iter() {
        let cloned = deep_clone_object(overlay, document, object)?;
        xobjects.set(name.clone(), cloned);
    }
    resources.set("XObject", xobjects);

    let existing = existing_content_refs(document, page_id)?;
    let open = document.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let mut closing = b"\nQ\n".to_vec();
    closing.extend_from_slice(&overlay_content);
    let close = document.add_object(Stream::new(Dictionary::new(), closing));

    let mut contents = Vec::with_capacity(existing.len() + 2);
    contents.push(Object::Reference(open));
    contents.extend(existing);
    contents.push(Object::Reference(close));

    let page = document
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|err| SealdocError::Pdf(format!("cannot update page {:?}: {}", page_id, err)))?;
    page.set("Contents", contents);
    page.set("Resources", resources);
    Ok(())
}

/// The page's content streams as a list of references, original order.
fn existing_content_refs(document: &mut Document, page_id: ObjectId) -> Result<Vec<Object>> {
    let contents = page_dict(document, page_id)?.get(b"Contents").ok().cloned();
    let refs = match contents {
        None => Vec::new(),
        Some(Object::Reference(id)) => match document.get_object(id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(id)],
        },
        Some(Object::Array(items)) => items,
        // Content streams must be indirect; lift a direct one out.
        Some(Object::Stream(stream)) => vec![Object::Reference(document.add_object(stream))],
        Some(_) => {
            warn!(?page_id, "Ignoring malformed page Contents");
            Vec::new()
        }
    };
    Ok(refs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::tests::{opaque_png, png_with_transparent_centre};
    use lopdf::content::Content;
    use lopdf::dictionary;

    const BLUE_FILL: &[u8] = b"0 0 1 rg\n0 0 595 842 re\nf\n";

    /// Two A4 pages sharing one Resources dictionary that already names
    /// `SealdocStamp0`. Page 1 is filled blue.
    fn source_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let existing_image = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 1,
                "Height" => 1,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            vec![0],
        ));
        let shared_resources = doc.add_object(dictionary! {
            "XObject" => dictionary! { "SealdocStamp0" => existing_image },
        });

        let blue = doc.add_object(Stream::new(Dictionary::new(), BLUE_FILL.to_vec()));
        let page_one = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => blue,
            "Resources" => shared_resources,
        });
        let blank = doc.add_object(Stream::new(Dictionary::new(), Vec::new()));
        let page_two = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => blank,
            "Resources" => shared_resources,
        });

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_one.into(), page_two.into()],
                "Count" => 2,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
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

    fn page(doc: &Document, number: u32) -> &Dictionary {
        let id = doc.get_pages()[&number];
        doc.get_dictionary(id).expect("page dict")
    }

    fn stamp_stream<'a>(doc: &'a Document, page: &Dictionary, name: &str) -> &'a Stream {
        let resources = page.get(b"Resources").and_then(Object::as_dict).expect("inline resources");
        let id = resources
            .get(b"XObject")
            .and_then(Object::as_dict)
            .and_then(|xobjects| xobjects.get(name.as_bytes()))
            .and_then(Object::as_reference)
            .expect("stamp xobject");
        doc.get_object(id).and_then(Object::as_stream).expect("stream")
    }

    #[test]
    fn transparent_pixel_is_masked_and_page_content_kept() {
        let stamped = composite_bytes(
            &source_pdf(),
            1,
            Rectangle::new(150.0, 200.0, 40.0),
            &png_with_transparent_centre(),
        )
        .expect("composite");
        let doc = Document::load_mem(&stamped).expect("load");
        let page_one = page(&doc, 1);

        let contents = page_one.get(b"Contents").and_then(Object::as_array).expect("array");
        assert_eq!(contents.len(), 3);
        let original = doc
            .get_object(contents[1].as_reference().expect("ref"))
            .and_then(Object::as_stream)
            .expect("original stream");
        assert_eq!(original.content, BLUE_FILL);

        // SealdocStamp0 is taken by the source document.
        let image = stamp_stream(&doc, page_one, "SealdocStamp1");
        let mask_id = image.dict.get(b"SMask").and_then(Object::as_reference).expect("smask");
        let alpha = doc
            .get_object(mask_id)
            .and_then(Object::as_stream)
            .and_then(Stream::decompressed_content)
            .expect("mask samples");
        assert_eq!(alpha[4 * 9 + 4], 0);
        assert_eq!(alpha[0], 255);
    }

    #[test]
    fn overlay_is_drawn_after_restoring_state() {
        let stamped = composite_bytes(
            &source_pdf(),
            1,
            Rectangle::new(150.0, 200.0, 40.0),
            &opaque_png(),
        )
        .expect("composite");
        let doc = Document::load_mem(&stamped).expect("load");
        let page_id = doc.get_pages()[&1];
        let content = Content::decode(&doc.get_page_content(page_id).expect("content"))
            .expect("decode");
        let operators: Vec<&str> = content.operations.iter().map(|op| op.operator.as_str()).collect();

        assert_eq!(operators.first(), Some(&"q"));
        let restore = operators.iter().rposition(|op| *op == "Q").expect("Q");
        let draw = operators.iter().position(|op| *op == "Do").expect("Do");
        // Outer q/Q, fill, then the overlay's own q cm Do Q.
        assert!(operators[..draw].contains(&"f"));
        assert!(draw < restore);
        assert_eq!(operators[draw - 1], "cm");
    }

    #[test]
    fn other_pages_and_shared_resources_untouched() {
        let source = source_pdf();
        let stamped = composite_bytes(&source, 1, Rectangle::new(10.0, 10.0, 20.0), &opaque_png())
            .expect("composite");

        let before = Document::load_mem(&source).expect("load source");
        let after = Document::load_mem(&stamped).expect("load stamped");
        for key in [b"Contents".as_slice(), b"Resources".as_slice()] {
            let reference = |doc: &Document| page(doc, 2).get(key).and_then(Object::as_reference).ok();
            assert_eq!(reference(&before), reference(&after));
        }

        let shared = page(&after, 2)
            .get(b"Resources")
            .and_then(Object::as_reference)
            .and_then(|id| after.get_dictionary(id))
            .expect("shared resources");
        let names = shared.get(b"XObject").and_then(Object::as_dict).expect("xobjects");
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn opaque_stamp_has_no_soft_mask() {
        let stamped = composite_bytes(&source_pdf(), 2, Rectangle::new(10.0, 10.0, 20.0), &opaque_png())
            .expect("composite");
        let doc = Document::load_mem(&stamped).expect("load");
        let image = stamp_stream(&doc, page(&doc, 2), "SealdocStamp1");
        assert!(image.dict.get(b"SMask").is_err());
    }

    #[test]
    fn out_of_range_page_leaves_source_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = dir.path().join("source.pdf");
        let output = dir.path().join("stamped.pdf");
        let original = source_pdf();
        std::fs::write(&source, &original).expect("write source");

        for page_number in [0, 3] {
            let err = composite(
                &source,
                page_number,
                Rectangle::new(150.0, 200.0, 40.0),
                &opaque_png(),
                Some(&output),
            )
            .unwrap_err();
            assert!(matches!(err, SealdocError::PageIndex { page_count: 2, .. }));
        }
        assert_eq!(std::fs::read(&source).expect("read source"), original);
        assert!(!output.exists());
    }

    #[test]
    fn degenerate_target_is_rejected_before_writing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = dir.path().join("source.pdf");
        let original = source_pdf();
        std::fs::write(&source, &original).expect("write source");

        for target in [
            Rectangle::new(150.0, 200.0, 0.0),
            Rectangle::new(150.0, 200.0, -40.0),
            Rectangle::new(150.0, 200.0, f64::NAN),
            Rectangle::new(f64::INFINITY, 200.0, 40.0),
        ] {
            let err = composite(&source, 1, target, &opaque_png(), None).unwrap_err();
            assert!(matches!(err, SealdocError::InvalidTarget(_)), "{target:?}");
            let err = composite_bytes(&original, 1, target, &opaque_png()).unwrap_err();
            assert!(matches!(err, SealdocError::InvalidTarget(_)), "{target:?}");
        }
        assert_eq!(std::fs::read(&source).expect("read source"), original);
        assert_eq!(std::fs::read_dir(dir.path()).expect("list").count(), 1);
    }

    #[test]
    fn default_output_overwrites_source() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = dir.path().join("source.pdf");
        let original = source_pdf();
        std::fs::write(&source, &original).expect("write source");

        let written = composite(&source, 1, Rectangle::new(150.0, 200.0, 40.0), &opaque_png(), None)
            .expect("composite");
        assert_eq!(written, source);
        let updated = std::fs::read(&source).expect("read");
        assert_ne!(updated, original);
        assert_eq!(Document::load_mem(&updated).expect("load").get_pages().len(), 2);
    }

    #[test]
    fn bad_inputs_map_to_typed_errors() {
        let rect = Rectangle::new(0.0, 0.0, 10.0);
        assert!(matches!(
            composite_bytes(&source_pdf(), 1, rect, b"not an image").unwrap_err(),
            SealdocError::ImageDecode(_)
        ));
        assert!(matches!(
            composite_bytes(b"not a pdf", 1, rect, &opaque_png()).unwrap_err(),
            SealdocError::Pdf(_)
        ));
        assert!(matches!(
            composite(Path::new("/nonexistent/in.pdf"), 1, rect, &opaque_png(), None).unwrap_err(),
            SealdocError::Io(_)
        ));
    }

    #[test]
    fn names_skip_existing_entries() {
        let mut xobjects = Dictionary::new();
        assert_eq!(free_xobject_name(&xobjects), "SealdocStamp0");
        xobjects.set("SealdocStamp0", Object::Null);
        xobjects.set("SealdocStamp1", Object::Null);
        assert_eq!(free_xobject_name(&xobjects), "SealdocStamp2");
    }
}

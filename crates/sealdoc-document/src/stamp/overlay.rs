// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stamp overlay: a one-page PDF, sized like the target page, holding only
// the stamp image (with its soft mask) at the requested square.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use sealdoc_core::error::{Result, SealdocError};
use sealdoc_core::geometry::{pt_to_mm, to_page_space};
use sealdoc_core::{PageRect, Rectangle};
use tracing::{debug, instrument, warn};

use crate::pdf::reader::MediaBox;
use crate::raster::StampRaster;

/// Everything one compositor call needs to draw the stamp.
#[derive(Debug)]
pub struct OverlayPlan {
    pub raster: StampRaster,
    /// Square in the target page's own coordinate system, in points.
    pub target: PageRect,
}

impl OverlayPlan {
    /// Decode `image_bytes` and map `rect` onto a page with `media_box`.
    #[instrument(skip(image_bytes), fields(bytes_len = image_bytes.len()))]
    pub fn prepare(image_bytes: &[u8], rect: Rectangle, media_box: MediaBox) -> Result<Self> {
        let raster = StampRaster::decode(image_bytes)?;
        let placed = to_page_space(rect, pt_to_mm(media_box.height()));
        // to_page_space assumes an origin at (0, 0); shift onto the MediaBox.
        let target = PageRect {
            x: placed.x + media_box.llx,
            y: placed.y + media_box.lly,
            size: placed.size,
        };
        debug!(?target, "Stamp target mapped to page space");
        Ok(Self { raster, target })
    }

    /// Content-stream operations drawing the image XObject `name`.
    pub fn operations(&self, name: &str) -> Vec<Operation> {
        let PageRect { x, y, size } = self.target;
        vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    (size as f32).into(),
                    0.into(),
                    0.into(),
                    (size as f32).into(),
                    (x as f32).into(),
                    (y as f32).into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ]
    }

    /// Add the image XObject (and its soft mask) to `doc`.
    pub fn add_image_xobject(&self, doc: &mut Document) -> lopdf::ObjectId {
        let raster = &self.raster;
        let mut image_dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(raster.width()),
            "Height" => i64::from(raster.height()),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        };

        if let Some(alpha) = raster.alpha() {
            let mut mask = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => i64::from(raster.width()),
                    "Height" => i64::from(raster.height()),
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                },
                alpha.to_vec(),
            );
            if let Err(err) = mask.compress() {
                warn!(%err, "Soft mask left uncompressed");
            }
            let mask_id = doc.add_object(mask);
            image_dict.set("SMask", mask_id);
        }

        let mut image = Stream::new(image_dict, raster.rgb().to_vec());
        if let Err(err) = image.compress() {
            warn!(%err, "Stamp image left uncompressed");
        }
        doc.add_object(image)
    }

    /// Build the standalone one-page overlay document.
    #[instrument(skip(self), fields(width = media_box.width(), height = media_box.height()))]
    pub fn build_overlay(&self, media_box: MediaBox, xobject_name: &str) -> Result<Document> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let image_id = self.add_image_xobject(&mut doc);
        let content = Content {
            operations: self.operations(xobject_name),
        };
        let encoded = content
            .encode()
            .map_err(|err| SealdocError::Pdf(format!("failed to encode overlay content: {}", err)))?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                (media_box.llx as f32).into(),
                (media_box.lly as f32).into(),
                (media_box.urx as f32).into(),
                (media_box.ury as f32).into(),
            ],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! { xobject_name => image_id },
            },
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        Ok(doc)
    }
}

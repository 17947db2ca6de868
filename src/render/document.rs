//! Document surface: watermark instances as PDF content operations.
//!
//! Each instance becomes one isolated text object:
//!
//! ```text
//! q /WmGS1 gs r g b rg BT /WmF1 size Tf a b c d e f Tm (text) Tj ET Q
//! ```
//!
//! The text matrix places the baseline-left anchor at `(x, h - y)` and
//! rotates by `-rotation`, turning the clockwise-on-page angle into PDF's
//! counter-clockwise convention. Text is shown in the standard Helvetica
//! font with WinAnsi encoding; opacity goes through one ExtGState per
//! distinct value.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::watermark::{Page, WatermarkInstance};

use super::encoding::encode_win_ansi;
use super::{precheck, DrawnMark, RenderAdapter, RenderSkip};

/// Resource name of the watermark font.
pub const FONT_RESOURCE: &str = "WmF1";

/// Prefix of the watermark ExtGState resource names.
const GSTATE_PREFIX: &str = "WmGS";

fn real(v: f64) -> Object {
    Object::Real(v as f32)
}

/// Content operations for the marks of one page.
#[derive(Debug, Clone)]
pub struct DocumentCanvas {
    page_height: f64,
    /// Lower-left corner of the page box
    origin: (f64, f64),
    operations: Vec<Operation>,
    /// Distinct opacities in first-use order; index `i` is `WmGS{i + 1}`
    opacities: Vec<f64>,
}

impl DocumentCanvas {
    pub fn new(page: &Page) -> Self {
        Self::with_origin(page, 0.0, 0.0)
    }

    /// Canvas for a page box whose lower-left corner is `(llx, lly)`.
    pub fn with_origin(page: &Page, llx: f64, lly: f64) -> Self {
        Self {
            page_height: page.height,
            origin: (llx, lly),
            operations: Vec::new(),
            opacities: Vec::new(),
        }
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Serialize the operations as a content stream.
    pub fn encode(&self) -> lopdf::Result<Vec<u8>> {
        Content {
            operations: self.operations.as_slice(),
        }
        .encode()
    }

    fn gstate_name(&mut self, opacity: f64) -> String {
        let index = match self
            .opacities
            .iter()
            .position(|o| o.to_bits() == opacity.to_bits())
        {
            Some(index) => index,
            None => {
                self.opacities.push(opacity);
                self.opacities.len() - 1
            }
        };
        format!("{}{}", GSTATE_PREFIX, index + 1)
    }

    /// ExtGState resources referenced by the operations.
    pub fn ext_gstates(&self) -> Dictionary {
        let mut states = Dictionary::new();
        for (i, opacity) in self.opacities.iter().enumerate() {
            let mut d = Dictionary::new();
            d.set("Type", "ExtGState");
            d.set("ca", real(*opacity));
            d.set("CA", real(*opacity));
            states.set(format!("{}{}", GSTATE_PREFIX, i + 1), Object::Dictionary(d));
        }
        states
    }

    /// Font dictionary for [`FONT_RESOURCE`].
    pub fn font_dictionary() -> Dictionary {
        let mut d = Dictionary::new();
        d.set("Type", "Font");
        d.set("Subtype", "Type1");
        d.set("BaseFont", "Helvetica");
        d.set("Encoding", "WinAnsiEncoding");
        d
    }

    /// Add the shared font object to a document.
    pub fn add_font(doc: &mut Document) -> ObjectId {
        doc.add_object(Object::Dictionary(Self::font_dictionary()))
    }

    /// Append the operations to a page and register their resources.
    ///
    /// Existing page content is wrapped in `q`/`Q` so a graphics state it
    /// leaves behind cannot distort the marks.
    pub fn install(
        &self,
        doc: &mut Document,
        page_id: ObjectId,
        font_id: ObjectId,
    ) -> lopdf::Result<()> {
        if self.is_empty() {
            return Ok(());
        }

        let mut resources = effective_resources(doc, page_id).unwrap_or_default();

        let mut fonts = resources
            .get(b"Font")
            .ok()
            .and_then(|o| obj_as_dict_owned(o, doc))
            .unwrap_or_default();
        fonts.set(FONT_RESOURCE, Object::Reference(font_id));
        resources.set("Font", Object::Dictionary(fonts));

        let mut states = resources
            .get(b"ExtGState")
            .ok()
            .and_then(|o| obj_as_dict_owned(o, doc))
            .unwrap_or_default();
        for (name, state) in self.ext_gstates().into_iter() {
            states.set(name, state);
        }
        resources.set("ExtGState", Object::Dictionary(states));

        let existing = doc.get_page_contents(page_id);
        let mut contents: Vec<Object> = Vec::with_capacity(existing.len() + 3);
        if !existing.is_empty() {
            let save = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
            let restore = doc.add_object(Stream::new(Dictionary::new(), b"\nQ\n".to_vec()));
            contents.push(Object::Reference(save));
            contents.extend(existing.into_iter().map(Object::Reference));
            contents.push(Object::Reference(restore));
        }
        let marks = doc.add_object(Stream::new(Dictionary::new(), self.encode()?));
        contents.push(Object::Reference(marks));

        let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
        page.set("Resources", Object::Dictionary(resources));
        page.set("Contents", Object::Array(contents));
        Ok(())
    }
}

impl RenderAdapter for DocumentCanvas {
    fn draw(&mut self, instance: &WatermarkInstance) -> Result<DrawnMark, RenderSkip> {
        precheck(instance)?;
        let text = encode_win_ansi(&instance.text)?;

        let x = instance.x;
        let y = self.page_height - instance.y;
        let angle = -instance.rotation;
        let (sin, cos) = angle.to_radians().sin_cos();
        let e = self.origin.0 + x;
        let f = self.origin.1 + y;
        if ![cos, sin, e, f].iter().all(|v| v.is_finite()) {
            return Err(RenderSkip::DegenerateTransform);
        }

        let gs = self.gstate_name(instance.opacity);
        let c = instance.color;

        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new("gs", vec![gs.as_str().into()]),
            Operation::new("rg", vec![real(c.r), real(c.g), real(c.b)]),
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![FONT_RESOURCE.into(), real(instance.font_size)]),
            Operation::new(
                "Tm",
                vec![real(cos), real(sin), real(-sin), real(cos), real(e), real(f)],
            ),
            Operation::new("Tj", vec![Object::String(text, StringFormat::Literal)]),
            Operation::new("ET", vec![]),
            Operation::new("Q", vec![]),
        ]);

        Ok(DrawnMark {
            x,
            y,
            rotation: angle,
            opacity: instance.opacity,
        })
    }
}

/// Recover marks from content operations.
///
/// Every `Tm` yields one mark: position from the translation relative to
/// `origin`, rotation from the matrix, opacity from the last `gs` looked up
/// in `ext_gstates`.
pub fn decode_marks(
    operations: &[Operation],
    ext_gstates: &Dictionary,
    origin: (f64, f64),
) -> Vec<DrawnMark> {
    let mut opacity = 1.0;
    let mut marks = Vec::new();

    for op in operations {
        match op.operator.as_str() {
            "gs" => {
                opacity = op
                    .operands
                    .first()
                    .and_then(|name| name.as_name().ok())
                    .and_then(|name| ext_gstates.get(name).ok())
                    .and_then(|state| state.as_dict().ok())
                    .and_then(|state| state.get(b"ca").ok())
                    .and_then(|ca| ca.as_float().ok())
                    .map(f64::from)
                    .unwrap_or(1.0);
            }
            "Tm" if op.operands.len() == 6 => {
                let m: Vec<f64> = op
                    .operands
                    .iter()
                    .filter_map(|o| o.as_float().ok().map(f64::from))
                    .collect();
                if m.len() == 6 {
                    marks.push(DrawnMark {
                        x: m[4] - origin.0,
                        y: m[5] - origin.1,
                        rotation: m[1].atan2(m[0]).to_degrees(),
                        opacity,
                    });
                }
            }
            _ => {}
        }
    }

    marks
}

/// Page resources, following `Parent` links when the page has none.
pub fn effective_resources(doc: &Document, page_id: ObjectId) -> Option<Dictionary> {
    let mut current = doc.get_dictionary(page_id).ok()?;
    loop {
        if let Ok(obj) = current.get(b"Resources") {
            return obj_as_dict_owned(obj, doc);
        }
        match current.get(b"Parent") {
            Ok(Object::Reference(parent)) => current = doc.get_dictionary(*parent).ok()?,
            _ => return None,
        }
    }
}

/// Page box `(llx, lly, urx, ury)` from `MediaBox`, following `Parent` links.
pub fn effective_media_box(doc: &Document, page_id: ObjectId) -> Option<(f64, f64, f64, f64)> {
    let mut current = doc.get_dictionary(page_id).ok()?;
    loop {
        if let Ok(obj) = current.get(b"MediaBox") {
            let array = match obj {
                Object::Reference(id) => doc.get_object(*id).ok()?.as_array().ok()?,
                other => other.as_array().ok()?,
            };
            if array.len() != 4 {
                return None;
            }
            let v: Vec<f64> = array
                .iter()
                .filter_map(|o| o.as_float().ok().map(f64::from))
                .collect();
            if v.len() != 4 {
                return None;
            }
            // Normalize so that ll is the lower-left corner
            return Some((v[0].min(v[2]), v[1].min(v[3]), v[0].max(v[2]), v[1].max(v[3])));
        }
        match current.get(b"Parent") {
            Ok(Object::Reference(parent)) => current = doc.get_dictionary(*parent).ok()?,
            _ => return None,
        }
    }
}

fn obj_as_dict_owned(obj: &Object, doc: &Document) -> Option<Dictionary> {
    match obj {
        Object::Dictionary(d) => Some(d.clone()),
        Object::Reference(id) => doc.get_dictionary(*id).ok().cloned(),
        _ => None,
    }
}

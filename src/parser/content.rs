//! Span extraction from page content streams.
//!
//! Walks the text-showing operators of a page and records one [`Span`] per
//! shown string, with its font, effective size and an estimated box in
//! top-left page coordinates. Positions go through the text matrix and the
//! current transformation matrix (`q`/`Q`/`cm`).

use std::collections::HashMap;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::{BBox, Span, ASCENT, DESCENT};

/// TJ adjustments beyond this (thousandths of an em) read as word spaces.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Geometry of the page the spans are placed on.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PageFrame {
    /// Page number (1-indexed)
    pub number: u32,
    /// Lower-left y of the MediaBox
    pub origin_y: f32,
    /// Page height in points
    pub height: f32,
}

impl PageFrame {
    /// Box of a run starting at baseline (`x`, `y`) in PDF user space.
    fn bbox(&self, x: f32, y: f32, width: f32, size: f32) -> BBox {
        let baseline = self.height - (y - self.origin_y);
        BBox::new(x, baseline - size * ASCENT, x + width, baseline + size * DESCENT)
    }
}

/// Extract every text span shown on a page.
pub(crate) fn extract_page_spans(
    doc: &LopdfDocument,
    page_id: ObjectId,
    frame: PageFrame,
) -> Result<Vec<Span>> {
    let fonts = doc
        .get_page_fonts(page_id)
        .map_err(|e| Error::PdfParse(e.to_string()))?;

    let mut base_fonts = HashMap::new();
    let mut encodings = HashMap::new();
    for (name, font) in &fonts {
        let base_font = font
            .get(b"BaseFont")
            .ok()
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string())
            .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
        base_fonts.insert(name.clone(), base_font);

        if let Ok(encoding) = font.get_font_encoding(doc) {
            encodings.insert(name.clone(), encoding);
        }
    }

    let data = doc
        .get_page_content(page_id)
        .map_err(|e| Error::TextExtract(format!("Page {}: {}", frame.number, e)))?;
    let content = lopdf::content::Content::decode(&data)
        .map_err(|e| Error::TextExtract(format!("Page {}: {}", frame.number, e)))?;

    let decode = |font: &[u8], bytes: &[u8]| -> String {
        match encodings.get(font) {
            Some(enc) => LopdfDocument::decode_text(enc, bytes)
                .unwrap_or_else(|_| decode_text_simple(bytes)),
            None => decode_text_simple(bytes),
        }
    };

    let mut spans = Vec::new();
    let mut state = TextState::default();
    let mut current_font: Vec<u8> = Vec::new();
    let mut in_text_block = false;

    for op in &content.operations {
        let operands = &op.operands;
        match op.operator.as_str() {
            "q" => state.save(),
            "Q" => state.restore(),
            "cm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    state.concat(m);
                }
            }
            "BT" => {
                in_text_block = true;
                state.matrix = TextMatrix::default();
            }
            "ET" => in_text_block = false,
            "Tf" => {
                if let [Object::Name(name), size, ..] = operands.as_slice() {
                    current_font = name.clone();
                    state.font_size = get_number(size).unwrap_or(12.0);
                }
            }
            "TL" => {
                if let Some(leading) = operands.first().and_then(get_number) {
                    state.leading = leading;
                }
            }
            "Td" | "TD" => {
                if let [tx, ty, ..] = operands.as_slice() {
                    let tx = get_number(tx).unwrap_or(0.0);
                    let ty = get_number(ty).unwrap_or(0.0);
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.matrix.translate(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    state.matrix.set(m);
                }
            }
            "T*" => state.matrix.next_line(state.leading),
            "Tj" | "TJ" | "'" | "\"" => {
                if op.operator == "'" || op.operator == "\"" {
                    state.matrix.next_line(state.leading);
                }
                if !in_text_block {
                    continue;
                }

                let text = match op.operator.as_str() {
                    "TJ" => match operands.first() {
                        Some(Object::Array(items)) => {
                            decode_tj_array(items, |bytes| decode(&current_font, bytes))
                        }
                        _ => String::new(),
                    },
                    "\"" => match operands.get(2) {
                        Some(Object::String(bytes, _)) => decode(&current_font, bytes),
                        _ => String::new(),
                    },
                    _ => match operands.first() {
                        Some(Object::String(bytes, _)) => decode(&current_font, bytes),
                        _ => String::new(),
                    },
                };

                if text.trim().is_empty() {
                    continue;
                }

                let chars = text.chars().count() as f32;
                let trm = state.text_to_user();
                let size = state.font_size * trm.vertical_scale();
                let width = chars * size * 0.5;
                let (x, y) = trm.translation();
                let font_name = base_fonts
                    .get(&current_font)
                    .cloned()
                    .unwrap_or_else(|| String::from_utf8_lossy(&current_font).to_string());

                spans.push(Span::new(
                    text,
                    size,
                    font_name,
                    frame.bbox(x, y, width, size),
                    frame.number,
                ));
                state.matrix.advance(chars * state.font_size * 0.5);
            }
            _ => {}
        }
    }

    Ok(spans)
}

/// Decode the array operand of `TJ`, turning large negative kerning into spaces.
fn decode_tj_array(items: &[Object], mut decode: impl FnMut(&[u8]) -> String) -> String {
    let mut combined = String::new();
    for item in items {
        match item {
            Object::String(bytes, _) => combined.push_str(&decode(bytes)),
            other => {
                let Some(adjustment) = get_number(other) else {
                    continue;
                };
                // Negative values move the pen right
                if -adjustment > TJ_SPACE_THRESHOLD
                    && !combined.is_empty()
                    && !combined.ends_with(' ')
                    && !combined.ends_with('\u{00A0}')
                    && !combined.chars().last().is_some_and(is_spaceless_script_char)
                {
                    combined.push(' ');
                }
            }
        }
    }
    combined
}

/// Graphics and text state that outlives a single operator.
#[derive(Debug, Clone)]
struct TextState {
    matrix: TextMatrix,
    /// Current transformation matrix
    ctm: Matrix,
    /// CTMs saved by `q`
    saved: Vec<Matrix>,
    font_size: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            matrix: TextMatrix::default(),
            ctm: Matrix::IDENTITY,
            saved: Vec::new(),
            font_size: 12.0,
            leading: 12.0,
        }
    }
}

impl TextState {
    fn save(&mut self) {
        self.saved.push(self.ctm);
    }

    /// `Q` without a matching `q` leaves the CTM alone.
    fn restore(&mut self) {
        if let Some(ctm) = self.saved.pop() {
            self.ctm = ctm;
        }
    }

    /// `cm`: the new matrix applies before the current one.
    fn concat(&mut self, m: Matrix) {
        self.ctm = m.multiply(&self.ctm);
    }

    /// Text space to user space: Tm x CTM.
    fn text_to_user(&self) -> Matrix {
        self.matrix.current.multiply(&self.ctm)
    }
}

/// Affine matrix `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    const fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    fn from_operands(operands: &[Object]) -> Option<Self> {
        if operands.len() < 6 {
            return None;
        }
        let n: Vec<f32> = operands[..6]
            .iter()
            .map(|o| get_number(o).unwrap_or(0.0))
            .collect();
        Some(Self::new(n[0], n[1], n[2], n[3], n[4], n[5]))
    }

    /// `self x other`.
    fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn translation(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    /// Length of the transformed unit vertical, i.e. the glyph height factor.
    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Text matrix plus the start of the current line.
#[derive(Debug, Clone)]
struct TextMatrix {
    current: Matrix,
    line: Matrix,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            current: Matrix::IDENTITY,
            line: Matrix::IDENTITY,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, m: Matrix) {
        self.current = m;
        self.line = m;
    }

    /// `Td`: move to the start of the next line, offset from the current one.
    fn translate(&mut self, tx: f32, ty: f32) {
        self.line = Matrix::new(1.0, 0.0, 0.0, 1.0, tx, ty).multiply(&self.line);
        self.current = self.line;
    }

    fn next_line(&mut self, leading: f32) {
        self.translate(0.0, -leading);
    }

    /// Move the pen right after showing text `width` text-space units wide.
    fn advance(&mut self, width: f32) {
        self.current = Matrix::new(1.0, 0.0, 0.0, 1.0, width, 0.0).multiply(&self.current);
    }

    fn position(&self) -> (f32, f32) {
        self.current.translation()
    }

    fn scale(&self) -> f32 {
        self.current.vertical_scale()
    }
}

/// Helper to extract number from PDF object.
pub(crate) fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Check if character is from a script that doesn't use word spaces.
///
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and Extension A
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    // Hiragana and Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

/// Simple text decoding fallback when no encoding is available.
pub(crate) fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let utf16: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

//! Content stream construction.
//!
//! A [`ContentStream`] accumulates an ordered sequence of [`DrawOp`]s, the
//! composer's output vocabulary, and serializes them into PDF content
//! operators (ISO 32000-1:2008 §8-9).

use super::font::{encode_win_ansi, Font};
use super::object::write_escaped;
use std::io::Write;

/// One drawing operation in a page's content.
#[derive(Debug, Clone)]
pub enum DrawOp {
    /// Save graphics state (q)
    SaveState,
    /// Restore graphics state (Q)
    RestoreState,
    /// Begin text object (BT)
    BeginText,
    /// End text object (ET)
    EndText,
    /// Set font and size (Tf)
    SetFont(Font, f32),
    /// Move text position (Td)
    TextPosition(f32, f32),
    /// Show text (Tj), WinAnsi-encoded at write time
    ShowText(String),
    /// Set fill gray level (g)
    SetFillGray(f32),
    /// Set stroke color RGB (RG)
    SetStrokeRgb(f32, f32, f32),
    /// Set line width (w)
    SetLineWidth(f32),
    /// Move to (m)
    MoveTo(f32, f32),
    /// Line to (l)
    LineTo(f32, f32),
    /// Rectangle (re)
    Rect(f32, f32, f32, f32),
    /// Stroke the current path (S)
    Stroke,
    /// Fill the current path (f)
    Fill,
}

/// Builder for one page's content stream.
#[derive(Debug, Clone, Default)]
pub struct ContentStream {
    ops: Vec<DrawOp>,
}

impl ContentStream {
    /// Create an empty content stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw operation.
    pub fn op(&mut self, op: DrawOp) -> &mut Self {
        self.ops.push(op);
        self
    }

    /// Show a single text run at a baseline position.
    pub fn show_text(&mut self, font: Font, size: f32, x: f32, y: f32, text: &str) -> &mut Self {
        self.op(DrawOp::BeginText)
            .op(DrawOp::SetFont(font, size))
            .op(DrawOp::TextPosition(x, y))
            .op(DrawOp::ShowText(text.to_string()))
            .op(DrawOp::EndText)
    }

    /// Fill a rectangle with a gray level, preserving surrounding state.
    pub fn fill_rect_gray(&mut self, x: f32, y: f32, w: f32, h: f32, gray: f32) -> &mut Self {
        self.op(DrawOp::SaveState)
            .op(DrawOp::SetFillGray(gray))
            .op(DrawOp::Rect(x, y, w, h))
            .op(DrawOp::Fill)
            .op(DrawOp::RestoreState)
    }

    /// Stroke a horizontal or arbitrary line segment.
    pub fn stroke_line(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        rgb: (f32, f32, f32),
        width: f32,
    ) -> &mut Self {
        self.op(DrawOp::SaveState)
            .op(DrawOp::SetStrokeRgb(rgb.0, rgb.1, rgb.2))
            .op(DrawOp::SetLineWidth(width))
            .op(DrawOp::MoveTo(x1, y1))
            .op(DrawOp::LineTo(x2, y2))
            .op(DrawOp::Stroke)
            .op(DrawOp::RestoreState)
    }

    /// Serialize all operations to operator bytes.
    pub fn build(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        for op in &self.ops {
            // Writes to Vec<u8> cannot fail.
            let _ = write_op(&mut buf, op);
            let _ = writeln!(buf);
        }
        buf
    }
}

/// Write a single operation to the buffer.
fn write_op<W: Write>(w: &mut W, op: &DrawOp) -> std::io::Result<()> {
    match op {
        DrawOp::SaveState => write!(w, "q"),
        DrawOp::RestoreState => write!(w, "Q"),
        DrawOp::BeginText => write!(w, "BT"),
        DrawOp::EndText => write!(w, "ET"),
        DrawOp::SetFont(font, size) => {
            write!(w, "/{} ", font.resource_name())?;
            write_num(w, *size)?;
            write!(w, " Tf")
        },
        DrawOp::TextPosition(x, y) => write_coords(w, &[*x, *y], "Td"),
        DrawOp::ShowText(text) => {
            write!(w, "(")?;
            write_escaped(w, &encode_win_ansi(text))?;
            write!(w, ") Tj")
        },
        DrawOp::SetFillGray(g) => {
            write_num(w, *g)?;
            write!(w, " g")
        },
        DrawOp::SetStrokeRgb(r, g, b) => write_coords(w, &[*r, *g, *b], "RG"),
        DrawOp::SetLineWidth(width) => {
            write_num(w, *width)?;
            write!(w, " w")
        },
        DrawOp::MoveTo(x, y) => write_coords(w, &[*x, *y], "m"),
        DrawOp::LineTo(x, y) => write_coords(w, &[*x, *y], "l"),
        DrawOp::Rect(x, y, width, height) => write_coords(w, &[*x, *y, *width, *height], "re"),
        DrawOp::Stroke => write!(w, "S"),
        DrawOp::Fill => write!(w, "f"),
    }
}

/// Write operands followed by an operator keyword.
fn write_coords<W: Write>(w: &mut W, values: &[f32], operator: &str) -> std::io::Result<()> {
    for v in values {
        write_num(w, *v)?;
        write!(w, " ")?;
    }
    write!(w, "{}", operator)
}

/// Write a number with trimmed trailing zeros (two-decimal precision is
/// plenty for layout units).
fn write_num<W: Write>(w: &mut W, value: f32) -> std::io::Result<()> {
    if value.fract() == 0.0 {
        write!(w, "{}", value as i64)
    } else {
        let formatted = format!("{:.2}", value);
        write!(w, "{}", formatted.trim_end_matches('0').trim_end_matches('.'))
    }
}

//! Minimal PDF encoder for invoice documents.
//!
//! Turns an ordered sequence of draw operations into a complete PDF file:
//! header, body objects, cross-reference table, and trailer, per
//! ISO 32000-1:2008. Only what invoice layout needs is implemented: the two
//! Base-14 Helvetica faces, text, rectangles, and lines, with optional
//! FlateDecode compression of content streams.

pub mod content;
pub mod document;
pub mod font;
pub mod object;

pub use content::{ContentStream, DrawOp};
pub use document::{DocumentConfig, DocumentWriter};
pub use font::Font;
pub use object::{Object, ObjectRef};

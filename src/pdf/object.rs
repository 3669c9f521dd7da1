//! PDF object model and serialization.
//!
//! Objects serialize to the byte syntax of ISO 32000-1:2008 §7.3.
//! Dictionaries are backed by a `BTreeMap` so output is deterministic
//! without an explicit sort pass.

use std::collections::BTreeMap;
use std::io::Write;

/// Reference to an indirect object (id + generation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectRef {
    /// Object number.
    pub id: u32,
    /// Generation number.
    pub gen: u16,
}

impl ObjectRef {
    /// Create a new object reference.
    pub fn new(id: u32, gen: u16) -> Self {
        Self { id, gen }
    }
}

/// A PDF object.
#[derive(Debug, Clone)]
pub enum Object {
    /// The null object.
    Null,
    /// Boolean value.
    Boolean(bool),
    /// Integer number.
    Integer(i64),
    /// Real number.
    Real(f64),
    /// String (literal or hex syntax is chosen at write time).
    String(Vec<u8>),
    /// Name, written with a leading slash.
    Name(String),
    /// Array of objects.
    Array(Vec<Object>),
    /// Dictionary with name keys.
    Dictionary(BTreeMap<String, Object>),
    /// Stream: dictionary plus raw data. `Length` is filled in at write
    /// time if absent.
    Stream {
        /// Stream dictionary.
        dict: BTreeMap<String, Object>,
        /// Raw (possibly compressed) stream bytes.
        data: Vec<u8>,
    },
    /// Reference to an indirect object.
    Reference(ObjectRef),
}

impl Object {
    /// Name object from a string.
    pub fn name(s: &str) -> Object {
        Object::Name(s.to_string())
    }

    /// String object from UTF-8 text.
    pub fn string(s: &str) -> Object {
        Object::String(s.as_bytes().to_vec())
    }

    /// Reference object.
    pub fn reference(id: u32) -> Object {
        Object::Reference(ObjectRef::new(id, 0))
    }

    /// Dictionary object from key/value pairs.
    pub fn dict(entries: Vec<(&str, Object)>) -> Object {
        Object::Dictionary(Self::map(entries))
    }

    /// Dictionary map from key/value pairs.
    pub fn map(entries: Vec<(&str, Object)>) -> BTreeMap<String, Object> {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    /// Serialize this object to bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        // Writes to Vec<u8> cannot fail.
        let _ = self.write_to(&mut buf);
        buf
    }

    /// Serialize as an indirect object definition:
    /// `{id} {gen} obj ... endobj`.
    pub fn to_indirect_bytes(&self, id: u32, gen: u16) -> Vec<u8> {
        let mut buf = Vec::new();
        let _ = writeln!(buf, "{} {} obj", id, gen);
        let _ = self.write_to(&mut buf);
        let _ = write!(buf, "\nendobj\n");
        buf
    }

    /// Write this object to a writer.
    pub fn write_to<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        match self {
            Object::Null => write!(w, "null"),
            Object::Boolean(b) => write!(w, "{}", if *b { "true" } else { "false" }),
            Object::Integer(i) => write!(w, "{}", i),
            Object::Real(r) => write_real(w, *r),
            Object::String(data) => write_string(w, data),
            Object::Name(n) => write_name(w, n),
            Object::Array(items) => {
                write!(w, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(w, " ")?;
                    }
                    item.write_to(w)?;
                }
                write!(w, "]")
            },
            Object::Dictionary(dict) => write_dictionary(w, dict),
            Object::Stream { dict, data } => {
                let mut dict = dict.clone();
                dict.entry("Length".to_string())
                    .or_insert(Object::Integer(data.len() as i64));
                write_dictionary(w, &dict)?;
                write!(w, "\nstream\n")?;
                w.write_all(data)?;
                write!(w, "\nendstream")
            },
            Object::Reference(r) => write!(w, "{} {} R", r.id, r.gen),
        }
    }
}

/// Write a real number, trimming trailing zeros for compact output.
fn write_real<W: Write>(w: &mut W, value: f64) -> std::io::Result<()> {
    if value.fract() == 0.0 {
        write!(w, "{}", value as i64)
    } else {
        let formatted = format!("{:.5}", value);
        write!(w, "{}", formatted.trim_end_matches('0').trim_end_matches('.'))
    }
}

/// Write a string: literal `(...)` syntax when printable, hex otherwise.
fn write_string<W: Write>(w: &mut W, data: &[u8]) -> std::io::Result<()> {
    let printable = data
        .iter()
        .all(|&b| b == b'\n' || b == b'\r' || b == b'\t' || (0x20..=0x7E).contains(&b));

    if printable {
        write!(w, "(")?;
        write_escaped(w, data)?;
        write!(w, ")")
    } else {
        write!(w, "<")?;
        for byte in data {
            write!(w, "{:02X}", byte)?;
        }
        write!(w, ">")
    }
}

/// Escape the bytes of a literal string body.
pub(crate) fn write_escaped<W: Write>(w: &mut W, data: &[u8]) -> std::io::Result<()> {
    for &byte in data {
        match byte {
            b'(' => write!(w, "\\(")?,
            b')' => write!(w, "\\)")?,
            b'\\' => write!(w, "\\\\")?,
            b'\n' => write!(w, "\\n")?,
            b'\r' => write!(w, "\\r")?,
            b'\t' => write!(w, "\\t")?,
            _ => w.write_all(&[byte])?,
        }
    }
    Ok(())
}

/// Write a name, escaping delimiter and non-regular bytes as `#xx`.
fn write_name<W: Write>(w: &mut W, name: &str) -> std::io::Result<()> {
    write!(w, "/")?;
    for byte in name.bytes() {
        let regular = byte.is_ascii_graphic()
            && !matches!(byte, b'#' | b'/' | b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'%');
        if regular {
            w.write_all(&[byte])?;
        } else {
            write!(w, "#{:02X}", byte)?;
        }
    }
    Ok(())
}

/// Write a dictionary with `<< ... >>` delimiters.
fn write_dictionary<W: Write>(
    w: &mut W,
    dict: &BTreeMap<String, Object>,
) -> std::io::Result<()> {
    write!(w, "<<")?;
    for (key, value) in dict {
        write!(w, " ")?;
        write_name(w, key)?;
        write!(w, " ")?;
        value.write_to(w)?;
    }
    write!(w, " >>")
}

//! Polymorphic JSON encoding.
//!
//! Values that serde_json cannot represent directly (vectors, export
//! records) declare up front what shape they have by returning an [`Item`].
//! An [`EncoderChain`] offers that item to each of its encoders in order;
//! the first encoder that accepts it produces the JSON value.

mod encoders;

pub use encoders::{NativeEncoder, RecordEncoder, VectorEncoder};

use crate::error::{ExportError, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

/// Default indentation width for rendered documents.
pub const DEFAULT_INDENT: usize = 4;

/// Component access for 2-, 3- and 4-component vectors.
///
/// `x` and `y` are always present. Higher components are probed; the
/// highest one present decides the arity.
pub trait VectorComponents {
    fn x(&self) -> f64;
    fn y(&self) -> f64;
    fn z(&self) -> Option<f64> {
        None
    }
    fn w(&self) -> Option<f64> {
        None
    }
}

/// A value that knows how to turn itself into a JSON-safe structure.
///
/// Nested values are encoded through the same chain that is encoding `self`.
pub trait ToJson {
    fn to_json(&self, chain: &EncoderChain) -> Result<Value>;
}

/// The declared encoding shape of a value.
pub enum Item<'a> {
    /// A vector, encoded as a plain numeric array.
    Vector(&'a dyn VectorComponents),
    /// A self-describing record.
    Record(&'a dyn ToJson),
    /// Something that already is a JSON value.
    Native(Value),
    /// A container whose elements are encoded one by one.
    Sequence(Vec<&'a dyn Encodable>),
    /// Nothing the standard encoders understand.
    Opaque,
}

/// Implemented by every type that can be handed to an [`EncoderChain`].
pub trait Encodable {
    fn item(&self) -> Item<'_>;

    /// Type name reported when no encoder accepts the value.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// One link in the chain.
///
/// Returns `Ok(None)` to decline, letting the next encoder try.
pub trait Encoder {
    fn name(&self) -> &'static str;
    fn try_encode(&self, item: &Item<'_>, chain: &EncoderChain) -> Result<Option<Value>>;
}

/// An ordered list of encoders tried first to last.
pub struct EncoderChain {
    encoders: Vec<Box<dyn Encoder>>,
    indent: usize,
}

impl EncoderChain {
    /// Create a chain that owns exactly the given encoders.
    pub fn new(encoders: Vec<Box<dyn Encoder>>) -> Self {
        Self {
            encoders,
            indent: DEFAULT_INDENT,
        }
    }

    /// Vector, then record, then native encoding.
    ///
    /// Every call builds a fresh encoder list.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(VectorEncoder),
            Box::new(RecordEncoder),
            Box::new(NativeEncoder),
        ])
    }

    /// Set the indentation width used by [`to_string_pretty`](Self::to_string_pretty).
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Names of the registered encoders, in the order they are tried.
    pub fn encoder_names(&self) -> Vec<&'static str> {
        self.encoders.iter().map(|e| e.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }

    /// Encode a single value.
    pub fn encode<T: Encodable + ?Sized>(&self, value: &T) -> Result<Value> {
        if self.encoders.is_empty() {
            return Err(ExportError::EmptyEncoderChain);
        }

        let item = value.item();
        for encoder in &self.encoders {
            if let Some(encoded) = encoder.try_encode(&item, self)? {
                return Ok(encoded);
            }
        }

        Err(ExportError::Unencodable {
            type_name: value.type_name(),
        })
    }

    /// Encode a value and render it as an indented JSON document.
    pub fn to_string_pretty<T: Encodable + ?Sized>(&self, value: &T) -> Result<String> {
        let encoded = self.encode(value)?;

        let indent = " ".repeat(self.indent);
        let formatter = PrettyFormatter::with_indent(indent.as_bytes());
        let mut buf = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        encoded.serialize(&mut serializer)?;

        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl Default for EncoderChain {
    fn default() -> Self {
        Self::standard()
    }
}

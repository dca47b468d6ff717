//! The standard encoders and `Encodable` impls for built-in types.

use super::{Encodable, Encoder, EncoderChain, Item, VectorComponents};
use crate::error::Result;
use crate::types::{Vector2, Vector3, Vector4};
use serde_json::{Number, Value};

/// Encodes vectors as plain arrays of 2, 3 or 4 numbers.
pub struct VectorEncoder;

impl Encoder for VectorEncoder {
    fn name(&self) -> &'static str {
        "vector"
    }

    fn try_encode(&self, item: &Item<'_>, _chain: &EncoderChain) -> Result<Option<Value>> {
        let Item::Vector(v) = item else {
            return Ok(None);
        };

        let components = match (v.z(), v.w()) {
            (Some(z), Some(w)) => vec![v.x(), v.y(), z, w],
            (Some(z), None) => vec![v.x(), v.y(), z],
            _ => vec![v.x(), v.y()],
        };

        Ok(Some(Value::Array(components.into_iter().map(number).collect())))
    }
}

/// Encodes self-describing records through their own conversion.
pub struct RecordEncoder;

impl Encoder for RecordEncoder {
    fn name(&self) -> &'static str {
        "record"
    }

    fn try_encode(&self, item: &Item<'_>, chain: &EncoderChain) -> Result<Option<Value>> {
        match item {
            Item::Record(record) => record.to_json(chain).map(Some),
            _ => Ok(None),
        }
    }
}

/// Passes JSON values through and walks sequences element by element.
pub struct NativeEncoder;

impl Encoder for NativeEncoder {
    fn name(&self) -> &'static str {
        "native"
    }

    fn try_encode(&self, item: &Item<'_>, chain: &EncoderChain) -> Result<Option<Value>> {
        match item {
            Item::Native(value) => Ok(Some(value.clone())),
            Item::Sequence(elements) => elements
                .iter()
                .map(|e| chain.encode(*e))
                .collect::<Result<Vec<_>>>()
                .map(|values| Some(Value::Array(values))),
            _ => Ok(None),
        }
    }
}

/// Non-finite floats have no JSON representation and become `null`.
fn number(value: f64) -> Value {
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}

impl VectorComponents for Vector2 {
    fn x(&self) -> f64 {
        Vector2::x(self)
    }
    fn y(&self) -> f64 {
        Vector2::y(self)
    }
}

impl VectorComponents for Vector3 {
    fn x(&self) -> f64 {
        Vector3::x(self)
    }
    fn y(&self) -> f64 {
        Vector3::y(self)
    }
    fn z(&self) -> Option<f64> {
        Some(Vector3::z(self))
    }
}

impl VectorComponents for Vector4 {
    fn x(&self) -> f64 {
        Vector4::x(self)
    }
    fn y(&self) -> f64 {
        Vector4::y(self)
    }
    fn z(&self) -> Option<f64> {
        Some(Vector4::z(self))
    }
    fn w(&self) -> Option<f64> {
        Some(Vector4::w(self))
    }
}

macro_rules! encodable_vector {
    ($($t:ty),+) => {
        $(
            impl Encodable for $t {
                fn item(&self) -> Item<'_> {
                    Item::Vector(self)
                }
            }
        )+
    };
}

encodable_vector!(Vector2, Vector3, Vector4);

macro_rules! encodable_native {
    ($($t:ty),+) => {
        $(
            impl Encodable for $t {
                fn item(&self) -> Item<'_> {
                    Item::Native(Value::from(self.clone()))
                }
            }
        )+
    };
}

encodable_native!(bool, i32, i64, u32, u64, usize, String);

impl Encodable for f64 {
    fn item(&self) -> Item<'_> {
        Item::Native(number(*self))
    }
}

impl Encodable for str {
    fn item(&self) -> Item<'_> {
        Item::Native(Value::from(self))
    }
}

impl Encodable for Value {
    fn item(&self) -> Item<'_> {
        Item::Native(self.clone())
    }
}

impl<T: Encodable> Encodable for Option<T> {
    fn item(&self) -> Item<'_> {
        match self {
            Some(value) => value.item(),
            None => Item::Native(Value::Null),
        }
    }
}

impl<T: Encodable> Encodable for [T] {
    fn item(&self) -> Item<'_> {
        Item::Sequence(self.iter().map(|e| e as &dyn Encodable).collect())
    }
}

impl<T: Encodable> Encodable for Vec<T> {
    fn item(&self) -> Item<'_> {
        self.as_slice().item()
    }
}

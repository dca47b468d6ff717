//! Frozen float vectors.
//!
//! Values read from the scene are copied into these types before they are
//! stored or used as keys. They have no mutating API, so a constructed
//! vector is already its frozen form.

use glam::{DVec2, DVec3, DVec4};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Bit pattern used for equality and hashing.
///
/// Comparison is exact. Negative zero is folded into positive zero so that
/// `Eq` and `Hash` agree with each other.
#[inline]
fn key_bits(value: f64) -> u64 {
    if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}

macro_rules! frozen_vector {
    ($(#[$meta:meta])* $name:ident, $glam:ty, $n:literal, $array:tt, [$($field:ident),+]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Serialize, Deserialize)]
        #[serde(from = $array, into = $array)]
        pub struct $name {
            $($field: f64),+
        }

        impl $name {
            pub const fn new($($field: f64),+) -> Self {
                Self { $($field),+ }
            }

            $(
                #[inline]
                pub const fn $field(&self) -> f64 {
                    self.$field
                }
            )+

            /// Return an immutable copy suitable for use as a map key.
            pub const fn frozen(&self) -> Self {
                *self
            }

            pub const fn to_array(&self) -> [f64; $n] {
                [$(self.$field),+]
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                $(key_bits(self.$field) == key_bits(other.$field))&&+
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                $(key_bits(self.$field).hash(state);)+
            }
        }

        impl From<[f64; $n]> for $name {
            fn from(a: [f64; $n]) -> Self {
                let [$($field),+] = a;
                Self { $($field),+ }
            }
        }

        impl From<$name> for [f64; $n] {
            fn from(v: $name) -> Self {
                v.to_array()
            }
        }

        impl From<$glam> for $name {
            fn from(v: $glam) -> Self {
                Self { $($field: v.$field),+ }
            }
        }

        impl From<$name> for $glam {
            fn from(v: $name) -> Self {
                <$glam>::new($(v.$field),+)
            }
        }
    };
}

frozen_vector!(
    /// A 2D vector, used for UV coordinates.
    Vector2, DVec2, 2, "[f64; 2]", [x, y]
);
frozen_vector!(
    /// A 3D vector, used for positions and normals.
    Vector3, DVec3, 3, "[f64; 3]", [x, y, z]
);
frozen_vector!(
    /// A 4D vector, used for RGBA colors.
    Vector4, DVec4, 4, "[f64; 4]", [x, y, z, w]
);

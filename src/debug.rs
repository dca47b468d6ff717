//! Diagnostics for exported test cubes.
//!
//! A cube centered on the origin and triangulated into two triangles per
//! side exports as runs of six corners. For each triangle the side it lies
//! on is the axis on which all three corners share a sign; both triangles
//! of a run should agree.

use crate::encode::{Encodable, EncoderChain, Item, ToJson};
use crate::error::{ExportError, Result};
use crate::object_data::ObjectData;
use crate::types::{Vector2, Vector3};
use serde_json::{json, Value};

/// Corners per cube side: two triangles.
const CORNERS_PER_SIDE: usize = 6;

/// The side of the cube a triangle lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisSign {
    /// `'x'`, `'y'` or `'z'`.
    pub axis: char,
    /// `'+'` or `'-'`.
    pub sign: char,
}

/// One triangle of a side.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeTriangle {
    /// `None` if the corners share no sign on any axis.
    pub side: Option<AxisSign>,
    pub vertices: Vec<Vector3>,
    pub uvs: Vec<Vector2>,
}

/// Two consecutive triangles expected to form one side.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeSide {
    pub faces_match: bool,
    pub faces: [CubeTriangle; 2],
}

/// Find the axis on which all corners are strictly positive or negative.
pub fn same_sign_axis(vertices: &[Vector3]) -> Option<AxisSign> {
    let columns: [(char, fn(&Vector3) -> f64); 3] = [('x', Vector3::x), ('y', Vector3::y), ('z', Vector3::z)];

    columns.into_iter().find_map(|(axis, component)| {
        if vertices.iter().all(|v| component(v) > 0.0) {
            Some(AxisSign { axis, sign: '+' })
        } else if vertices.iter().all(|v| component(v) < 0.0) {
            Some(AxisSign { axis, sign: '-' })
        } else {
            None
        }
    })
}

/// Split an exported cube into sides and check each one.
pub fn cube_sides(data: &ObjectData) -> Result<Vec<CubeSide>> {
    let count = data.vertex_count();
    if count % CORNERS_PER_SIDE != 0 {
        return Err(ExportError::Diagnostics(format!(
            "{} vertices is not a multiple of {}; each side must be two triangles",
            count, CORNERS_PER_SIDE
        )));
    }
    if data.uvs.len() != count {
        return Err(ExportError::Diagnostics(format!(
            "{} UVs for {} vertices",
            data.uvs.len(),
            count
        )));
    }

    let sides = data
        .vertices
        .chunks_exact(CORNERS_PER_SIDE)
        .zip(data.uvs.chunks_exact(CORNERS_PER_SIDE))
        .map(|(verts, uvs)| {
            let triangle = |range: std::ops::Range<usize>| CubeTriangle {
                side: same_sign_axis(&verts[range.clone()]),
                vertices: verts[range.clone()].to_vec(),
                uvs: uvs[range].to_vec(),
            };
            let first = triangle(0..3);
            let second = triangle(3..6);
            CubeSide {
                faces_match: first.side.is_some() && first.side == second.side,
                faces: [first, second],
            }
        })
        .collect();

    Ok(sides)
}

impl ToJson for CubeTriangle {
    fn to_json(&self, chain: &EncoderChain) -> Result<Value> {
        let (axis, sign) = match self.side {
            Some(side) => (Value::from(side.axis.to_string()), Value::from(side.sign.to_string())),
            None => (Value::Null, Value::Null),
        };
        Ok(json!({
            "axis": axis,
            "axis_sign": sign,
            "vertices": chain.encode(&self.vertices)?,
            "uvs": chain.encode(&self.uvs)?,
        }))
    }
}

impl Encodable for CubeTriangle {
    fn item(&self) -> Item<'_> {
        Item::Record(self)
    }
}

impl ToJson for CubeSide {
    fn to_json(&self, chain: &EncoderChain) -> Result<Value> {
        Ok(json!({
            "faces_match": self.faces_match,
            "faces": chain.encode(self.faces.as_slice())?,
        }))
    }
}

impl Encodable for CubeSide {
    fn item(&self) -> Item<'_> {
        Item::Record(self)
    }
}

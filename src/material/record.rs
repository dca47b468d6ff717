//! Exported material records.

use crate::encode::{Encodable, EncoderChain, Item, ToJson};
use crate::error::Result;
use crate::types::Vector4;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Name written for empty material slots.
pub const DEFAULT_MATERIAL_NAME: &str = "Default";

/// One entry of the `materials` array, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaterialRecord {
    /// The slot is empty.
    Default { index: usize, name: String },
    /// Flat diffuse color, no node graph.
    Basic {
        index: usize,
        name: String,
        color: Vector4,
    },
    /// Image textures that reach the material output.
    ImageFiles {
        index: usize,
        name: String,
        filenames: Vec<String>,
    },
}

impl MaterialRecord {
    pub fn default_slot(index: usize) -> Self {
        MaterialRecord::Default {
            index,
            name: DEFAULT_MATERIAL_NAME.to_string(),
        }
    }

    pub fn index(&self) -> usize {
        match self {
            MaterialRecord::Default { index, .. }
            | MaterialRecord::Basic { index, .. }
            | MaterialRecord::ImageFiles { index, .. } => *index,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            MaterialRecord::Default { name, .. }
            | MaterialRecord::Basic { name, .. }
            | MaterialRecord::ImageFiles { name, .. } => name,
        }
    }

    /// The `type` tag written to JSON.
    pub fn type_tag(&self) -> &'static str {
        match self {
            MaterialRecord::Default { .. } => "DEFAULT",
            MaterialRecord::Basic { .. } => "BASIC",
            MaterialRecord::ImageFiles { .. } => "IMAGE_FILES",
        }
    }
}

impl ToJson for MaterialRecord {
    fn to_json(&self, chain: &EncoderChain) -> Result<Value> {
        let mut map = Map::new();
        map.insert("index".to_string(), chain.encode(&self.index())?);
        map.insert("type".to_string(), chain.encode(self.type_tag())?);
        map.insert("name".to_string(), chain.encode(self.name())?);

        match self {
            MaterialRecord::Default { .. } => {}
            MaterialRecord::Basic { color, .. } => {
                map.insert("color".to_string(), chain.encode(color)?);
            }
            MaterialRecord::ImageFiles { filenames, .. } => {
                map.insert("filenames".to_string(), chain.encode(filenames)?);
            }
        }

        Ok(Value::Object(map))
    }
}

impl Encodable for MaterialRecord {
    fn item(&self) -> Item<'_> {
        Item::Record(self)
    }
}

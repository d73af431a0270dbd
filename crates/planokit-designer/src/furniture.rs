//! Furniture templates: the library of saved furniture and its products.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use planokit_core::{Error, MatchError};

/// Kind of a saved furniture template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FurnitureType {
    ClothingRack,
    WallDisplay,
    AccessoryDisplay,
    ModularCube,
    Gondola,
    Table,
    Planogram,
    Refrigerator,
    RefrigeratedShowcase,
    ClothingDisplay,
    ClothingWall,
    ShelvesDisplay,
}

impl FurnitureType {
    pub const ALL: [FurnitureType; 12] = [
        FurnitureType::ClothingRack,
        FurnitureType::WallDisplay,
        FurnitureType::AccessoryDisplay,
        FurnitureType::ModularCube,
        FurnitureType::Gondola,
        FurnitureType::Table,
        FurnitureType::Planogram,
        FurnitureType::Refrigerator,
        FurnitureType::RefrigeratedShowcase,
        FurnitureType::ClothingDisplay,
        FurnitureType::ClothingWall,
        FurnitureType::ShelvesDisplay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FurnitureType::ClothingRack => "clothing-rack",
            FurnitureType::WallDisplay => "wall-display",
            FurnitureType::AccessoryDisplay => "accessory-display",
            FurnitureType::ModularCube => "modular-cube",
            FurnitureType::Gondola => "gondola",
            FurnitureType::Table => "table",
            FurnitureType::Planogram => "planogram",
            FurnitureType::Refrigerator => "refrigerator",
            FurnitureType::RefrigeratedShowcase => "refrigerated-showcase",
            FurnitureType::ClothingDisplay => "clothing-display",
            FurnitureType::ClothingWall => "clothing-wall",
            FurnitureType::ShelvesDisplay => "shelves-display",
        }
    }

    /// Cells of this kind carry an explicit side (left/front/back/right).
    pub fn is_four_sided(&self) -> bool {
        matches!(self, FurnitureType::ShelvesDisplay)
    }
}

impl fmt::Display for FurnitureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FurnitureType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::other(format!("Unknown furniture type: {}", s)))
    }
}

/// Geometry and identity of a furniture template.
///
/// Dimensions are in metres; `x, y, z, rotation` are the last scene pose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FurnitureItem {
    pub id: String,
    #[serde(rename = "type")]
    pub furniture_type: FurnitureType,
    pub name: String,
    pub sections: u32,
    pub slots: u32,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub color: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
}

impl FurnitureItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, furniture_type: FurnitureType) -> Self {
        Self {
            id: id.into(),
            furniture_type,
            name: name.into(),
            sections: 1,
            slots: 1,
            width: 1.0,
            height: 1.0,
            depth: 0.5,
            color: "#CCCCCC".to_string(),
            x: 0.0,
            y: 0.0,
            z: 0.0,
            rotation: 0.0,
            store_id: None,
            store_name: None,
        }
    }

    pub fn with_size(mut self, width: f64, height: f64, depth: f64) -> Self {
        self.width = width;
        self.height = height;
        self.depth = depth;
        self
    }

    pub fn with_layout(mut self, sections: u32, slots: u32) -> Self {
        self.sections = sections;
        self.slots = slots;
        self
    }
}

/// A product placed on a furniture template. `section` is the shelf level
/// (1 = bottom) and `position` the column within the face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FurnitureProduct {
    pub product_id: String,
    pub section: u32,
    pub position: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
}

/// A furniture template with its products, as kept in the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFurniture {
    pub furniture: FurnitureItem,
    #[serde(default)]
    pub products: Vec<FurnitureProduct>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl SavedFurniture {
    pub fn new(furniture: FurnitureItem, products: Vec<FurnitureProduct>) -> Self {
        Self {
            furniture,
            products,
            description: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.furniture.id
    }

    pub fn name(&self) -> &str {
        &self.furniture.name
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }
}

/// In-memory library of saved furniture, ordered by insertion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FurnitureLibrary {
    items: Vec<SavedFurniture>,
}

impl FurnitureLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<SavedFurniture>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[SavedFurniture] {
        &self.items
    }

    pub fn into_items(self) -> Vec<SavedFurniture> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&SavedFurniture> {
        self.items.iter().find(|f| f.id() == id)
    }

    /// Adds a template, stamping both timestamps. A template with the same
    /// id is replaced.
    pub fn add(&mut self, mut saved: SavedFurniture) -> &SavedFurniture {
        let now = Utc::now().timestamp_millis();
        saved.created_at = Some(now);
        saved.updated_at = Some(now);
        let index = match self.items.iter().position(|f| f.id() == saved.id()) {
            Some(index) => {
                self.items[index] = saved;
                index
            }
            None => {
                self.items.push(saved);
                self.items.len() - 1
            }
        };
        tracing::info!("Saved furniture {}", self.items[index].id());
        &self.items[index]
    }

    /// Replaces the furniture and products of an existing template,
    /// keeping its creation time.
    pub fn update(
        &mut self,
        id: &str,
        furniture: FurnitureItem,
        products: Vec<FurnitureProduct>,
        description: Option<String>,
    ) -> Result<&SavedFurniture, MatchError> {
        let saved = self
            .items
            .iter_mut()
            .find(|f| f.furniture.id == id)
            .ok_or_else(|| MatchError::FurnitureNotFound {
                furniture_id: id.to_string(),
            })?;
        saved.furniture = furniture;
        saved.products = products;
        saved.description = description;
        saved.updated_at = Some(Utc::now().timestamp_millis());
        Ok(saved)
    }

    pub fn remove(&mut self, id: &str) -> Option<SavedFurniture> {
        let index = self.items.iter().position(|f| f.id() == id)?;
        Some(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &SavedFurniture> {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_furniture_type_parse() {
        assert_eq!(
            "Shelves-Display".parse::<FurnitureType>().unwrap(),
            FurnitureType::ShelvesDisplay
        );
        assert!("sofa".parse::<FurnitureType>().is_err());
        for t in FurnitureType::ALL {
            assert_eq!(t.as_str().parse::<FurnitureType>().unwrap(), t);
        }
    }

    #[test]
    fn test_saved_furniture_wire_format() {
        let json = r##"{
            "furniture": {"id": "f1", "type": "gondola", "name": "Gondola Centrale",
                "sections": 4, "slots": 6, "width": 2, "height": 1.8, "depth": 0.6,
                "color": "#8B4513", "x": 0, "y": 0, "z": 0, "rotation": 0},
            "products": [{"productId": "p1", "section": 1, "position": 2, "quantity": 3, "side": "Face A"}],
            "createdAt": 1700000000000,
            "updatedAt": 1700000000000
        }"##;
        let saved: SavedFurniture = serde_json::from_str(json).unwrap();
        assert_eq!(saved.furniture.furniture_type, FurnitureType::Gondola);
        assert_eq!(saved.products[0].quantity, Some(3));
        let back = serde_json::to_value(&saved).unwrap();
        assert_eq!(back["furniture"]["type"], "gondola");
        assert_eq!(back["products"][0]["productId"], "p1");
    }

    #[test]
    fn test_library_update_keeps_created_at() {
        let mut library = FurnitureLibrary::new();
        let item = FurnitureItem::new("f1", "Table", FurnitureType::Table);
        let created = library
            .add(SavedFurniture::new(item.clone(), vec![]))
            .created_at;
        let updated = library
            .update("f1", item.with_layout(2, 2), vec![], Some("wide".into()))
            .unwrap();
        assert_eq!(updated.created_at, created);
        assert_eq!(updated.furniture.sections, 2);
        assert!(library.update("nope", FurnitureItem::new("x", "x", FurnitureType::Table), vec![], None).is_err());
        assert!(library.remove("f1").is_some());
        assert!(library.is_empty());
    }
}

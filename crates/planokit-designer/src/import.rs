//! # Document Import Module
//!
//! Reads the two JSON documents the editor accepts from outside:
//!
//! - Floor plans: a flat `FloorPlan` object. A malformed document, or one
//!   whose `elements` is missing or not an array, is rejected as a whole.
//!   Missing plan id, name and timestamps are filled in, missing element
//!   depths take the type default, and rotations are normalised.
//! - Planogram envelopes: `{planogram_info, furniture[], product_positions[]}`.
//!   Each furniture row and product position is checked on its own; rows
//!   that cannot be resolved are reported and left out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use planokit_core::{ImportError, ProductLookup};

use crate::furniture::{FurnitureItem, FurnitureProduct, FurnitureType, SavedFurniture};
use crate::model::{ElementType, FloorPlan, FloorPlanElement};
use crate::planogram::{PlanogramGrid, Side};

const DEFAULT_PLAN_NAME: &str = "Imported plan";
const IMPORTED_FURNITURE_COLOR: &str = "#f0f0f0";

fn parse_json(json: &str) -> Result<Value, ImportError> {
    serde_json::from_str(json).map_err(|e| ImportError::InvalidJson {
        reason: e.to_string(),
    })
}

fn parse_timestamp(object: &Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
    let raw = object.get(key)?;
    match raw.as_str().map(DateTime::parse_from_rfc3339) {
        Some(Ok(ts)) => Some(ts.with_timezone(&Utc)),
        _ => {
            tracing::warn!("Ignoring unreadable {} {}", key, raw);
            None
        }
    }
}

fn import_element(index: usize, value: &Value) -> Result<FloorPlanElement, ImportError> {
    let invalid = |reason: String| ImportError::InvalidElement { index, reason };

    let mut object = value
        .as_object()
        .cloned()
        .ok_or_else(|| invalid("element is not an object".to_string()))?;
    let element_type: ElementType = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("missing type".to_string()))?
        .parse()
        .map_err(|e: planokit_core::GeometryError| invalid(e.to_string()))?;

    let needs_id = object
        .get("id")
        .and_then(Value::as_str)
        .is_none_or(str::is_empty);
    if needs_id {
        object.insert("id".into(), Value::from(format!("element-{}", Uuid::new_v4())));
    }
    if object.get("depth").is_none_or(Value::is_null) {
        object.insert(
            "depth".into(),
            Value::from(element_type.default_dimensions().depth),
        );
    }

    let mut element: FloorPlanElement =
        serde_json::from_value(Value::Object(object)).map_err(|e| invalid(e.to_string()))?;
    element.normalize_rotation();
    element.validate().map_err(|e| invalid(e.to_string()))?;
    Ok(element)
}

/// Parses a floor-plan document. Nothing is returned unless every element
/// is valid.
pub fn import_floor_plan(json: &str) -> Result<FloorPlan, ImportError> {
    let document = parse_json(json)?;
    let object = document.as_object().ok_or(ImportError::MissingElements)?;
    let raw_elements = object
        .get("elements")
        .and_then(Value::as_array)
        .ok_or(ImportError::MissingElements)?;

    let elements = raw_elements
        .iter()
        .enumerate()
        .map(|(index, value)| import_element(index, value))
        .collect::<Result<Vec<_>, _>>()?;

    let now = Utc::now();
    let id = object
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("plan-{}", Uuid::new_v4()));
    let name = object
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_PLAN_NAME)
        .to_string();
    let created_at = parse_timestamp(object, "createdAt").unwrap_or(now);
    let updated_at = parse_timestamp(object, "updatedAt").unwrap_or(now);

    tracing::info!("Imported floor plan {} with {} elements", id, elements.len());
    Ok(FloorPlan {
        id,
        name,
        elements,
        created_at,
        updated_at,
    })
}

/// Header of a planogram envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanogramInfo {
    #[serde(default)]
    pub planogram_id: String,
    #[serde(default)]
    pub nom_planogram: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A furniture row of a planogram envelope. Dimensions are centimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedFurniture {
    pub furniture_id: String,
    pub furniture_type_name: String,
    #[serde(default)]
    pub largeur: f64,
    #[serde(default)]
    pub hauteur: f64,
    #[serde(default)]
    pub profondeur: f64,
    #[serde(default)]
    pub nb_etageres_unique_face: u32,
    #[serde(default)]
    pub nb_colonnes_unique_face: u32,
    #[serde(default)]
    pub nb_etageres_front_back: u32,
    #[serde(default)]
    pub nb_colonnes_front_back: u32,
    #[serde(default)]
    pub nb_etageres_left_right: u32,
    #[serde(default)]
    pub nb_colonnes_left_right: u32,
}

impl ImportedFurniture {
    fn sections(&self) -> u32 {
        self.nb_etageres_unique_face
            .max(self.nb_etageres_front_back)
            .max(self.nb_etageres_left_right)
            .max(1)
    }

    fn slots(&self) -> u32 {
        if self.nb_colonnes_unique_face > 0 {
            self.nb_colonnes_unique_face
        } else {
            (2 * self.nb_colonnes_front_back + 2 * self.nb_colonnes_left_right).max(1)
        }
    }
}

/// A product position of a planogram envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPosition {
    #[serde(default)]
    pub position_id: String,
    pub furniture_id: String,
    pub produit_id: String,
    #[serde(default)]
    pub face: String,
    /// Shelf number, 1 = bottom.
    pub etagere: u32,
    /// 1-based column within the face.
    pub colonne: u32,
    #[serde(default = "default_quantite")]
    pub quantite: u32,
}

fn default_quantite() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanogramEnvelope {
    pub planogram_info: PlanogramInfo,
    pub furniture: Vec<ImportedFurniture>,
    pub product_positions: Vec<ProductPosition>,
}

/// Resolution of one furniture row.
#[derive(Debug, Clone, PartialEq)]
pub struct FurnitureCheck {
    pub furniture_id: String,
    pub type_name: String,
    /// `None` marks the row incompatible.
    pub resolved: Option<FurnitureType>,
}

/// Resolution of one product position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCheck {
    pub position_id: String,
    pub product_id: String,
    pub found: bool,
}

/// A parsed and checked planogram envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanogramImport {
    pub envelope: PlanogramEnvelope,
    pub furniture: Vec<FurnitureCheck>,
    pub products: Vec<ProductCheck>,
}

/// Parses an envelope and checks every row against the known furniture
/// kinds and `catalog`.
pub fn import_planogram(json: &str, catalog: &impl ProductLookup) -> Result<PlanogramImport, ImportError> {
    let document = parse_json(json)?;
    for section in ["planogram_info", "furniture", "product_positions"] {
        let present = match document.get(section) {
            Some(Value::Object(_)) => section == "planogram_info",
            Some(Value::Array(_)) => section != "planogram_info",
            _ => false,
        };
        if !present {
            return Err(ImportError::MissingSection { section });
        }
    }
    let envelope: PlanogramEnvelope =
        serde_json::from_value(document).map_err(|e| ImportError::InvalidJson {
            reason: e.to_string(),
        })?;

    let furniture = envelope
        .furniture
        .iter()
        .map(|f| FurnitureCheck {
            furniture_id: f.furniture_id.clone(),
            type_name: f.furniture_type_name.clone(),
            resolved: f.furniture_type_name.parse().ok(),
        })
        .collect::<Vec<_>>();
    let products = envelope
        .product_positions
        .iter()
        .map(|p| ProductCheck {
            position_id: p.position_id.clone(),
            product_id: p.produit_id.clone(),
            found: catalog.contains(&p.produit_id),
        })
        .collect::<Vec<_>>();

    let incompatible = furniture.iter().filter(|f| f.resolved.is_none()).count();
    let missing = products.iter().filter(|p| !p.found).count();
    if incompatible > 0 || missing > 0 {
        tracing::warn!(
            "Planogram import: {} incompatible furniture, {} unknown products",
            incompatible,
            missing
        );
    }

    Ok(PlanogramImport {
        envelope,
        furniture,
        products,
    })
}

impl PlanogramImport {
    pub fn compatible_furniture(&self) -> impl Iterator<Item = (&ImportedFurniture, FurnitureType)> {
        self.envelope
            .furniture
            .iter()
            .zip(&self.furniture)
            .filter_map(|(f, check)| check.resolved.map(|t| (f, t)))
    }

    /// Positions of `furniture_id` whose product is in the catalog.
    pub fn resolved_positions<'a>(&'a self, furniture_id: &'a str) -> impl Iterator<Item = &'a ProductPosition> {
        self.envelope
            .product_positions
            .iter()
            .zip(&self.products)
            .filter(move |(p, check)| check.found && p.furniture_id == furniture_id)
            .map(|(p, _)| p)
    }

    /// Builds furniture templates from the compatible rows, optionally
    /// limited to `selected` furniture ids.
    pub fn to_saved_furniture(&self, selected: Option<&[String]>) -> Result<Vec<SavedFurniture>, ImportError> {
        let info = &self.envelope.planogram_info;
        let saved: Vec<SavedFurniture> = self
            .compatible_furniture()
            .filter(|(f, _)| selected.is_none_or(|ids| ids.contains(&f.furniture_id)))
            .map(|(f, furniture_type)| {
                let mut item = FurnitureItem::new(
                    format!("imported-{}", f.furniture_id),
                    format!("{} - {}", info.nom_planogram, f.furniture_type_name),
                    furniture_type,
                )
                .with_size(f.largeur / 100.0, f.hauteur / 100.0, f.profondeur / 100.0)
                .with_layout(f.sections(), f.slots());
                item.color = IMPORTED_FURNITURE_COLOR.to_string();

                let products = self
                    .resolved_positions(&f.furniture_id)
                    .map(|p| FurnitureProduct {
                        product_id: p.produit_id.clone(),
                        section: p.etagere,
                        position: p.colonne,
                        quantity: Some(p.quantite.max(1)),
                        side: (!p.face.is_empty()).then(|| p.face.clone()),
                    })
                    .collect();
                SavedFurniture::new(item, products)
            })
            .collect();

        if saved.is_empty() {
            return Err(ImportError::NothingToImport {
                reason: "no compatible furniture in the document".to_string(),
            });
        }
        tracing::info!("Imported {} furniture from planogram", saved.len());
        Ok(saved)
    }

    /// Places the resolved positions of `furniture_id` into `grid`.
    pub fn place_into(&self, furniture_id: &str, grid: &mut PlanogramGrid) -> PositionReport {
        let mut report = PositionReport::default();
        for position in self.resolved_positions(furniture_id) {
            let side = position.face.parse::<Side>().ok();
            let target = grid
                .cell_for_position(side, position.etagere, position.colonne)
                .map(|c| (c.x, c.y));
            match target {
                Some((x, y)) => {
                    grid.assign(x, y, &position.produit_id, Some(position.quantite));
                    report.placed += 1;
                }
                None => report.out_of_grid.push(position.position_id.clone()),
            }
        }
        report
    }
}

/// Result of [`PlanogramImport::place_into`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionReport {
    pub placed: usize,
    /// Position ids that address no cell of the grid.
    pub out_of_grid: Vec<String>,
}

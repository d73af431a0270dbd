//! Faces and zone labels of planogram columns.
//!
//! Gondolas split their columns into two faces: the first half is face A
//! (front), the rest face B (back). A shelves display lays its four sides
//! side by side: left, front, back, right.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::config::{PlanogramConfig, ShelvesConfig};
use crate::furniture::FurnitureType;

/// A face of a planogram furniture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Front,
    Back,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Front => "front",
            Side::Back => "back",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    /// Accepts the side names and the gondola labels `Face A` / `Face B`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(Side::Left),
            "front" | "face a" | "a" => Ok(Side::Front),
            "back" | "face b" | "b" => Ok(Side::Back),
            "right" => Ok(Side::Right),
            other => Err(format!("Unknown side: {}", other)),
        }
    }
}

/// Number of gondola columns on face A.
fn gondola_front_columns(columns: u32) -> u32 {
    columns.div_ceil(2)
}

pub fn gondola_face(column: u32, columns: u32) -> Side {
    if 2 * column < columns {
        Side::Front
    } else {
        Side::Back
    }
}

pub fn gondola_label(column: u32, columns: u32) -> &'static str {
    match gondola_face(column, columns) {
        Side::Front => "Face A",
        _ => "Face B",
    }
}

pub fn shelves_side(column: u32, shelves: &ShelvesConfig) -> Side {
    let left = shelves.left_right_columns;
    let front = shelves.front_back_columns;
    if column < left {
        Side::Left
    } else if column < left + front {
        Side::Front
    } else if column < left + 2 * front {
        Side::Back
    } else {
        Side::Right
    }
}

/// Face of `column`, `None` for single-faced furniture.
pub fn face_of(config: &PlanogramConfig, column: u32) -> Option<Side> {
    match config.furniture_type {
        FurnitureType::ShelvesDisplay => Some(shelves_side(column, &config.shelves_config)),
        FurnitureType::Gondola => Some(gondola_face(column, config.grid_size().1)),
        _ => None,
    }
}

/// Derived zone label of `column`: "Face A"/"Face B" for gondolas, the side
/// name for shelves displays.
pub fn zone_label(config: &PlanogramConfig, column: u32) -> Option<&'static str> {
    match config.furniture_type {
        FurnitureType::ShelvesDisplay => Some(shelves_side(column, &config.shelves_config).as_str()),
        FurnitureType::Gondola => Some(gondola_label(column, config.grid_size().1)),
        _ => None,
    }
}

/// First grid column of `side` and how many columns it spans.
fn face_span(config: &PlanogramConfig, side: Option<Side>) -> Option<(u32, u32)> {
    let (_, columns) = config.grid_size();
    match (config.furniture_type, side) {
        (FurnitureType::ShelvesDisplay, Some(side)) => {
            let left = config.shelves_config.left_right_columns;
            let front = config.shelves_config.front_back_columns;
            Some(match side {
                Side::Left => (0, left),
                Side::Front => (left, front),
                Side::Back => (left + front, front),
                Side::Right => (left + 2 * front, left),
            })
        }
        (FurnitureType::ShelvesDisplay, None) => None,
        (FurnitureType::Gondola, Some(Side::Back)) => {
            let front = gondola_front_columns(columns);
            Some((front, columns - front))
        }
        (FurnitureType::Gondola, Some(Side::Front) | None) => Some((0, gondola_front_columns(columns))),
        (FurnitureType::Gondola, Some(_)) => None,
        (_, _) => Some((0, columns)),
    }
}

/// 1-based column number of `column` within its face.
pub fn column_in_face(config: &PlanogramConfig, column: u32) -> u32 {
    let start = face_span(config, face_of(config, column))
        .map(|(start, _)| start)
        .unwrap_or(0);
    column - start + 1
}

/// Grid column of the 1-based `column` within `side`, if it exists.
pub fn grid_column(config: &PlanogramConfig, side: Option<Side>, column: u32) -> Option<u32> {
    let (start, width) = face_span(config, side)?;
    (column >= 1 && column <= width).then(|| start + column - 1)
}

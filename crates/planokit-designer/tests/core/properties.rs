use proptest::prelude::*;

use planokit_designer::canvas::{resize_dimensions, resize_from_anchor, MIN_ELEMENT_SIZE};
use planokit_designer::geometry::{normalize_degrees, snap_to_grid};
use planokit_designer::{
    AutoMatchOutcome, ElementType, FloorPlanElement, FurnitureItem, FurnitureType, MatchRegistry,
    Point, ResizeHandle, SavedFurniture,
};

const ELEMENT_TYPES: [ElementType; 3] = [ElementType::Gondola, ElementType::Table, ElementType::Shelf];
const FURNITURE_NAMES: [&str; 4] = ["aisle 0", "AISLE 3", " Aisle 5 ", "Promo stand"];
const FURNITURE_TYPES: [FurnitureType; 3] =
    [FurnitureType::Gondola, FurnitureType::Table, FurnitureType::Refrigerator];

#[derive(Debug, Clone)]
enum MatchOp {
    Auto { furniture: usize, name: usize, furniture_type: usize },
    Manual { furniture: usize, element: usize },
    Cancel { furniture: usize },
    RemoveElement { element: usize },
}

fn match_op() -> impl Strategy<Value = MatchOp> {
    prop_oneof![
        3 => (0usize..4, 0usize..4, 0usize..3).prop_map(|(furniture, name, furniture_type)| {
            MatchOp::Auto { furniture, name, furniture_type }
        }),
        3 => (0usize..4, 0usize..6).prop_map(|(furniture, element)| MatchOp::Manual { furniture, element }),
        2 => (0usize..4).prop_map(|furniture| MatchOp::Cancel { furniture }),
        1 => (0usize..6).prop_map(|element| MatchOp::RemoveElement { element }),
    ]
}

fn handle() -> impl Strategy<Value = ResizeHandle> {
    (0..ResizeHandle::ALL.len()).prop_map(|i| ResizeHandle::ALL[i])
}

proptest! {
    #[test]
    fn snap_is_idempotent(value in -10_000.0f64..10_000.0, grid in 1.0f64..100.0) {
        let once = snap_to_grid(value, grid);
        prop_assert_eq!(snap_to_grid(once, grid), once);
        prop_assert!((once - value).abs() <= grid / 2.0 + 1e-9);
    }

    #[test]
    fn rotation_normalizes_into_range(degrees in -1.0e6f64..1.0e6) {
        let normalized = normalize_degrees(degrees);
        prop_assert!((0.0..360.0).contains(&normalized));
        prop_assert_eq!(normalize_degrees(normalized), normalized);
    }

    #[test]
    fn resize_keeps_opposite_handle_fixed(
        x in -500.0f64..500.0,
        y in -500.0f64..500.0,
        width in 20.0f64..300.0,
        height in 20.0f64..300.0,
        rotation in 0.0f64..360.0,
        handle in handle(),
        dx in -400.0f64..400.0,
        dy in -400.0f64..400.0,
    ) {
        let start = FloorPlanElement::new("e", ElementType::Shelf, x, y)
            .with_size(width, height)
            .with_rotation(rotation);
        let grab = handle.position(&start);
        let pointer = Point::new(grab.x + dx, grab.y + dy);
        let (w, h) = resize_dimensions(&start, handle, grab, pointer);
        prop_assert!(w >= MIN_ELEMENT_SIZE && h >= MIN_ELEMENT_SIZE);

        let resized = resize_from_anchor(&start, handle, w, h);
        let before = handle.opposite().position(&start);
        let after = handle.opposite().position(&resized);
        prop_assert!(before.distance_to(&after) < 1e-6, "anchor moved from {:?} to {:?}", before, after);
        prop_assert_eq!(resized.rotation, start.rotation);
    }

    #[test]
    fn matches_stay_bijective(ops in prop::collection::vec(match_op(), 1..60)) {
        let elements: Vec<FloorPlanElement> = (0..6)
            .map(|i| {
                FloorPlanElement::new(format!("e{}", i), ELEMENT_TYPES[i % 3], i as f64 * 300.0, 0.0)
                    .with_name(format!("Aisle {}", i))
            })
            .collect();
        let mut library: Vec<SavedFurniture> = (0..4)
            .map(|i| {
                let item = FurnitureItem::new(format!("f{}", i), "", FurnitureType::Gondola);
                SavedFurniture::new(item, Vec::new())
            })
            .collect();
        let mut live = vec![true; elements.len()];
        let mut registry = MatchRegistry::new();

        for op in ops {
            match op {
                MatchOp::Auto { furniture, name, furniture_type } => {
                    let saved = &mut library[furniture];
                    saved.furniture.name = FURNITURE_NAMES[name].to_string();
                    saved.furniture.furniture_type = FURNITURE_TYPES[furniture_type];
                    let present: Vec<FloorPlanElement> = elements
                        .iter()
                        .zip(&live)
                        .filter(|(_, alive)| **alive)
                        .map(|(e, _)| e.clone())
                        .collect();
                    if let AutoMatchOutcome::Matched { element_id, .. } = registry.auto_match(saved, &present) {
                        prop_assert_eq!(registry.furniture_for_element(&element_id), Some(saved.id()));
                    }
                }
                MatchOp::Manual { furniture, element } => {
                    if live[element] {
                        registry.set_match(&format!("f{}", furniture), &elements[element]).unwrap();
                    }
                }
                MatchOp::Cancel { furniture } => {
                    registry.cancel(&format!("f{}", furniture));
                }
                MatchOp::RemoveElement { element } => {
                    live[element] = false;
                    registry.prune_element(&elements[element].id);
                }
            }

            let pairs: Vec<_> = registry.iter().cloned().collect();
            let mut furniture_ids: Vec<_> = pairs.iter().map(|m| m.furniture_id.clone()).collect();
            let mut element_ids: Vec<_> = pairs.iter().map(|m| m.element_id.clone()).collect();
            furniture_ids.sort();
            furniture_ids.dedup();
            element_ids.sort();
            element_ids.dedup();
            prop_assert_eq!(furniture_ids.len(), pairs.len());
            prop_assert_eq!(element_ids.len(), pairs.len());
            for pair in &pairs {
                prop_assert_eq!(registry.furniture_for_element(&pair.element_id), Some(pair.furniture_id.as_str()));
                let index = elements.iter().position(|e| e.id == pair.element_id).unwrap();
                prop_assert!(live[index], "removed element {} is still matched", pair.element_id);
            }
        }
    }
}

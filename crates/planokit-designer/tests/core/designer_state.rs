use std::sync::Arc;

use planokit_core::{EditorEvent, EventBus, MatchEvent, PlanEvent, Product};
use planokit_designer::designer_state::{FURNITURE_KEY, PRODUCTS_KEY};
use planokit_designer::{
    AutoMatchOutcome, DesignerState, FurnitureItem, FurnitureType, MatchKind, SavedFurniture,
};

const STORE_PLAN: &str = r#"{
    "id": "plan-store",
    "name": "Store",
    "elements": [
        {"id": "wall-1", "type": "wall", "x": 0, "y": 0, "width": 1000, "height": 20},
        {"id": "gondola-1", "type": "gondola", "x": 200, "y": 300, "width": 200, "height": 60, "depth": 100, "name": "Gondola Centrale"},
        {"id": "fridge-1", "type": "fridge", "x": 700, "y": 40, "width": 80, "height": 60, "rotation": 450}
    ]
}"#;

fn drain(receiver: &mut tokio::sync::broadcast::Receiver<EditorEvent>) -> Vec<EditorEvent> {
    std::iter::from_fn(|| receiver.try_recv().ok()).collect()
}

#[test]
fn test_import_match_and_place() {
    let bus = Arc::new(EventBus::new());
    let mut events = bus.receiver();
    let mut state = DesignerState::new(Arc::clone(&bus));

    let plan_id = state.import_plan_json(STORE_PLAN).unwrap();
    assert_eq!(plan_id, "plan-store");
    assert_eq!(state.canvas.element("fridge-1").unwrap().rotation, 90.0);
    assert!(drain(&mut events).iter().any(|e| matches!(
        e,
        EditorEvent::Plan(PlanEvent::Imported { element_count: 3, .. })
    )));

    let token = state.begin_load(FURNITURE_KEY);
    state.complete_library_load(
        &token,
        Ok(vec![
            SavedFurniture::new(
                FurnitureItem::new("f-gondola", "gondola centrale", FurnitureType::Gondola),
                Vec::new(),
            ),
            SavedFurniture::new(
                FurnitureItem::new("f-rack", "Coat rack", FurnitureType::ClothingRack),
                Vec::new(),
            ),
        ]),
    );
    assert_eq!(state.library().len(), 2);

    assert_eq!(
        state.auto_match("f-gondola").unwrap(),
        AutoMatchOutcome::Matched {
            element_id: "gondola-1".to_string(),
            kind: MatchKind::Name,
        }
    );
    assert_eq!(
        state.auto_match("f-rack").unwrap(),
        AutoMatchOutcome::NoCompatibleItem
    );

    let placed = state.place_furniture("f-gondola").unwrap();
    assert_eq!(placed.matched_element_name.as_deref(), Some("Gondola Centrale"));
    assert_eq!(placed.y, 0.0);

    let recorded = drain(&mut events);
    assert!(recorded.iter().any(|e| matches!(
        e,
        EditorEvent::Match(MatchEvent::NoCompatibleItem { furniture_id }) if furniture_id == "f-rack"
    )));
    assert!(recorded
        .iter()
        .any(|e| matches!(e, EditorEvent::Match(MatchEvent::Placed { .. }))));

    let layout = state.store_layout("Spring", None);
    assert_eq!(layout.furniture.len(), 1);
    assert_eq!(layout.furniture[0].furniture_id, "f-gondola");
}

#[test]
fn test_switching_plan_clears_matches() {
    let mut state = DesignerState::new(Arc::new(EventBus::new()));
    state.import_plan_json(STORE_PLAN).unwrap();
    state.add_furniture(SavedFurniture::new(
        FurnitureItem::new("f1", "Cooler", FurnitureType::Refrigerator),
        Vec::new(),
    ));
    state.set_match("f1", "fridge-1").unwrap();
    assert!(state.matches().is_matched("f1"));

    state.new_plan("Empty");
    assert!(state.matches().is_empty());
    assert!(state.store_display().placed().is_empty());
    assert!(!state.can_undo());
}

#[test]
fn test_delete_matched_element_then_undo() {
    let mut state = DesignerState::new(Arc::new(EventBus::new()));
    state.import_plan_json(STORE_PLAN).unwrap();
    state.add_furniture(SavedFurniture::new(
        FurnitureItem::new("f1", "Main gondola", FurnitureType::Gondola),
        Vec::new(),
    ));
    state.set_match("f1", "gondola-1").unwrap();

    state.canvas.selection_manager.select("gondola-1");
    state.delete_selected().unwrap();
    assert!(!state.matches().is_matched("f1"));
    assert!(state.canvas.selected_id().is_none());

    state.undo();
    assert!(state.canvas.element("gondola-1").is_some());
    // The match is not brought back by undo.
    assert!(!state.matches().is_matched("f1"));
}

#[test]
fn test_planogram_import_through_state() {
    let mut state = DesignerState::new(Arc::new(EventBus::new()));
    let token = state.begin_load(PRODUCTS_KEY);
    state.complete_catalog_load(&token, Ok(vec![Product::new("p1", "Water")]));

    let json = r#"{
        "planogram_info": {"planogram_id": "42", "nom_planogram": "Drinks"},
        "furniture": [
            {"furniture_id": "9", "furniture_type_name": "refrigerator", "largeur": 80, "hauteur": 200, "profondeur": 70,
             "nb_etageres_unique_face": 5, "nb_colonnes_unique_face": 3}
        ],
        "product_positions": [
            {"position_id": "1", "furniture_id": "9", "produit_id": "p1", "face": "front", "etagere": 2, "colonne": 3, "quantite": 4},
            {"position_id": "2", "furniture_id": "9", "produit_id": "p404", "face": "front", "etagere": 1, "colonne": 1, "quantite": 1}
        ]
    }"#;
    let import = state.import_planogram_json(json).unwrap();
    assert_eq!(import.products.iter().filter(|p| !p.found).count(), 1);

    let ids = state.apply_planogram_import(&import, None).unwrap();
    assert_eq!(ids, vec!["imported-9".to_string()]);
    let saved = state.library().get("imported-9").unwrap();
    assert_eq!(saved.furniture.name, "Drinks - refrigerator");
    assert_eq!((saved.furniture.sections, saved.furniture.slots), (5, 3));
    assert_eq!(saved.products.len(), 1);

    assert_eq!(state.edit_furniture_in_planogram("imported-9").unwrap(), 1);
    let cell = state.planogram().cell(2, 3).unwrap();
    assert_eq!(cell.product_id.as_deref(), Some("p1"));
    assert_eq!(cell.quantity, Some(4));
}

use planokit_core::{Product, ProductCatalog};
use planokit_designer::planogram::{zones, DropRejection, ShelvesConfig};
use planokit_designer::{
    import_planogram, DropEvent, DropOutcome, FurnitureType, PlanogramConfig, PlanogramGrid, Side,
};

fn shelves_grid() -> PlanogramGrid {
    let config = PlanogramConfig::new("Island", FurnitureType::ShelvesDisplay, 1, 1).with_shelves(
        ShelvesConfig {
            rows: 3,
            front_back_columns: 3,
            left_right_columns: 1,
        },
    );
    PlanogramGrid::new(config).unwrap()
}

#[test]
fn test_gondola_faces_split_twelve_columns() {
    let grid =
        PlanogramGrid::new(PlanogramConfig::new("g", FurnitureType::Gondola, 4, 12)).unwrap();
    let labels: Vec<_> = (0..12)
        .map(|x| grid.zone_label(grid.cell(x, 0).unwrap()).unwrap())
        .collect();
    assert_eq!(labels.iter().filter(|l| **l == "Face A").count(), 6);
    assert_eq!(labels[5], "Face A");
    assert_eq!(labels[6], "Face B");
}

#[test]
fn test_shelves_display_takes_its_own_shape() {
    let grid = shelves_grid();
    assert_eq!(grid.config().grid_size(), (3, 8));
    assert_eq!(grid.all_cells().len(), 24);
    assert_eq!(grid.zone_label(grid.cell(0, 0).unwrap()), Some("left"));
    assert_eq!(grid.zone_label(grid.cell(4, 0).unwrap()), Some("back"));
    assert_eq!(grid.zone_label(grid.cell(7, 2).unwrap()), Some("right"));
    assert_eq!(zones::column_in_face(grid.config(), 5), 2);
    assert_eq!(grid.cell_for_position(Some(Side::Back), 1, 2).map(|c| (c.x, c.y)), Some((5, 2)));
    assert!(grid.cell_for_position(None, 1, 1).is_none());
}

#[test]
fn test_drop_move_and_clear() {
    let mut grid =
        PlanogramGrid::new(PlanogramConfig::new("g", FurnitureType::Gondola, 4, 6)).unwrap();

    let DropOutcome::Placed { instance_id, .. } = grid.apply_drop(&DropEvent::from_library("p1", 0, 0))
    else {
        panic!("expected a placement");
    };
    assert_eq!(grid.instances().len(), 1);

    let moved = grid.apply_drop(&DropEvent::from_cell(0, 0, 2, 1));
    assert!(matches!(&moved, DropOutcome::Moved { instance_id: moved_id, .. } if *moved_id == instance_id));
    assert!(grid.cell(0, 0).unwrap().is_empty());
    assert_eq!(grid.cell(2, 1).unwrap().product_id.as_deref(), Some("p1"));

    assert_eq!(
        grid.apply_drop(&DropEvent::from_cell(0, 0, 1, 1)),
        DropOutcome::Rejected(DropRejection::SourceEmpty)
    );
    assert_eq!(
        grid.apply_drop(&DropEvent::from_library("p2", 9, 9)),
        DropOutcome::Rejected(DropRejection::TargetMissing)
    );

    // Dropping over an occupied cell releases the replaced instance.
    let replaced = grid.apply_drop(&DropEvent::from_library("p2", 2, 1));
    assert!(matches!(replaced, DropOutcome::Placed { released: Some(ref r), .. } if *r == instance_id));
    assert_eq!(grid.instances().len(), 1);

    let cleared = grid.clear_cell(2, 1).unwrap();
    assert!(cleared.instance_released);
    assert_eq!(grid.filled_count(), 0);
    assert!(grid.instances().is_empty());
}

#[test]
fn test_quantity_is_clamped() {
    let mut grid = PlanogramGrid::default();
    grid.apply_drop(&DropEvent::from_library("p1", 1, 1));
    assert_eq!(grid.set_quantity(1, 1, 0), Some(1));
    assert_eq!(grid.set_quantity(1, 1, 99), Some(20));
    assert_eq!(grid.set_quantity(40, 1, 3), None);
}

#[test]
fn test_envelope_positions_fill_gondola() {
    let catalog = ProductCatalog::from_products(vec![
        Product::new("p1", "Pasta"),
        Product::new("p2", "Rice"),
    ]);
    let json = r#"{
        "planogram_info": {"planogram_id": "7", "nom_planogram": "Dry goods"},
        "furniture": [
            {"furniture_id": "g", "furniture_type_name": "gondola", "largeur": 200, "hauteur": 180, "profondeur": 90,
             "nb_etageres_unique_face": 4, "nb_colonnes_unique_face": 6},
            {"furniture_id": "x", "furniture_type_name": "conveyor"}
        ],
        "product_positions": [
            {"position_id": "1", "furniture_id": "g", "produit_id": "p1", "face": "front", "etagere": 1, "colonne": 1},
            {"position_id": "2", "furniture_id": "g", "produit_id": "p2", "face": "back", "etagere": 4, "colonne": 3, "quantite": 6},
            {"position_id": "3", "furniture_id": "g", "produit_id": "p1", "face": "front", "etagere": 9, "colonne": 1}
        ]
    }"#;
    let import = import_planogram(json, &catalog).unwrap();
    assert_eq!(import.compatible_furniture().count(), 1);
    assert!(import.furniture.iter().any(|f| f.furniture_id == "x" && f.resolved.is_none()));

    let mut grid =
        PlanogramGrid::new(PlanogramConfig::new("Dry goods", FurnitureType::Gondola, 4, 6)).unwrap();
    let report = import.place_into("g", &mut grid);
    assert_eq!(report.placed, 2);
    assert_eq!(report.out_of_grid, vec!["3".to_string()]);
    assert_eq!(grid.cell(0, 3).unwrap().product_id.as_deref(), Some("p1"));
    let back = grid.cell(5, 0).unwrap();
    assert_eq!(back.product_id.as_deref(), Some("p2"));
    assert_eq!(back.quantity, Some(6));
}

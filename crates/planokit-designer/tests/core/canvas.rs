use planokit_designer::canvas::{Canvas, CanvasOutcome, Handle, InteractionState, ResizeHandle};
use planokit_designer::validity::{check_placement, InvalidReason, WALL_ADJACENCY_TOLERANCE};
use planokit_designer::{scene, ElementType, FloorPlanElement};

fn wall() -> FloorPlanElement {
    FloorPlanElement::new("wall-1", ElementType::Wall, 100.0, 100.0).with_size(200.0, 20.0)
}

#[test]
fn test_door_next_to_wall_scenario() {
    let elements = vec![wall()];
    let near = FloorPlanElement::new("d", ElementType::Door, 150.0, 95.0);
    let far = FloorPlanElement::new("d", ElementType::Door, 150.0, 400.0);

    assert!(check_placement(&near, &elements, WALL_ADJACENCY_TOLERANCE).valid);
    let refused = check_placement(&far, &elements, WALL_ADJACENCY_TOLERANCE);
    assert!(!refused.valid);
    assert_eq!(refused.reason, Some(InvalidReason::NeedsWallAdjacency));
}

#[test]
fn test_full_editing_session() {
    let mut canvas = Canvas::new();
    canvas.add_element(wall()).unwrap();

    // Place a shelf, then resize it from its east handle.
    canvas.select_tool(Some(ElementType::Shelf));
    let CanvasOutcome::ElementCreated(id) = canvas.pointer_down(400.0, 300.0) else {
        panic!("shelf should be placed");
    };
    let shelf = canvas.element(&id).cloned().unwrap();
    assert_eq!((shelf.width, shelf.height), (120.0, 40.0));

    let east = ResizeHandle::East.position(&shelf);
    assert_eq!(canvas.handle_at(&east), Some(Handle::Resize(ResizeHandle::East)));
    canvas.pointer_down(east.x, east.y);
    assert!(matches!(canvas.state(), InteractionState::Resizing(_)));
    canvas.pointer_move(east.x + 41.0, east.y);
    assert_eq!(canvas.pointer_up(east.x + 41.0, east.y), CanvasOutcome::ElementCommitted(id.clone()));

    let resized = canvas.element(&id).unwrap();
    assert_eq!(resized.width, 160.0);
    assert_eq!(resized.x, shelf.x);
    assert_eq!(resized.height, 40.0);
}

#[test]
fn test_cancel_keeps_model() {
    let mut canvas = Canvas::new();
    canvas.add_element(wall()).unwrap();
    let revision = canvas.revision();
    canvas.pointer_down(150.0, 110.0);
    canvas.pointer_move(300.0, 300.0);
    assert!(canvas.cancel());
    assert_eq!(canvas.revision(), revision);
    assert_eq!(canvas.element("wall-1").unwrap().x, 100.0);
    // The selection made by the click survives a cancel.
    assert_eq!(canvas.selected_id(), Some("wall-1"));
}

#[test]
fn test_snapshot_is_stable_across_edits() {
    let mut canvas = Canvas::new();
    canvas.add_element(wall()).unwrap();
    let snapshot = canvas.snapshot();
    canvas.move_element_to("wall-1", 0.0, 0.0).unwrap();
    assert_eq!(snapshot[0].x, 100.0);
    assert_eq!(canvas.element("wall-1").unwrap().x, 0.0);
}

#[test]
fn test_scene_projection_of_placed_element() {
    let element = FloorPlanElement::new("s", ElementType::Shelf, 300.0, 500.0);
    let transform = scene::to_scene(&element, 1000.0, 800.0);
    assert_eq!(transform.x, -200.0);
    assert_eq!(transform.z, 100.0);
    assert_eq!(transform.y, 30.0);
    assert_eq!(transform.depth, 40.0);
    assert_eq!(transform.height, 60.0);
}

use planokit_core::{Category, CategoryArena, Product, ProductCatalog, ProductLookup};
use proptest::prelude::*;
use std::collections::HashSet;

fn arena_from_parents(parents: &[Option<usize>]) -> CategoryArena {
    CategoryArena::from_flat(parents.iter().enumerate().map(|(i, parent)| Category {
        id: format!("c{}", i),
        name: format!("Category {}", i),
        parent_id: parent.map(|p| format!("c{}", p)),
    }))
}

proptest! {
    /// Whatever the parent links, the tree is a forest covering every node once.
    #[test]
    fn tree_covers_every_category_once(
        parents in prop::collection::vec(prop::option::of(0usize..12), 1..12)
    ) {
        let arena = arena_from_parents(&parents);
        let tree = arena.build_tree();

        let mut seen = HashSet::new();
        let mut stack: Vec<String> = tree.roots.clone();
        while let Some(id) = stack.pop() {
            prop_assert!(seen.insert(id.clone()), "{} reached twice", id);
            stack.extend(tree.children_of(&id).iter().cloned());
        }
        prop_assert_eq!(seen.len(), arena.len());
    }

    #[test]
    fn descendants_never_contain_self(
        parents in prop::collection::vec(prop::option::of(0usize..8), 1..8)
    ) {
        let arena = arena_from_parents(&parents);
        for i in 0..parents.len() {
            let id = format!("c{}", i);
            prop_assert!(!arena.descendants(&id).contains(&id));
        }
    }
}

#[test]
fn test_catalog_from_backend_payload() {
    let payload = r#"[
        {"primary_Id": "P1", "name": "Linen Shirt", "image": "shirt.png", "categoryId": "c1"},
        {"primary_Id": "P2", "name": "Straw Hat", "price": 19.9}
    ]"#;
    let products: Vec<Product> = serde_json::from_str(payload).unwrap();
    let catalog = ProductCatalog::from_products(products);

    assert_eq!(catalog.len(), 2);
    assert_eq!(
        catalog.product("P1").and_then(|p| p.image.as_deref()),
        Some("shirt.png")
    );
    assert!(catalog.product("P2").is_some_and(|p| p.extra.contains_key("price")));
}

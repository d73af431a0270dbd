//! Product catalog and category hierarchy.
//!
//! Products and categories are supplied by an external collaborator and are
//! read-only here. Categories arrive as a flat list with parent ids; the
//! hierarchy is rebuilt on demand by [`CategoryArena::build_tree`], which
//! tolerates dangling parents and cycles.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "primary_Id")]
    pub primary_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, rename = "categoryId", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    /// Fields this crate does not interpret, kept for round-tripping.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Product {
    pub fn new(primary_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            primary_id: primary_id.into(),
            name: name.into(),
            image: None,
            color: None,
            category_id: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// Lookup of products by id.
///
/// The planogram importer and grid model only need to resolve ids, so they
/// take this trait rather than a concrete catalog.
pub trait ProductLookup {
    fn product(&self, id: &str) -> Option<&Product>;

    fn contains(&self, id: &str) -> bool {
        self.product(id).is_some()
    }
}

/// In-memory product catalog indexed by `primary_Id`
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    products: Vec<Product>,
    index: HashMap<String, usize>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog; later duplicates of an id replace earlier ones.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        let mut catalog = Self::new();
        for product in products {
            catalog.insert(product);
        }
        catalog
    }

    pub fn insert(&mut self, product: Product) {
        match self.index.get(&product.primary_id) {
            Some(&slot) => self.products[slot] = product,
            None => {
                self.index
                    .insert(product.primary_id.clone(), self.products.len());
                self.products.push(product);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Case-insensitive substring search over product names and ids.
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.products.iter().collect();
        }
        self.products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.primary_id.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Products filed under `category_id` or any of its descendants.
    pub fn in_category<'a>(&'a self, arena: &CategoryArena, category_id: &str) -> Vec<&'a Product> {
        let mut wanted: HashSet<String> = arena.descendants(category_id).into_iter().collect();
        wanted.insert(category_id.to_string());
        self.products
            .iter()
            .filter(|p| p.category_id.as_ref().is_some_and(|c| wanted.contains(c)))
            .collect()
    }
}

impl ProductLookup for ProductCatalog {
    fn product(&self, id: &str) -> Option<&Product> {
        self.index.get(id).map(|&slot| &self.products[slot])
    }
}

/// A product category as delivered by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "parentId", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// Flat storage of categories keyed by id, preserving input order.
#[derive(Debug, Clone, Default)]
pub struct CategoryArena {
    nodes: HashMap<String, Category>,
    order: Vec<String>,
}

/// Parent to children edges derived from a [`CategoryArena`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTree {
    pub roots: Vec<String>,
    pub children: HashMap<String, Vec<String>>,
}

impl CategoryTree {
    pub fn children_of(&self, id: &str) -> &[String] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl CategoryArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_flat(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut arena = Self::new();
        for category in categories {
            arena.insert(category);
        }
        arena
    }

    pub fn insert(&mut self, category: Category) {
        if !self.nodes.contains_key(&category.id) {
            self.order.push(category.id.clone());
        }
        self.nodes.insert(category.id.clone(), category);
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parent of `id`, if the parent exists and does not lead back to `id`.
    fn effective_parent(&self, id: &str) -> Option<&str> {
        let parent = self.nodes.get(id)?.parent_id.as_deref()?;
        if !self.nodes.contains_key(parent) || self.on_cycle(id) {
            return None;
        }
        Some(parent)
    }

    /// True when walking parents from `id` returns to `id`.
    fn on_cycle(&self, id: &str) -> bool {
        let mut seen = HashSet::new();
        let mut current = self.nodes.get(id).and_then(|c| c.parent_id.as_deref());
        while let Some(next) = current {
            if next == id {
                return true;
            }
            if !seen.insert(next) {
                return false;
            }
            current = self.nodes.get(next).and_then(|c| c.parent_id.as_deref());
        }
        false
    }

    /// Builds parent to children edges.
    ///
    /// Categories whose parent is missing, and every category that sits on a
    /// parent cycle, become roots.
    pub fn build_tree(&self) -> CategoryTree {
        let mut tree = CategoryTree::default();
        for id in &self.order {
            match self.effective_parent(id) {
                Some(parent) => tree
                    .children
                    .entry(parent.to_string())
                    .or_default()
                    .push(id.clone()),
                None => tree.roots.push(id.clone()),
            }
        }
        tree
    }

    /// All categories below `id`, breadth first.
    pub fn descendants(&self, id: &str) -> Vec<String> {
        let tree = self.build_tree();
        let mut out = Vec::new();
        let mut seen: HashSet<&str> = HashSet::from([id]);
        let mut queue: Vec<&str> = vec![id];
        while let Some(current) = queue.pop() {
            for child in tree.children_of(current) {
                if seen.insert(child.as_str()) {
                    out.push(child.clone());
                    queue.insert(0, child.as_str());
                }
            }
        }
        out
    }

    /// Names from the root down to `id`, e.g. for breadcrumbs.
    pub fn path(&self, id: &str) -> Vec<String> {
        let mut path = Vec::new();
        let mut current = self.nodes.get(id).map(|c| c.id.as_str());
        while let Some(node) = current {
            if let Some(category) = self.nodes.get(node) {
                path.push(category.name.clone());
            }
            current = self.effective_parent(node);
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(id: &str, parent: Option<&str>) -> Category {
        Category {
            id: id.to_string(),
            name: id.to_uppercase(),
            parent_id: parent.map(str::to_string),
        }
    }

    #[test]
    fn test_product_wire_format() {
        let json = r#"{"primary_Id":"P1","name":"Jeans","color":"blue","sku":"J-01"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.primary_id, "P1");
        assert_eq!(product.color.as_deref(), Some("blue"));
        assert_eq!(product.extra.get("sku").and_then(|v| v.as_str()), Some("J-01"));

        let back = serde_json::to_value(&product).unwrap();
        assert_eq!(back["primary_Id"], "P1");
        assert_eq!(back["sku"], "J-01");
    }

    #[test]
    fn test_catalog_lookup_and_replace() {
        let mut catalog =
            ProductCatalog::from_products([Product::new("P1", "Shirt"), Product::new("P2", "Hat")]);
        assert!(catalog.contains("P1"));
        assert!(!catalog.contains("P3"));

        catalog.insert(Product::new("P1", "Polo"));
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.product("P1").map(|p| p.name.as_str()), Some("Polo"));
    }

    #[test]
    fn test_catalog_search() {
        let catalog =
            ProductCatalog::from_products([Product::new("P1", "Blue Shirt"), Product::new("P2", "Hat")]);
        assert_eq!(catalog.search("shirt").len(), 1);
        assert_eq!(catalog.search("p2").len(), 1);
        assert_eq!(catalog.search("  ").len(), 2);
    }

    #[test]
    fn test_build_tree() {
        let arena = CategoryArena::from_flat([
            cat("men", None),
            cat("shirts", Some("men")),
            cat("polo", Some("shirts")),
            cat("orphan", Some("missing")),
        ]);
        let tree = arena.build_tree();
        assert_eq!(tree.roots, vec!["men".to_string(), "orphan".to_string()]);
        assert_eq!(tree.children_of("men"), ["shirts".to_string()]);
        assert_eq!(tree.children_of("shirts"), ["polo".to_string()]);
        assert_eq!(arena.path("polo"), vec!["MEN", "SHIRTS", "POLO"]);
    }

    #[test]
    fn test_cycle_members_become_roots() {
        let arena = CategoryArena::from_flat([
            cat("a", Some("b")),
            cat("b", Some("a")),
            cat("c", Some("a")),
        ]);
        let tree = arena.build_tree();
        assert_eq!(tree.roots, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(tree.children_of("a"), ["c".to_string()]);
        assert_eq!(arena.descendants("a"), vec!["c".to_string()]);
        assert_eq!(arena.path("c"), vec!["A", "C"]);
    }

    #[test]
    fn test_self_parent_is_root() {
        let arena = CategoryArena::from_flat([cat("loop", Some("loop"))]);
        assert_eq!(arena.build_tree().roots, vec!["loop".to_string()]);
        assert!(arena.descendants("loop").is_empty());
    }

    #[test]
    fn test_products_in_category() {
        let arena = CategoryArena::from_flat([cat("men", None), cat("shirts", Some("men"))]);
        let mut shirt = Product::new("P1", "Shirt");
        shirt.category_id = Some("shirts".to_string());
        let mut hat = Product::new("P2", "Hat");
        hat.category_id = Some("hats".to_string());
        let catalog = ProductCatalog::from_products([shirt, hat]);

        let found = catalog.in_category(&arena, "men");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].primary_id, "P1");
    }
}

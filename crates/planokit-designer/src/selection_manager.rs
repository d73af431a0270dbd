/// Tracks the single selected element.
///
/// Selecting replaces the previous selection; there is no multi-select.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionManager {
    selected_id: Option<String>,
}

impl SelectionManager {
    /// Creates a new `SelectionManager` with no selection.
    ///
    /// # Examples
    ///
    /// ```
    /// use planokit_designer::selection_manager::SelectionManager;
    ///
    /// let manager = SelectionManager::new();
    /// assert_eq!(manager.selected_id(), None);
    /// ```
    pub fn new() -> Self {
        Self { selected_id: None }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_id.as_deref() == Some(id)
    }

    /// Selects `id`, returning true when the selection changed.
    pub fn select(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.selected_id.as_deref() == Some(id.as_str()) {
            return false;
        }
        self.selected_id = Some(id);
        true
    }

    /// Clears the selection, returning true when something was selected.
    pub fn clear(&mut self) -> bool {
        self.selected_id.take().is_some()
    }

    /// Drops the selection if it points at `id`.
    pub fn forget(&mut self, id: &str) -> bool {
        if self.is_selected(id) {
            self.selected_id = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_overwrites() {
        let mut manager = SelectionManager::new();
        assert!(manager.select("a"));
        assert!(manager.select("b"));
        assert_eq!(manager.selected_id(), Some("b"));
        assert!(!manager.select("b"));
    }

    #[test]
    fn test_forget_only_matching() {
        let mut manager = SelectionManager::new();
        manager.select("a");
        assert!(!manager.forget("b"));
        assert!(manager.forget("a"));
        assert!(!manager.clear());
    }
}

use std::sync::Arc;

use crate::canvas::Canvas;
use crate::model::FloorPlanElement;

/// A reversible change to the element collection.
///
/// Commands are recorded after the canvas already applied the change, so
/// they only carry what is needed to revert and replay it.
#[derive(Debug, Clone)]
pub enum EditorCommand {
    AddElement {
        index: usize,
        element: FloorPlanElement,
    },
    RemoveElement {
        index: usize,
        element: FloorPlanElement,
    },
    ModifyElement {
        before: FloorPlanElement,
        after: FloorPlanElement,
    },
    /// Whole-collection change such as clearing the plan.
    ReplaceElements {
        name: &'static str,
        before: Arc<Vec<FloorPlanElement>>,
        after: Arc<Vec<FloorPlanElement>>,
    },
}

impl EditorCommand {
    /// Derives the command for a change to `element_id` between two snapshots.
    pub fn between(
        element_id: &str,
        before: &[FloorPlanElement],
        after: &[FloorPlanElement],
    ) -> Option<Self> {
        let old = before.iter().position(|e| e.id == element_id);
        let new = after.iter().position(|e| e.id == element_id);
        match (old, new) {
            (None, Some(index)) => Some(EditorCommand::AddElement {
                index,
                element: after[index].clone(),
            }),
            (Some(index), None) => Some(EditorCommand::RemoveElement {
                index,
                element: before[index].clone(),
            }),
            (Some(i), Some(j)) if before[i] != after[j] => Some(EditorCommand::ModifyElement {
                before: before[i].clone(),
                after: after[j].clone(),
            }),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            EditorCommand::AddElement { .. } => "Add Element",
            EditorCommand::RemoveElement { .. } => "Remove Element",
            EditorCommand::ModifyElement { .. } => "Modify Element",
            EditorCommand::ReplaceElements { name, .. } => *name,
        }
    }

    /// Element the command is about, if it concerns a single one.
    pub fn element_id(&self) -> Option<&str> {
        match self {
            EditorCommand::AddElement { element, .. } | EditorCommand::RemoveElement { element, .. } => {
                Some(element.id.as_str())
            }
            EditorCommand::ModifyElement { after, .. } => Some(after.id.as_str()),
            EditorCommand::ReplaceElements { .. } => None,
        }
    }

    pub fn undo(&self, canvas: &mut Canvas) {
        match self {
            EditorCommand::AddElement { element, .. } => {
                canvas.remove_element(&element.id);
            }
            EditorCommand::RemoveElement { index, element } => {
                canvas.restore_element(*index, element.clone());
            }
            EditorCommand::ModifyElement { before, .. } => {
                canvas.replace_element(before.clone());
            }
            EditorCommand::ReplaceElements { before, .. } => {
                canvas.restore_snapshot(Arc::clone(before));
            }
        }
    }

    pub fn redo(&self, canvas: &mut Canvas) {
        match self {
            EditorCommand::AddElement { index, element } => {
                canvas.restore_element(*index, element.clone());
            }
            EditorCommand::RemoveElement { element, .. } => {
                canvas.remove_element(&element.id);
            }
            EditorCommand::ModifyElement { after, .. } => {
                canvas.replace_element(after.clone());
            }
            EditorCommand::ReplaceElements { after, .. } => {
                canvas.restore_snapshot(Arc::clone(after));
            }
        }
    }
}

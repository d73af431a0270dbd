//! Undo/redo of element changes.

use planokit_core::ElementEvent;

use super::DesignerState;
use crate::commands::EditorCommand;

impl DesignerState {
    /// Records a change the canvas already applied.
    pub(crate) fn push_command(&mut self, command: EditorCommand) {
        tracing::debug!("Recorded {}", command.name());
        self.undo_stack.push(command);
        if self.undo_stack.len() > self.history_limit {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
        self.is_modified = true;
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Name of the change `undo` would revert.
    pub fn undo_name(&self) -> Option<&str> {
        self.undo_stack.last().map(EditorCommand::name)
    }

    pub fn redo_name(&self) -> Option<&str> {
        self.redo_stack.last().map(EditorCommand::name)
    }

    pub fn undo(&mut self) -> bool {
        let Some(command) = self.undo_stack.pop() else {
            return false;
        };
        command.undo(&mut self.canvas);
        self.after_history_step(&command);
        self.redo_stack.push(command);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(command) = self.redo_stack.pop() else {
            return false;
        };
        command.redo(&mut self.canvas);
        self.after_history_step(&command);
        self.undo_stack.push(command);
        true
    }

    /// Clear history stacks
    pub fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn after_history_step(&mut self, command: &EditorCommand) {
        self.is_modified = true;
        for pruned in self.matches.retain_elements(self.canvas.elements()) {
            self.unmatched(pruned);
        }
        let event = match command.element_id() {
            Some(id) if self.canvas.element(id).is_some() => ElementEvent::Updated {
                element_id: id.to_string(),
            },
            Some(id) => ElementEvent::Removed {
                element_id: id.to_string(),
            },
            None => ElementEvent::Reloaded {
                element_count: self.canvas.element_count(),
            },
        };
        self.publish(event);
    }
}

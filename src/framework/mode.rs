//! # Screen Modes
//!
//! The engine's state is a single tagged [`Mode`]. Data that only makes sense in one
//! state lives inside that variant: the search strategy only exists in `Find`, and the id
//! being edited only exists in `UpdateEditing`, so a `Delete` with an edit loaded cannot
//! be expressed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Search strategy of the `Find` mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchMode {
    #[default]
    ById,
    All,
    ByText,
}

/// The operation an operator picks from the screen's menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeKind {
    Idle,
    Create,
    Find,
    Update,
    Delete,
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModeKind::Idle => "idle",
            ModeKind::Create => "create",
            ModeKind::Find => "find",
            ModeKind::Update => "update",
            ModeKind::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Full engine state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode<Id> {
    Idle,
    Create,
    Find { search: SearchMode },
    /// Update, first phase: only the id is editable.
    UpdateAwaitingId,
    /// Update, second phase: the record `id` has been loaded into the form.
    UpdateEditing { id: Id },
    Delete,
}

impl<Id> Mode<Id> {
    /// Entry state for a menu selection.
    pub fn enter(kind: ModeKind) -> Self {
        match kind {
            ModeKind::Idle => Mode::Idle,
            ModeKind::Create => Mode::Create,
            ModeKind::Find => Mode::Find {
                search: SearchMode::default(),
            },
            ModeKind::Update => Mode::UpdateAwaitingId,
            ModeKind::Delete => Mode::Delete,
        }
    }

    pub fn kind(&self) -> ModeKind {
        match self {
            Mode::Idle => ModeKind::Idle,
            Mode::Create => ModeKind::Create,
            Mode::Find { .. } => ModeKind::Find,
            Mode::UpdateAwaitingId | Mode::UpdateEditing { .. } => ModeKind::Update,
            Mode::Delete => ModeKind::Delete,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Mode::Idle)
    }

    pub fn edit_loaded(&self) -> bool {
        matches!(self, Mode::UpdateEditing { .. })
    }

    pub fn search_mode(&self) -> Option<SearchMode> {
        match self {
            Mode::Find { search } => Some(*search),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_enters_awaiting_id() {
        let mode = Mode::<u32>::enter(ModeKind::Update);
        assert_eq!(mode, Mode::UpdateAwaitingId);
        assert_eq!(mode.kind(), ModeKind::Update);
        assert!(!mode.edit_loaded());
    }

    #[test]
    fn search_mode_only_exists_in_find() {
        assert_eq!(
            Mode::<u32>::enter(ModeKind::Find).search_mode(),
            Some(SearchMode::ById)
        );
        assert_eq!(Mode::<u32>::enter(ModeKind::Delete).search_mode(), None);
    }
}

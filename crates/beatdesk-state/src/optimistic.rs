//! Optimistic edits.
//!
//! A mutation patches the local snapshot before the backend answers. The
//! [`OptimisticEdit`] returned by [`OptimisticEdit::apply`] remembers what the
//! snapshot looked like, so the patch can be either confirmed (and refined with
//! the record the backend sent back) or rolled back to the exact previous
//! value.

use std::fmt;

use beatdesk_types::{Identified, Page};

use crate::store::Snapshot;

/// Local change a mutation makes ahead of the backend.
pub enum Patch<T> {
    /// Edit the record with this identifier in place.
    Modify {
        /// Target record.
        id: String,
        /// In-place edit, applied to both the list and the selection.
        edit: Box<dyn Fn(&mut T) + Send + Sync>,
    },
    /// Remove the record with this identifier.
    Remove {
        /// Target record.
        id: String,
    },
    /// A new record; nothing to show until the backend returns it.
    Insert,
}

impl<T> Patch<T> {
    /// Edits the record `id` in place.
    pub fn modify(id: impl Into<String>, edit: impl Fn(&mut T) + Send + Sync + 'static) -> Self {
        Self::Modify {
            id: id.into(),
            edit: Box::new(edit),
        }
    }

    /// Removes the record `id`.
    pub fn remove(id: impl Into<String>) -> Self {
        Self::Remove { id: id.into() }
    }

    /// Identifier of the record the patch targets.
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Modify { id, .. } | Self::Remove { id } => Some(id),
            Self::Insert => None,
        }
    }
}

impl<T> fmt::Debug for Patch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Modify { id, .. } => f.debug_struct("Modify").field("id", id).finish(),
            Self::Remove { id } => f.debug_struct("Remove").field("id", id).finish(),
            Self::Insert => f.write_str("Insert"),
        }
    }
}

/// Rollback point captured when a patch is applied.
#[derive(Debug, Clone)]
pub struct OptimisticEdit<T> {
    data: Option<Page<T>>,
    selected: Option<T>,
    unreconciled: bool,
    revision: u64,
}

impl<T: Identified + Clone> OptimisticEdit<T> {
    /// Applies `patch` to the snapshot and captures its previous value.
    pub fn apply<F>(snapshot: &mut Snapshot<T, F>, patch: &Patch<T>) -> Self {
        let rollback = Self {
            data: snapshot.data.clone(),
            selected: snapshot.selected.clone(),
            unreconciled: snapshot.unreconciled,
            revision: snapshot.revision,
        };

        match patch {
            Patch::Modify { id, edit } => {
                if let Some(record) = snapshot.data.as_mut().and_then(|p| p.find_mut(id)) {
                    edit(record);
                }
                if let Some(selected) = snapshot.selected.as_mut().filter(|s| s.id() == id) {
                    edit(selected);
                }
            }
            Patch::Remove { id } => {
                if let Some(page) = snapshot.data.as_mut() {
                    page.remove(id);
                }
                if snapshot.selected.as_ref().is_some_and(|s| s.id() == id) {
                    snapshot.selected = None;
                }
            }
            Patch::Insert => {}
        }
        snapshot.unreconciled = true;
        rollback
    }

    /// Keeps the patch, replacing the local guess with the backend's record
    /// when one came back.
    pub fn confirm<F>(self, snapshot: &mut Snapshot<T, F>, patch: &Patch<T>, record: Option<T>) {
        let Some(record) = record else {
            return;
        };
        match patch {
            Patch::Modify { id, .. } => {
                if let Some(existing) = snapshot.data.as_mut().and_then(|p| p.find_mut(id)) {
                    *existing = record.clone();
                }
                if snapshot.selected.as_ref().is_some_and(|s| s.id() == id) {
                    snapshot.selected = Some(record);
                }
            }
            Patch::Insert => {
                snapshot.data.get_or_insert_with(Page::default).upsert(record);
            }
            Patch::Remove { .. } => {}
        }
    }

    /// Restores the snapshot to its value before the patch.
    ///
    /// Skipped when a fetch landed after the patch was applied, since that
    /// fetch already replaced the patched data. Returns true if restored.
    pub fn rollback<F>(self, snapshot: &mut Snapshot<T, F>) -> bool {
        if snapshot.revision != self.revision {
            return false;
        }
        snapshot.data = self.data;
        snapshot.selected = self.selected;
        snapshot.unreconciled = self.unreconciled;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beatdesk_types::{UserFilters, User, UserStatus};

    fn user(id: &str) -> User {
        User {
            id: id.to_string(),
            username: format!("user{}", id),
            email: format!("user{}@example.com", id),
            display_name: None,
            phone: None,
            role: Default::default(),
            status: UserStatus::Active,
            country: None,
            block_reason: None,
            created_at: None,
            last_login_at: None,
        }
    }

    fn snapshot() -> Snapshot<User, UserFilters> {
        let mut snapshot = Snapshot::default();
        snapshot.data = Some(
            Page {
                content: vec![user("1"), user("42")],
                ..Page::default()
            }
            .normalized(),
        );
        snapshot.selected = Some(user("42"));
        snapshot
    }

    #[test]
    fn test_modify_patches_list_and_selection() {
        let mut snap = snapshot();
        let patch = Patch::modify("42", |u: &mut User| u.block(None));
        let _edit = OptimisticEdit::apply(&mut snap, &patch);

        let page = snap.data.as_ref().unwrap();
        assert!(page.find("42").unwrap().is_blocked());
        assert!(!page.find("1").unwrap().is_blocked());
        assert!(snap.selected.as_ref().unwrap().is_blocked());
        assert!(snap.unreconciled);
    }

    #[test]
    fn test_rollback_restores_exact_value() {
        let original = snapshot();
        let mut snap = original.clone();
        let patch = Patch::remove("42");
        let edit = OptimisticEdit::apply(&mut snap, &patch);
        assert_eq!(snap.data.as_ref().unwrap().len(), 1);
        assert!(snap.selected.is_none());

        assert!(edit.rollback(&mut snap));
        assert_eq!(snap.data, original.data);
        assert_eq!(snap.selected, original.selected);
        assert!(!snap.unreconciled);
    }

    #[test]
    fn test_rollback_skipped_after_newer_fetch() {
        let mut snap = snapshot();
        let patch = Patch::remove("42");
        let edit = OptimisticEdit::apply(&mut snap, &patch);

        snap.revision += 1;
        snap.data = Some(Page::default());

        assert!(!edit.rollback(&mut snap));
        assert!(snap.data.as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_confirm_inserts_created_record_at_front() {
        let mut snap = snapshot();
        let patch = Patch::Insert;
        let edit = OptimisticEdit::apply(&mut snap, &patch);
        edit.confirm(&mut snap, &patch, Some(user("99")));

        let page = snap.data.as_ref().unwrap();
        assert_eq!(page.content[0].id, "99");
        assert_eq!(page.total_elements, 3);
    }

    #[test]
    fn test_confirm_prefers_server_record() {
        let mut snap = snapshot();
        let patch = Patch::modify("42", |u: &mut User| u.block(None));
        let edit = OptimisticEdit::apply(&mut snap, &patch);

        let mut server = user("42");
        server.block(Some("Spam".to_string()));
        edit.confirm(&mut snap, &patch, Some(server.clone()));

        assert_eq!(snap.data.as_ref().unwrap().find("42"), Some(&server));
        assert_eq!(snap.selected, Some(server));
    }
}

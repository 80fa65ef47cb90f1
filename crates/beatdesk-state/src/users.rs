//! User management store.

use beatdesk_types::{CreateUserRequest, UpdateUserRequest, User, UserFilters};
use tokio::sync::watch;

use crate::optimistic::Patch;
use crate::resource::Users;
use crate::store::{Mutation, ResourceStore, Snapshot, StoreContext};

/// Snapshot of the user store.
pub type UserSnapshot = Snapshot<User, UserFilters>;

/// User listing plus account actions.
#[derive(Debug, Clone)]
pub struct UserStore {
    store: ResourceStore<Users>,
}

impl UserStore {
    /// Creates an empty store.
    pub fn new(ctx: StoreContext) -> Self {
        Self {
            store: ResourceStore::new(Users, ctx),
        }
    }

    /// The underlying generic store.
    pub fn inner(&self) -> &ResourceStore<Users> {
        &self.store
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> UserSnapshot {
        self.store.snapshot()
    }

    /// Receives every new snapshot.
    pub fn subscribe(&self) -> watch::Receiver<UserSnapshot> {
        self.store.subscribe()
    }

    /// Lists users matching `filters`.
    pub async fn fetch_users(&self, filters: UserFilters) -> bool {
        self.store.fetch_list(filters).await
    }

    /// Fetches again with the current filters.
    pub async fn refresh(&self) -> bool {
        self.store.refresh().await
    }

    /// Loads one user into the detail view.
    pub async fn fetch_user(&self, id: &str) -> bool {
        self.store.fetch_one(id).await
    }

    /// Selects a cached user.
    pub fn select(&self, id: &str) -> bool {
        self.store.select(id)
    }

    /// Clears the detail view.
    pub fn clear_selection(&self) {
        self.store.clear_selection();
    }

    /// Creates an account. The new user shows up once the backend returns it.
    pub async fn create_user(&self, req: CreateUserRequest) -> bool {
        let mutation = Mutation::new(
            "create",
            Patch::Insert,
            "User created",
            "Failed to create user",
        );
        self.store
            .mutate(mutation, self.store.client().create_user(&req))
            .await
    }

    /// Updates an account.
    pub async fn update_user(&self, id: &str, req: UpdateUserRequest) -> bool {
        let local = req.clone();
        let patch = Patch::modify(id, move |user: &mut User| user.apply_update(&local));
        let mutation = Mutation::new("update", patch, "User updated", "Failed to update user");
        self.store
            .mutate(mutation, self.store.client().update_user(id, &req))
            .await
    }

    /// Blocks an account.
    pub async fn block_user(&self, id: &str, reason: Option<String>) -> bool {
        let local_reason = reason.clone();
        let patch = Patch::modify(id, move |user: &mut User| user.block(local_reason.clone()));
        let mutation = Mutation::new("block", patch, "User blocked", "Failed to block user");
        self.store
            .mutate(mutation, self.store.client().block_user(id, reason))
            .await
    }

    /// Lifts a block.
    pub async fn unblock_user(&self, id: &str) -> bool {
        let patch = Patch::modify(id, |user: &mut User| user.unblock());
        let mutation = Mutation::new("unblock", patch, "User unblocked", "Failed to unblock user");
        self.store
            .mutate(mutation, self.store.client().unblock_user(id))
            .await
    }

    /// Deletes an account.
    pub async fn delete_user(&self, id: &str) -> bool {
        let client = self.store.client();
        let mutation = Mutation::new(
            "delete",
            Patch::remove(id),
            "User deleted",
            "Failed to delete user",
        );
        self.store
            .mutate(mutation, async move { client.delete_user(id).await.map(|()| None) })
            .await
    }

    /// Drops all cached state.
    pub fn reset(&self) {
        self.store.reset();
    }
}

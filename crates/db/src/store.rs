//! Store traits: the boundary the services call through.
//!
//! Each trait covers one entity. [`Gateway`] bundles all four so a service
//! can hold a single `Arc<dyn Gateway>`.

use async_trait::async_trait;
use taskboard_core::pagination::PageRequest;
use taskboard_core::task::TaskStatus;
use taskboard_core::types::{DbId, UserId};

use crate::error::DbResult;
use crate::models::collection::{
    Collection, CollectionWithRights, CreateCollection, UserCollection,
};
use crate::models::rights::{CollectionMember, Rights, UpsertRights};
use crate::models::task::{CreateTask, Task, TaskListQuery, UpdateTask};
use crate::models::user::{CreateUser, User};

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. Fails with a unique violation on a duplicate email.
    async fn create_user(&self, input: &CreateUser) -> DbResult<User>;

    async fn find_user_by_id(&self, id: UserId) -> DbResult<Option<User>>;

    /// Look up a user by exact email.
    async fn find_user_by_email(&self, email: &str) -> DbResult<Option<User>>;
}

#[async_trait]
pub trait CollectionStore: Send + Sync {
    async fn create_collection(&self, input: &CreateCollection) -> DbResult<Collection>;

    async fn find_collection(&self, id: DbId) -> DbResult<Option<Collection>>;

    /// Load a collection together with `user_id`'s rights row in one lookup.
    async fn find_collection_with_rights(
        &self,
        id: DbId,
        user_id: UserId,
    ) -> DbResult<Option<CollectionWithRights>>;

    /// Collections `user_id` created or holds a rights row in.
    ///
    /// Created collections come first, then newest first. Returns the page
    /// and the total number of matching collections.
    async fn list_user_collections(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> DbResult<(Vec<UserCollection>, i64)>;

    /// Delete a collection and, by cascade, its tasks and rights rows.
    async fn delete_collection(&self, id: DbId) -> DbResult<bool>;
}

#[async_trait]
pub trait RightsStore: Send + Sync {
    /// Create the rights row for `(user_id, collection_id)` or overwrite all
    /// four flags of the existing one, atomically.
    async fn upsert_rights(&self, input: &UpsertRights) -> DbResult<Rights>;

    /// Remove a rights row. Returns `false` if there was none.
    async fn delete_rights(&self, user_id: UserId, collection_id: DbId) -> DbResult<bool>;

    /// Users holding a rights row in the collection, ordered by name.
    async fn list_members(&self, collection_id: DbId) -> DbResult<Vec<CollectionMember>>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create_task(&self, input: &CreateTask) -> DbResult<Task>;

    /// Tasks of a collection filtered by status, in listing order, plus the
    /// total number of matching tasks.
    async fn list_tasks(
        &self,
        collection_id: DbId,
        query: &TaskListQuery,
    ) -> DbResult<(Vec<Task>, i64)>;

    /// Delete a task scoped to its collection. Returns `false` if nothing matched.
    async fn delete_task(&self, collection_id: DbId, task_id: DbId) -> DbResult<bool>;

    /// Returns `None` if no task with `task_id` belongs to `collection_id`.
    async fn update_task(
        &self,
        collection_id: DbId,
        task_id: DbId,
        input: &UpdateTask,
    ) -> DbResult<Option<Task>>;

    /// Returns `None` if no task with `task_id` belongs to `collection_id`.
    async fn update_task_status(
        &self,
        collection_id: DbId,
        task_id: DbId,
        status: TaskStatus,
    ) -> DbResult<Option<Task>>;
}

/// Every store the services need.
pub trait Gateway: UserStore + CollectionStore + RightsStore + TaskStore {}

impl<T> Gateway for T where T: UserStore + CollectionStore + RightsStore + TaskStore {}

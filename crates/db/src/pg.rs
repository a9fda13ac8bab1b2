//! PostgreSQL-backed store.

use async_trait::async_trait;
use sqlx::PgPool;
use taskboard_core::pagination::PageRequest;
use taskboard_core::task::TaskStatus;
use taskboard_core::types::{DbId, UserId};

use crate::error::{DbError, DbResult};
use crate::models::collection::{
    Collection, CollectionWithRights, CreateCollection, UserCollection,
};
use crate::models::rights::{CollectionMember, Rights, UpsertRights};
use crate::models::task::{CreateTask, Task, TaskListQuery, UpdateTask};
use crate::models::user::{CreateUser, User};
use crate::repositories::{CollectionRepo, RightsRepo, TaskRepo, UserRepo};
use crate::store::{CollectionStore, RightsStore, TaskStore, UserStore};

/// Constraint names the store reports by name.
const KNOWN_CONSTRAINTS: &[&str] = &[
    "uq_users_email",
    "uq_user_rights_user_collection",
    "collections_creator_id_fkey",
    "user_rights_user_id_fkey",
    "user_rights_collection_id_fkey",
    "tasks_collection_id_fkey",
];

/// Map constraint violations onto [`DbError`] variants; everything else
/// stays a raw sqlx error.
fn classify(err: sqlx::Error) -> DbError {
    if let sqlx::Error::Database(db_err) = &err {
        let constraint = db_err
            .constraint()
            .and_then(|name| KNOWN_CONSTRAINTS.iter().copied().find(|c| *c == name))
            .unwrap_or("unknown");
        match db_err.code().as_deref() {
            Some("23505") => return DbError::UniqueViolation(constraint),
            Some("23503") => return DbError::ForeignKeyViolation(constraint),
            _ => {}
        }
    }
    DbError::Sqlx(err)
}

/// Store backed by a PostgreSQL pool. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, input: &CreateUser) -> DbResult<User> {
        UserRepo::create(&self.pool, input).await.map_err(classify)
    }

    async fn find_user_by_id(&self, id: UserId) -> DbResult<Option<User>> {
        Ok(UserRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        Ok(UserRepo::find_by_email(&self.pool, email).await?)
    }
}

#[async_trait]
impl CollectionStore for PgStore {
    async fn create_collection(&self, input: &CreateCollection) -> DbResult<Collection> {
        CollectionRepo::create(&self.pool, input)
            .await
            .map_err(classify)
    }

    async fn find_collection(&self, id: DbId) -> DbResult<Option<Collection>> {
        Ok(CollectionRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_collection_with_rights(
        &self,
        id: DbId,
        user_id: UserId,
    ) -> DbResult<Option<CollectionWithRights>> {
        Ok(CollectionRepo::find_with_rights(&self.pool, id, user_id).await?)
    }

    async fn list_user_collections(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> DbResult<(Vec<UserCollection>, i64)> {
        let items = CollectionRepo::list_for_user(&self.pool, user_id, page).await?;
        let total = CollectionRepo::count_for_user(&self.pool, user_id).await?;
        Ok((items, total))
    }

    async fn delete_collection(&self, id: DbId) -> DbResult<bool> {
        Ok(CollectionRepo::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl RightsStore for PgStore {
    async fn upsert_rights(&self, input: &UpsertRights) -> DbResult<Rights> {
        RightsRepo::upsert(&self.pool, input).await.map_err(classify)
    }

    async fn delete_rights(&self, user_id: UserId, collection_id: DbId) -> DbResult<bool> {
        Ok(RightsRepo::delete(&self.pool, user_id, collection_id).await?)
    }

    async fn list_members(&self, collection_id: DbId) -> DbResult<Vec<CollectionMember>> {
        Ok(RightsRepo::list_members(&self.pool, collection_id).await?)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn create_task(&self, input: &CreateTask) -> DbResult<Task> {
        TaskRepo::create(&self.pool, input).await.map_err(classify)
    }

    async fn list_tasks(
        &self,
        collection_id: DbId,
        query: &TaskListQuery,
    ) -> DbResult<(Vec<Task>, i64)> {
        let items = TaskRepo::list(&self.pool, collection_id, query).await?;
        let total = TaskRepo::count(&self.pool, collection_id, &query.statuses).await?;
        Ok((items, total))
    }

    async fn delete_task(&self, collection_id: DbId, task_id: DbId) -> DbResult<bool> {
        Ok(TaskRepo::delete(&self.pool, collection_id, task_id).await?)
    }

    async fn update_task(
        &self,
        collection_id: DbId,
        task_id: DbId,
        input: &UpdateTask,
    ) -> DbResult<Option<Task>> {
        Ok(TaskRepo::update(&self.pool, collection_id, task_id, input).await?)
    }

    async fn update_task_status(
        &self,
        collection_id: DbId,
        task_id: DbId,
        status: TaskStatus,
    ) -> DbResult<Option<Task>> {
        Ok(TaskRepo::update_status(&self.pool, collection_id, task_id, status).await?)
    }
}

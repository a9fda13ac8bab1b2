//! In-process store with the same observable behavior as [`PgStore`].
//!
//! Enforces the unique constraints and foreign keys of the migrations,
//! cascades collection deletes, and orders listings exactly like the SQL
//! queries do.
//!
//! [`PgStore`]: crate::pg::PgStore

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use taskboard_core::pagination::PageRequest;
use taskboard_core::task::{compare_for_listing, TaskStatus};
use taskboard_core::types::{DbId, Timestamp, UserId};
use tokio::sync::RwLock;

use crate::error::{DbError, DbResult};
use crate::models::collection::{
    Collection, CollectionWithRights, CreateCollection, UserCollection,
};
use crate::models::rights::{CollectionMember, Rights, UpsertRights};
use crate::models::task::{CreateTask, Task, TaskListQuery, UpdateTask};
use crate::models::user::{CreateUser, User};
use crate::store::{CollectionStore, RightsStore, TaskStore, UserStore};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    collections: BTreeMap<DbId, Collection>,
    rights: BTreeMap<DbId, Rights>,
    tasks: BTreeMap<DbId, Task>,
    last_id: DbId,
    last_timestamp: Option<Timestamp>,
}

impl Tables {
    fn next_id(&mut self) -> DbId {
        self.last_id += 1;
        self.last_id
    }

    /// Current time, nudged forward so that no two writes share a timestamp.
    fn now(&mut self) -> Timestamp {
        let now = Utc::now();
        let ts = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(ts);
        ts
    }

    fn rights_for(&self, user_id: UserId, collection_id: DbId) -> Option<&Rights> {
        self.rights
            .values()
            .find(|r| r.user_id == user_id && r.collection_id == collection_id)
    }
}

fn page_of<T: Clone>(rows: &[T], page: PageRequest) -> Vec<T> {
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit).unwrap_or(0);
    rows.iter().skip(offset).take(limit).cloned().collect()
}

/// Store holding every table in memory behind one lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, input: &CreateUser) -> DbResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == input.email) {
            return Err(DbError::UniqueViolation("uq_users_email"));
        }
        let now = tables.now();
        let user = User {
            id: UserId::new_v4(),
            name: input.name.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: UserId) -> DbResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl CollectionStore for MemoryStore {
    async fn create_collection(&self, input: &CreateCollection) -> DbResult<Collection> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&input.creator_id) {
            return Err(DbError::ForeignKeyViolation("collections_creator_id_fkey"));
        }
        let now = tables.now();
        let collection = Collection {
            id: tables.next_id(),
            name: input.name.clone(),
            creator_id: input.creator_id,
            created_at: now,
            updated_at: now,
        };
        tables.collections.insert(collection.id, collection.clone());
        Ok(collection)
    }

    async fn find_collection(&self, id: DbId) -> DbResult<Option<Collection>> {
        Ok(self.tables.read().await.collections.get(&id).cloned())
    }

    async fn find_collection_with_rights(
        &self,
        id: DbId,
        user_id: UserId,
    ) -> DbResult<Option<CollectionWithRights>> {
        let tables = self.tables.read().await;
        Ok(tables.collections.get(&id).map(|c| CollectionWithRights {
            collection: c.clone(),
            rights: tables.rights_for(user_id, id).map(Rights::flags),
        }))
    }

    async fn list_user_collections(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> DbResult<(Vec<UserCollection>, i64)> {
        let tables = self.tables.read().await;
        let mut rows: Vec<UserCollection> = tables
            .collections
            .values()
            .filter_map(|c| {
                let is_creator = c.creator_id == user_id;
                let rights = tables.rights_for(user_id, c.id).map(Rights::flags);
                if !is_creator && rights.is_none() {
                    return None;
                }
                Some(UserCollection {
                    id: c.id,
                    name: c.name.clone(),
                    creator_id: c.creator_id,
                    is_creator,
                    created_at: c.created_at,
                    updated_at: c.updated_at,
                    user_rights: if is_creator { None } else { rights },
                })
            })
            .collect();

        rows.sort_by(|a, b| {
            b.is_creator
                .cmp(&a.is_creator)
                .then(b.created_at.cmp(&a.created_at))
                .then(b.id.cmp(&a.id))
        });

        let total = rows.len() as i64;
        Ok((page_of(&rows, page), total))
    }

    async fn delete_collection(&self, id: DbId) -> DbResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.collections.remove(&id).is_none() {
            return Ok(false);
        }
        tables.tasks.retain(|_, t| t.collection_id != id);
        tables.rights.retain(|_, r| r.collection_id != id);
        Ok(true)
    }
}

#[async_trait]
impl RightsStore for MemoryStore {
    async fn upsert_rights(&self, input: &UpsertRights) -> DbResult<Rights> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&input.user_id) {
            return Err(DbError::ForeignKeyViolation("user_rights_user_id_fkey"));
        }
        if !tables.collections.contains_key(&input.collection_id) {
            return Err(DbError::ForeignKeyViolation("user_rights_collection_id_fkey"));
        }

        let now = tables.now();
        let flags = input.flags;
        if let Some(row) = tables
            .rights
            .values_mut()
            .find(|r| r.user_id == input.user_id && r.collection_id == input.collection_id)
        {
            row.right_to_create = flags.right_to_create;
            row.right_to_edit = flags.right_to_edit;
            row.right_to_delete = flags.right_to_delete;
            row.right_to_change_status = flags.right_to_change_status;
            row.updated_at = now;
            return Ok(row.clone());
        }

        let row = Rights {
            id: tables.next_id(),
            user_id: input.user_id,
            collection_id: input.collection_id,
            right_to_create: flags.right_to_create,
            right_to_edit: flags.right_to_edit,
            right_to_delete: flags.right_to_delete,
            right_to_change_status: flags.right_to_change_status,
            created_at: now,
            updated_at: now,
        };
        tables.rights.insert(row.id, row.clone());
        Ok(row)
    }

    async fn delete_rights(&self, user_id: UserId, collection_id: DbId) -> DbResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.rights.len();
        tables
            .rights
            .retain(|_, r| !(r.user_id == user_id && r.collection_id == collection_id));
        Ok(tables.rights.len() < before)
    }

    async fn list_members(&self, collection_id: DbId) -> DbResult<Vec<CollectionMember>> {
        let tables = self.tables.read().await;
        let mut members: Vec<CollectionMember> = tables
            .rights
            .values()
            .filter(|r| r.collection_id == collection_id)
            .filter_map(|r| {
                tables.users.get(&r.user_id).map(|u| CollectionMember {
                    id: u.id,
                    name: u.name.clone(),
                    email: u.email.clone(),
                    user_rights: r.flags(),
                })
            })
            .collect();
        members.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(members)
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create_task(&self, input: &CreateTask) -> DbResult<Task> {
        let mut tables = self.tables.write().await;
        if !tables.collections.contains_key(&input.collection_id) {
            return Err(DbError::ForeignKeyViolation("tasks_collection_id_fkey"));
        }
        let now = tables.now();
        let task = Task {
            id: tables.next_id(),
            collection_id: input.collection_id,
            name: input.name.clone(),
            description: input.description.clone(),
            priority: input.priority,
            status: TaskStatus::New,
            created_at: now,
            updated_at: now,
        };
        tables.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn list_tasks(
        &self,
        collection_id: DbId,
        query: &TaskListQuery,
    ) -> DbResult<(Vec<Task>, i64)> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Task> = tables
            .tasks
            .values()
            .filter(|t| t.collection_id == collection_id && query.statuses.contains(&t.status))
            .cloned()
            .collect();
        rows.sort_by(|a, b| compare_for_listing(a, b, query.sort));

        let total = rows.len() as i64;
        Ok((page_of(&rows, query.page), total))
    }

    async fn delete_task(&self, collection_id: DbId, task_id: DbId) -> DbResult<bool> {
        let mut tables = self.tables.write().await;
        let owned = tables
            .tasks
            .get(&task_id)
            .is_some_and(|t| t.collection_id == collection_id);
        if owned {
            tables.tasks.remove(&task_id);
        }
        Ok(owned)
    }

    async fn update_task(
        &self,
        collection_id: DbId,
        task_id: DbId,
        input: &UpdateTask,
    ) -> DbResult<Option<Task>> {
        let mut tables = self.tables.write().await;
        let now = tables.now();
        let Some(task) = tables
            .tasks
            .get_mut(&task_id)
            .filter(|t| t.collection_id == collection_id)
        else {
            return Ok(None);
        };
        task.name = input.name.clone();
        task.priority = input.priority;
        if let Some(description) = &input.description {
            task.description = description.clone();
        }
        task.updated_at = now;
        Ok(Some(task.clone()))
    }

    async fn update_task_status(
        &self,
        collection_id: DbId,
        task_id: DbId,
        status: TaskStatus,
    ) -> DbResult<Option<Task>> {
        let mut tables = self.tables.write().await;
        let now = tables.now();
        let Some(task) = tables
            .tasks
            .get_mut(&task_id)
            .filter(|t| t.collection_id == collection_id)
        else {
            return Ok(None);
        };
        task.status = status;
        task.updated_at = now;
        Ok(Some(task.clone()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Task lifecycle inside a collection.
//!
//! Every operation resolves the collection together with the caller's rights
//! row in one lookup, then applies the rule for its action: writes need the
//! matching right flag, reads need membership (see [`ReadPolicy`]). The
//! creator passes every check.

use std::sync::Arc;

use taskboard_core::error::CoreError;
use taskboard_core::pagination::Page;
use taskboard_core::rights::{authorize, write_denied_message, Access, ReadPolicy, Right};
use taskboard_core::task::{
    normalize_task_name, validate_task_description, Priority, TaskStatus,
};
use taskboard_core::types::{DbId, UserId};
use taskboard_db::models::task::{CreateTask, Task, TaskListQuery, UpdateTask};
use taskboard_db::Gateway;

use crate::error::AppResult;

/// Unvalidated task fields as submitted for create and edit.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub name: String,
    pub priority: String,
    pub description: Option<String>,
}

/// A draft whose fields passed validation.
struct ValidTask {
    name: String,
    priority: Priority,
    description: Option<String>,
}

impl TaskDraft {
    fn validate(self) -> Result<ValidTask, CoreError> {
        let name = normalize_task_name(&self.name)?;
        let priority: Priority = self.priority.parse()?;
        if let Some(description) = &self.description {
            validate_task_description(description)?;
        }
        Ok(ValidTask {
            name,
            priority,
            description: self.description,
        })
    }
}

#[derive(Clone)]
pub struct TaskService {
    gateway: Arc<dyn Gateway>,
    read_policy: ReadPolicy,
}

impl TaskService {
    pub fn new(gateway: Arc<dyn Gateway>, read_policy: ReadPolicy) -> Self {
        Self {
            gateway,
            read_policy,
        }
    }

    /// Resolve the collection and check `actor` may perform `access` in it.
    async fn authorize(
        &self,
        actor: UserId,
        collection_id: DbId,
        access: Access,
    ) -> AppResult<()> {
        let found =
            super::load_collection_for(self.gateway.as_ref(), collection_id, actor).await?;

        let decision = authorize(
            actor,
            found.collection.creator_id,
            found.rights.as_ref(),
            access,
            self.read_policy,
        );
        if !decision.is_allowed() {
            tracing::debug!(%actor, collection_id, ?access, ?decision, "Task access denied");
        }

        let message = match access {
            Access::Read => "You don't have rights to read tasks from this collection".to_string(),
            Access::Write(right) => write_denied_message(right),
        };
        Ok(decision.into_result(message)?)
    }

    /// Create a task with status `new`. Requires the create right.
    pub async fn create(
        &self,
        actor: UserId,
        collection_id: DbId,
        draft: TaskDraft,
    ) -> AppResult<Task> {
        let valid = draft.validate()?;
        self.authorize(actor, collection_id, Access::Write(Right::Create))
            .await?;

        let task = self
            .gateway
            .create_task(&CreateTask {
                collection_id,
                name: valid.name,
                description: valid.description.unwrap_or_default(),
                priority: valid.priority,
            })
            .await?;

        tracing::info!(%actor, collection_id, task_id = task.id, "Task created");
        Ok(task)
    }

    /// One page of the collection's tasks. Requires read access.
    pub async fn list(
        &self,
        actor: UserId,
        collection_id: DbId,
        query: TaskListQuery,
    ) -> AppResult<Page<Task>> {
        self.authorize(actor, collection_id, Access::Read).await?;

        let (items, total) = self.gateway.list_tasks(collection_id, &query).await?;
        Ok(Page::new(query.page, items, total))
    }

    /// Delete a task. A task outside this collection is left untouched.
    pub async fn delete(&self, actor: UserId, collection_id: DbId, task_id: DbId) -> AppResult<()> {
        self.authorize(actor, collection_id, Access::Write(Right::Delete))
            .await?;

        let deleted = self.gateway.delete_task(collection_id, task_id).await?;
        if deleted {
            tracing::info!(%actor, collection_id, task_id, "Task deleted");
        } else {
            tracing::debug!(%actor, collection_id, task_id, "No task to delete");
        }
        Ok(())
    }

    /// Overwrite name, priority and (if given) description. Never touches status.
    pub async fn edit(
        &self,
        actor: UserId,
        collection_id: DbId,
        task_id: DbId,
        draft: TaskDraft,
    ) -> AppResult<Task> {
        let valid = draft.validate()?;
        self.authorize(actor, collection_id, Access::Write(Right::Edit))
            .await?;

        let task = self
            .gateway
            .update_task(
                collection_id,
                task_id,
                &UpdateTask {
                    name: valid.name,
                    priority: valid.priority,
                    description: valid.description,
                },
            )
            .await?
            .ok_or_else(|| CoreError::Internal("Failed to edit task".into()))?;

        tracing::info!(%actor, collection_id, task_id, "Task edited");
        Ok(task)
    }

    /// Move a task to any status. Requires the change-status right.
    pub async fn change_status(
        &self,
        actor: UserId,
        collection_id: DbId,
        task_id: DbId,
        status: &str,
    ) -> AppResult<Task> {
        let status: TaskStatus = status.parse()?;
        self.authorize(actor, collection_id, Access::Write(Right::ChangeStatus))
            .await?;

        let task = self
            .gateway
            .update_task_status(collection_id, task_id, status)
            .await?
            .ok_or_else(|| CoreError::Internal("Failed to change task status".into()))?;

        tracing::info!(%actor, collection_id, task_id, %status, "Task status changed");
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use taskboard_core::pagination::PageRequest;
    use taskboard_core::rights::RightFlags;
    use taskboard_core::task::TaskSortField;

    use super::*;
    use crate::error::AppError;
    use crate::services::test_support::{collection, gateway, grant, user};

    fn draft(name: &str, priority: &str) -> TaskDraft {
        TaskDraft {
            name: name.to_string(),
            priority: priority.to_string(),
            description: None,
        }
    }

    fn all_tasks(page: i64) -> TaskListQuery {
        TaskListQuery {
            statuses: TaskStatus::ALL.to_vec(),
            sort: TaskSortField::CreatedAt,
            page: PageRequest::new(Some(page), Some(20)),
        }
    }

    fn only(right: Right) -> RightFlags {
        RightFlags {
            right_to_create: right == Right::Create,
            right_to_edit: right == Right::Edit,
            right_to_delete: right == Right::Delete,
            right_to_change_status: right == Right::ChangeStatus,
        }
    }

    fn assert_forbidden<T: std::fmt::Debug>(result: AppResult<T>, expected: &str) {
        assert_matches!(
            result,
            Err(AppError::Core(CoreError::Forbidden(msg))) if msg == expected
        );
    }

    #[tokio::test]
    async fn rights_scenario_from_grant_to_removal() {
        let gw = gateway();
        let creator = user(&gw, "Creator").await;
        let member = user(&gw, "Member").await;
        let id = collection(&gw, creator).await;
        grant(&gw, member, id, only(Right::Create)).await;
        let service = TaskService::new(gw.clone(), ReadPolicy::Membership);

        let task = service.create(member, id, draft("Fix bug", "high")).await.unwrap();
        assert_eq!(task.status, TaskStatus::New);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.description, "");

        assert_forbidden(
            service.delete(member, id, task.id).await,
            "You don't have rights to delete tasks from this collection",
        );
        service.delete(creator, id, task.id).await.unwrap();

        gw.delete_rights(member, id).await.unwrap();
        assert_forbidden(
            service.list(member, id, all_tasks(1)).await,
            "You don't have rights to read tasks from this collection",
        );
    }

    #[tokio::test]
    async fn each_write_needs_its_own_flag() {
        let gw = gateway();
        let creator = user(&gw, "Creator").await;
        let member = user(&gw, "Member").await;
        let id = collection(&gw, creator).await;
        let service = TaskService::new(gw.clone(), ReadPolicy::Membership);
        let task = service.create(creator, id, draft("Seed", "low")).await.unwrap();

        grant(&gw, member, id, only(Right::Edit)).await;
        assert_forbidden(
            service.create(member, id, draft("New", "low")).await,
            "You don't have rights to create a new task",
        );
        assert_forbidden(
            service.change_status(member, id, task.id, "completed").await,
            "You don't have rights to change status of tasks from this collection",
        );
        let edited = service.edit(member, id, task.id, draft("Renamed", "mid")).await.unwrap();
        assert_eq!(edited.name, "Renamed");

        grant(&gw, member, id, only(Right::ChangeStatus)).await;
        assert_forbidden(
            service.edit(member, id, task.id, draft("Again", "mid")).await,
            "You don't have rights to edit tasks from this collection",
        );
        service.change_status(member, id, task.id, "canceled").await.unwrap();
    }

    #[tokio::test]
    async fn creator_passes_without_rights_row() {
        let gw = gateway();
        let creator = user(&gw, "Creator").await;
        let id = collection(&gw, creator).await;
        let service = TaskService::new(gw, ReadPolicy::AnyRight);

        let task = service.create(creator, id, draft("Mine", "mid")).await.unwrap();
        service.edit(creator, id, task.id, draft("Still mine", "high")).await.unwrap();
        service.change_status(creator, id, task.id, "in_process").await.unwrap();
        assert_eq!(service.list(creator, id, all_tasks(1)).await.unwrap().items.len(), 1);
        service.delete(creator, id, task.id).await.unwrap();
    }

    #[tokio::test]
    async fn status_moves_freely_and_edit_keeps_it() {
        let gw = gateway();
        let creator = user(&gw, "Creator").await;
        let id = collection(&gw, creator).await;
        let service = TaskService::new(gw, ReadPolicy::Membership);
        let task = service.create(creator, id, draft("Cycle", "low")).await.unwrap();

        for status in ["completed", "new", "canceled", "in_process", "new"] {
            let moved = service.change_status(creator, id, task.id, status).await.unwrap();
            assert_eq!(moved.status.as_str(), status);
        }
        service.change_status(creator, id, task.id, "completed").await.unwrap();
        let edited = service.edit(creator, id, task.id, draft("Edited", "high")).await.unwrap();
        assert_eq!(edited.status, TaskStatus::Completed);
    }

    #[tokio::test]
    async fn invalid_enums_are_validation_errors() {
        let gw = gateway();
        let creator = user(&gw, "Creator").await;
        let id = collection(&gw, creator).await;
        let service = TaskService::new(gw, ReadPolicy::Membership);

        assert_matches!(
            service.create(creator, id, draft("Bad", "urgent")).await,
            Err(AppError::Core(CoreError::Validation(msg)))
                if msg == "priority must be one of the following values: low, mid, high"
        );
        let task = service.create(creator, id, draft("Good", "low")).await.unwrap();
        assert_matches!(
            service.change_status(creator, id, task.id, "done").await,
            Err(AppError::Core(CoreError::Validation(_)))
        );
    }

    #[tokio::test]
    async fn missing_task_is_an_internal_inconsistency() {
        let gw = gateway();
        let creator = user(&gw, "Creator").await;
        let id = collection(&gw, creator).await;
        let service = TaskService::new(gw, ReadPolicy::Membership);

        assert_matches!(
            service.edit(creator, id, 999, draft("Ghost", "low")).await,
            Err(AppError::Core(CoreError::Internal(msg))) if msg == "Failed to edit task"
        );
        assert_matches!(
            service.change_status(creator, id, 999, "completed").await,
            Err(AppError::Core(CoreError::Internal(msg))) if msg == "Failed to change task status"
        );
        service.delete(creator, id, 999).await.unwrap();
    }

    #[tokio::test]
    async fn twenty_five_tasks_span_two_pages() {
        let gw = gateway();
        let creator = user(&gw, "Creator").await;
        let id = collection(&gw, creator).await;
        let service = TaskService::new(gw, ReadPolicy::Membership);
        for i in 0..25 {
            service.create(creator, id, draft(&format!("Task {i}"), "mid")).await.unwrap();
        }

        let first = service.list(creator, id, all_tasks(1)).await.unwrap();
        let second = service.list(creator, id, all_tasks(2)).await.unwrap();
        assert_eq!((first.items.len(), first.total_pages), (20, 2));
        assert_eq!((second.items.len(), second.page), (5, 2));
    }

    #[tokio::test]
    async fn unknown_collection_is_not_found() {
        let gw = gateway();
        let creator = user(&gw, "Creator").await;
        let service = TaskService::new(gw, ReadPolicy::Membership);
        assert_matches!(
            service.list(creator, 42, all_tasks(1)).await,
            Err(AppError::Core(CoreError::NotFound { entity: "Collection" }))
        );
    }
}

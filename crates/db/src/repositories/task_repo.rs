//! Repository for the `tasks` table.

use sqlx::{PgPool, Postgres, QueryBuilder};
use taskboard_core::task::{Priority, TaskSortField, TaskStatus};
use taskboard_core::types::DbId;

use crate::models::task::{CreateTask, Task, TaskListQuery, UpdateTask};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, collection_id, name, description, priority, status, created_at, updated_at";

/// `CASE` expression mapping a text column to its fixed rank.
fn rank_case<const N: usize>(column: &str, ranks: [(&str, i32); N]) -> String {
    let arms: String = ranks
        .iter()
        .map(|(value, rank)| format!(" WHEN '{value}' THEN {rank}"))
        .collect();
    format!("CASE {column}{arms} END")
}

/// `ORDER BY` body for task listings, built only from typed enums.
fn order_clause(sort: TaskSortField) -> String {
    let status_rank = rank_case("status", TaskStatus::ALL.map(|s| (s.as_str(), s.rank())));
    let secondary = match sort {
        TaskSortField::CreatedAt => "created_at".to_string(),
        TaskSortField::UpdatedAt => "updated_at".to_string(),
        TaskSortField::Priority => {
            rank_case("priority", Priority::ALL.map(|p| (p.as_str(), p.rank())))
        }
    };
    format!("{status_rank} DESC, {secondary} DESC, id DESC")
}

fn status_names(statuses: &[TaskStatus]) -> Vec<String> {
    statuses.iter().map(|s| s.as_str().to_string()).collect()
}

/// Provides CRUD operations for tasks. Every lookup is scoped to a collection.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task with status `new`, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTask) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (collection_id, name, description, priority)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(input.collection_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.priority.as_str())
            .fetch_one(pool)
            .await
    }

    /// One page of a collection's tasks with the given statuses, in listing order.
    pub async fn list(
        pool: &PgPool,
        collection_id: DbId,
        query: &TaskListQuery,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM tasks WHERE collection_id = "));
        builder.push_bind(collection_id);
        builder.push(" AND status = ANY(");
        builder.push_bind(status_names(&query.statuses));
        builder.push(") ORDER BY ");
        builder.push(order_clause(query.sort));
        builder.push(" LIMIT ");
        builder.push_bind(query.page.limit);
        builder.push(" OFFSET ");
        builder.push_bind(query.page.offset());

        builder.build_query_as::<Task>().fetch_all(pool).await
    }

    /// Count a collection's tasks with the given statuses.
    pub async fn count(
        pool: &PgPool,
        collection_id: DbId,
        statuses: &[TaskStatus],
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tasks WHERE collection_id = $1 AND status = ANY($2)",
        )
        .bind(collection_id)
        .bind(status_names(statuses))
        .fetch_one(pool)
        .await
    }

    /// Delete a task. Returns `true` if a row was removed.
    pub async fn delete(
        pool: &PgPool,
        collection_id: DbId,
        task_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND collection_id = $2")
            .bind(task_id)
            .bind(collection_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Overwrite name and priority; `description` is only replaced when given.
    pub async fn update(
        pool: &PgPool,
        collection_id: DbId,
        task_id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                name = $3,
                priority = $4,
                description = COALESCE($5, description),
                updated_at = NOW()
             WHERE id = $1 AND collection_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(task_id)
            .bind(collection_id)
            .bind(&input.name)
            .bind(input.priority.as_str())
            .bind(input.description.as_deref())
            .fetch_optional(pool)
            .await
    }

    pub async fn update_status(
        pool: &PgPool,
        collection_id: DbId,
        task_id: DbId,
        status: TaskStatus,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET status = $3, updated_at = NOW()
             WHERE id = $1 AND collection_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(task_id)
            .bind(collection_id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }
}

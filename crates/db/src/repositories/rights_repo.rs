//! Repository for the `user_rights` table.

use sqlx::{FromRow, PgPool};
use taskboard_core::rights::RightFlags;
use taskboard_core::types::{DbId, UserId};

use crate::models::rights::{CollectionMember, Rights, UpsertRights};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, collection_id, right_to_create, right_to_edit, \
                       right_to_delete, right_to_change_status, created_at, updated_at";

#[derive(Debug, FromRow)]
struct MemberRow {
    id: UserId,
    name: String,
    email: String,
    right_to_create: bool,
    right_to_edit: bool,
    right_to_delete: bool,
    right_to_change_status: bool,
}

impl From<MemberRow> for CollectionMember {
    fn from(row: MemberRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            user_rights: RightFlags {
                right_to_create: row.right_to_create,
                right_to_edit: row.right_to_edit,
                right_to_delete: row.right_to_delete,
                right_to_change_status: row.right_to_change_status,
            },
        }
    }
}

/// Provides upsert, delete, and member listing for rights rows.
pub struct RightsRepo;

impl RightsRepo {
    /// Insert the rights row or overwrite all four flags in one statement.
    pub async fn upsert(pool: &PgPool, input: &UpsertRights) -> Result<Rights, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_rights
                (user_id, collection_id, right_to_create, right_to_edit,
                 right_to_delete, right_to_change_status)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT ON CONSTRAINT uq_user_rights_user_collection DO UPDATE SET
                right_to_create = EXCLUDED.right_to_create,
                right_to_edit = EXCLUDED.right_to_edit,
                right_to_delete = EXCLUDED.right_to_delete,
                right_to_change_status = EXCLUDED.right_to_change_status,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        let flags = input.flags;
        sqlx::query_as::<_, Rights>(&query)
            .bind(input.user_id)
            .bind(input.collection_id)
            .bind(flags.right_to_create)
            .bind(flags.right_to_edit)
            .bind(flags.right_to_delete)
            .bind(flags.right_to_change_status)
            .fetch_one(pool)
            .await
    }

    /// Delete the rights row for `(user_id, collection_id)`.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(
        pool: &PgPool,
        user_id: UserId,
        collection_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM user_rights WHERE user_id = $1 AND collection_id = $2")
                .bind(user_id)
                .bind(collection_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Users with a rights row in the collection, ordered by name.
    pub async fn list_members(
        pool: &PgPool,
        collection_id: DbId,
    ) -> Result<Vec<CollectionMember>, sqlx::Error> {
        let rows = sqlx::query_as::<_, MemberRow>(
            "SELECT u.id, u.name, u.email,
                    r.right_to_create, r.right_to_edit,
                    r.right_to_delete, r.right_to_change_status
             FROM user_rights r
             JOIN users u ON u.id = r.user_id
             WHERE r.collection_id = $1
             ORDER BY u.name, u.id",
        )
        .bind(collection_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(CollectionMember::from).collect())
    }
}

//! Repository for the `collections` table.

use sqlx::{FromRow, PgPool};
use taskboard_core::pagination::PageRequest;
use taskboard_core::rights::RightFlags;
use taskboard_core::types::{DbId, Timestamp, UserId};

use crate::models::collection::{
    Collection, CollectionWithRights, CreateCollection, UserCollection,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, creator_id, created_at, updated_at";

/// Rights columns as selected through `LEFT JOIN user_rights r`.
const RIGHTS_COLUMNS: &str = "r.id AS rights_id, r.right_to_create, r.right_to_edit, \
                              r.right_to_delete, r.right_to_change_status";

/// Nullable rights columns from a left join; all `None` when no row matched.
#[derive(Debug, FromRow)]
struct JoinedRights {
    rights_id: Option<DbId>,
    right_to_create: Option<bool>,
    right_to_edit: Option<bool>,
    right_to_delete: Option<bool>,
    right_to_change_status: Option<bool>,
}

impl JoinedRights {
    fn into_flags(self) -> Option<RightFlags> {
        self.rights_id.map(|_| RightFlags {
            right_to_create: self.right_to_create.unwrap_or(false),
            right_to_edit: self.right_to_edit.unwrap_or(false),
            right_to_delete: self.right_to_delete.unwrap_or(false),
            right_to_change_status: self.right_to_change_status.unwrap_or(false),
        })
    }
}

#[derive(Debug, FromRow)]
struct CollectionRightsRow {
    #[sqlx(flatten)]
    collection: Collection,
    #[sqlx(flatten)]
    rights: JoinedRights,
}

#[derive(Debug, FromRow)]
struct UserCollectionRow {
    id: DbId,
    name: String,
    creator_id: UserId,
    is_creator: bool,
    created_at: Timestamp,
    updated_at: Timestamp,
    #[sqlx(flatten)]
    rights: JoinedRights,
}

impl From<UserCollectionRow> for UserCollection {
    fn from(row: UserCollectionRow) -> Self {
        let user_rights = if row.is_creator {
            None
        } else {
            row.rights.into_flags()
        };
        Self {
            id: row.id,
            name: row.name,
            creator_id: row.creator_id,
            is_creator: row.is_creator,
            created_at: row.created_at,
            updated_at: row.updated_at,
            user_rights,
        }
    }
}

/// Provides CRUD operations for collections.
pub struct CollectionRepo;

impl CollectionRepo {
    /// Insert a new collection, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCollection,
    ) -> Result<Collection, sqlx::Error> {
        let query = format!(
            "INSERT INTO collections (name, creator_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Collection>(&query)
            .bind(&input.name)
            .bind(input.creator_id)
            .fetch_one(pool)
            .await
    }

    /// Find a collection by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Collection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM collections WHERE id = $1");
        sqlx::query_as::<_, Collection>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a collection by ID joined with `user_id`'s rights row, if any.
    pub async fn find_with_rights(
        pool: &PgPool,
        id: DbId,
        user_id: UserId,
    ) -> Result<Option<CollectionWithRights>, sqlx::Error> {
        let query = format!(
            "SELECT c.id, c.name, c.creator_id, c.created_at, c.updated_at, {RIGHTS_COLUMNS}
             FROM collections c
             LEFT JOIN user_rights r ON r.collection_id = c.id AND r.user_id = $2
             WHERE c.id = $1"
        );
        let row = sqlx::query_as::<_, CollectionRightsRow>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(|row| CollectionWithRights {
            collection: row.collection,
            rights: row.rights.into_flags(),
        }))
    }

    /// List collections `user_id` created or holds rights in.
    ///
    /// Created collections sort first, then most recently created first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Vec<UserCollection>, sqlx::Error> {
        let query = format!(
            "SELECT c.id, c.name, c.creator_id, c.created_at, c.updated_at,
                    (c.creator_id = $1) AS is_creator, {RIGHTS_COLUMNS}
             FROM collections c
             LEFT JOIN user_rights r ON r.collection_id = c.id AND r.user_id = $1
             WHERE c.creator_id = $1 OR r.id IS NOT NULL
             ORDER BY (c.creator_id = $1) DESC, c.created_at DESC, c.id DESC
             LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, UserCollectionRow>(&query)
            .bind(user_id)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(UserCollection::from).collect())
    }

    /// Count the collections [`list_for_user`](Self::list_for_user) would return across all pages.
    pub async fn count_for_user(pool: &PgPool, user_id: UserId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)
             FROM collections c
             LEFT JOIN user_rights r ON r.collection_id = c.id AND r.user_id = $1
             WHERE c.creator_id = $1 OR r.id IS NOT NULL",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Permanently delete a collection. Tasks and rights rows cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM collections WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

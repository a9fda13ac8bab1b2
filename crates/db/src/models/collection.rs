//! Collection entity model and read models.

use serde::Serialize;
use sqlx::FromRow;
use taskboard_core::rights::RightFlags;
use taskboard_core::types::{DbId, Timestamp, UserId};

/// A collection row from the `collections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: DbId,
    pub name: String,
    pub creator_id: UserId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new collection. `name` is already trimmed.
#[derive(Debug, Clone)]
pub struct CreateCollection {
    pub name: String,
    pub creator_id: UserId,
}

/// A collection joined with one user's rights row, if that user has one.
#[derive(Debug, Clone)]
pub struct CollectionWithRights {
    pub collection: Collection,
    pub rights: Option<RightFlags>,
}

/// One entry of a user's collection listing.
///
/// `user_rights` is `None` for collections the user created.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCollection {
    pub id: DbId,
    pub name: String,
    pub creator_id: UserId,
    pub is_creator: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub user_rights: Option<RightFlags>,
}

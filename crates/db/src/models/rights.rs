//! Per-user, per-collection rights rows.

use serde::Serialize;
use sqlx::FromRow;
use taskboard_core::rights::RightFlags;
use taskboard_core::types::{DbId, Timestamp, UserId};

/// A row from the `user_rights` table.
///
/// Unique on `(user_id, collection_id)`; never exists for the collection's
/// creator.
#[derive(Debug, Clone, FromRow)]
pub struct Rights {
    pub id: DbId,
    pub user_id: UserId,
    pub collection_id: DbId,
    pub right_to_create: bool,
    pub right_to_edit: bool,
    pub right_to_delete: bool,
    pub right_to_change_status: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Rights {
    pub fn flags(&self) -> RightFlags {
        RightFlags {
            right_to_create: self.right_to_create,
            right_to_edit: self.right_to_edit,
            right_to_delete: self.right_to_delete,
            right_to_change_status: self.right_to_change_status,
        }
    }
}

/// DTO for creating or fully replacing a rights row.
#[derive(Debug, Clone)]
pub struct UpsertRights {
    pub user_id: UserId,
    pub collection_id: DbId,
    pub flags: RightFlags,
}

/// A user holding a rights row in a collection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionMember {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub user_rights: RightFlags,
}

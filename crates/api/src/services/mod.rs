//! Application services: one struct per use-case family.
//!
//! Services receive their collaborators through constructors (the
//! persistence [`Gateway`] and, for authentication, the
//! [`TokenIssuer`](crate::auth::jwt::TokenIssuer)) and never touch HTTP types.
//! Each operation loads what it needs, asks the rights core for a decision,
//! and only then mutates.

pub mod auth;
pub mod collection;
pub mod membership;
pub mod task;
pub mod user;

use taskboard_core::error::CoreError;
use taskboard_core::types::{DbId, UserId};
use taskboard_db::models::collection::{Collection, CollectionWithRights};
use taskboard_db::Gateway;

use crate::error::AppResult;

pub use auth::AuthService;
pub use collection::CollectionService;
pub use membership::MembershipService;
pub use task::TaskService;
pub use user::UserService;

async fn load_collection(gateway: &dyn Gateway, collection_id: DbId) -> AppResult<Collection> {
    gateway
        .find_collection(collection_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Collection").into())
}

/// Load a collection joined with `user_id`'s rights row.
async fn load_collection_for(
    gateway: &dyn Gateway,
    collection_id: DbId,
    user_id: UserId,
) -> AppResult<CollectionWithRights> {
    gateway
        .find_collection_with_rights(collection_id, user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Collection").into())
}

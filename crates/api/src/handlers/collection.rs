//! Handlers for the `/collections` resource and its members.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use taskboard_core::ids::{parse_db_id, parse_user_id};
use taskboard_core::rights::RightFlags;
use taskboard_core::types::UserId;
use taskboard_db::models::collection::UserCollection;
use taskboard_db::models::rights::CollectionMember;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::{IdRef, MessageResponse, PageResponse, RightsSummary};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /collections`.
#[derive(Debug, Deserialize)]
pub struct CreateCollectionRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedCollectionResponse {
    pub message: &'static str,
    pub collection: IdRef,
}

#[derive(Debug, Serialize)]
pub struct CollectionList {
    pub collections: Vec<UserCollection>,
}

#[derive(Debug, Serialize)]
pub struct MemberList {
    pub users: Vec<CollectionMember>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantedUser {
    pub user_id: UserId,
    pub rights: RightsSummary,
}

#[derive(Debug, Serialize)]
pub struct SetRightsResponse {
    pub message: &'static str,
    pub user: GrantedUser,
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

/// POST /api/v1/collections
pub async fn create_collection(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateCollectionRequest>,
) -> AppResult<(StatusCode, Json<CreatedCollectionResponse>)> {
    let collection = state.collections.create(auth.user_id, &input.name).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedCollectionResponse {
            message: "Collection was created successfully",
            collection: IdRef { id: collection.id },
        }),
    ))
}

/// GET /api/v1/collections
///
/// Collections the caller created or was added to, created ones first.
pub async fn list_collections(
    auth: AuthUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<Json<PageResponse<CollectionList>>> {
    let page = state
        .collections
        .list(auth.user_id, params.page_request())
        .await?;
    Ok(Json(PageResponse::from_page(page, |collections| {
        CollectionList { collections }
    })))
}

/// DELETE /api/v1/collections/{collection_id}
pub async fn delete_collection(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(collection_id): AppPath<String>,
) -> AppResult<Json<MessageResponse>> {
    let collection_id = parse_db_id(&collection_id, "collectionId")?;
    state.collections.delete(auth.user_id, collection_id).await?;
    Ok(Json(MessageResponse::new("Collection was deleted successfully")))
}

// ---------------------------------------------------------------------------
// Members
// ---------------------------------------------------------------------------

/// GET /api/v1/collections/{collection_id}/users
pub async fn list_users(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(collection_id): AppPath<String>,
) -> AppResult<Json<MemberList>> {
    let collection_id = parse_db_id(&collection_id, "collectionId")?;
    let users = state.members.list_members(auth.user_id, collection_id).await?;
    Ok(Json(MemberList { users }))
}

/// PATCH /api/v1/collections/{collection_id}/users/{user_id}
///
/// Create or fully replace the user's rights; omitted flags become `false`.
pub async fn set_user_rights(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath((collection_id, user_id)): AppPath<(String, String)>,
    body: Result<AppJson<RightFlags>, AppError>,
) -> AppResult<Json<SetRightsResponse>> {
    let collection_id = parse_db_id(&collection_id, "collectionId")?;
    let user_id = parse_user_id(&user_id, "userId")?;
    let AppJson(flags) = body?;

    let rights = state
        .members
        .assign_rights(auth.user_id, collection_id, user_id, flags)
        .await?;

    Ok(Json(SetRightsResponse {
        message: "Set user rights successfully",
        user: GrantedUser {
            user_id: rights.user_id,
            rights: rights.flags().into(),
        },
    }))
}

/// DELETE /api/v1/collections/{collection_id}/users/{user_id}
pub async fn remove_user(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath((collection_id, user_id)): AppPath<(String, String)>,
) -> AppResult<Json<MessageResponse>> {
    let collection_id = parse_db_id(&collection_id, "collectionId")?;
    let user_id = parse_user_id(&user_id, "userId")?;

    state
        .members
        .remove_user(auth.user_id, collection_id, user_id)
        .await?;
    Ok(Json(MessageResponse::new(
        "User successfully removed from collection",
    )))
}

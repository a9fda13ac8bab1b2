use std::sync::Arc;

use taskboard_db::{DbPool, Gateway};

use crate::auth::jwt::TokenIssuer;
use crate::config::ServerConfig;
use crate::services::{
    AuthService, CollectionService, MembershipService, TaskService, UserService,
};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every field is an `Arc` or a service holding `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Validates the session cookie in the [`AuthUser`](crate::middleware::auth::AuthUser) extractor.
    pub tokens: Arc<dyn TokenIssuer>,
    /// PostgreSQL pool when running on PostgreSQL; probed by `/health`.
    pub pool: Option<DbPool>,
    pub auth: AuthService,
    pub users: UserService,
    pub collections: CollectionService,
    pub members: MembershipService,
    pub tasks: TaskService,
}

impl AppState {
    /// Wire every service to the same gateway and token issuer.
    pub fn new(
        config: ServerConfig,
        gateway: Arc<dyn Gateway>,
        tokens: Arc<dyn TokenIssuer>,
        pool: Option<DbPool>,
    ) -> Self {
        let read_policy = config.read_policy;
        Self {
            auth: AuthService::new(Arc::clone(&gateway), Arc::clone(&tokens)),
            users: UserService::new(Arc::clone(&gateway)),
            collections: CollectionService::new(Arc::clone(&gateway)),
            members: MembershipService::new(Arc::clone(&gateway), read_policy),
            tasks: TaskService::new(gateway, read_policy),
            config: Arc::new(config),
            tokens,
            pool,
        }
    }
}

use std::sync::Arc;

use taskboard_core::error::CoreError;
use taskboard_core::types::UserId;
use taskboard_db::models::user::UserResponse;
use taskboard_db::Gateway;

use crate::error::AppResult;

#[derive(Clone)]
pub struct UserService {
    gateway: Arc<dyn Gateway>,
}

impl UserService {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// The signed-in user's own profile.
    pub async fn profile(&self, user_id: UserId) -> AppResult<UserResponse> {
        let user = self
            .gateway
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| CoreError::not_found("User"))?;
        Ok(user.into())
    }
}

//! Collection lifecycle: create, list the caller's collections, delete.

use std::sync::Arc;

use taskboard_core::collection::normalize_collection_name;
use taskboard_core::pagination::{Page, PageRequest};
use taskboard_core::rights::require_creator;
use taskboard_core::types::{DbId, UserId};
use taskboard_db::models::collection::{Collection, CreateCollection, UserCollection};
use taskboard_db::Gateway;

use crate::error::AppResult;

#[derive(Clone)]
pub struct CollectionService {
    gateway: Arc<dyn Gateway>,
}

impl CollectionService {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// Create a collection owned by `user_id`. Any authenticated user may.
    pub async fn create(&self, user_id: UserId, name: &str) -> AppResult<Collection> {
        let name = normalize_collection_name(name)?;
        let collection = self
            .gateway
            .create_collection(&CreateCollection {
                name,
                creator_id: user_id,
            })
            .await?;

        tracing::info!(%user_id, collection_id = collection.id, "Collection created");
        Ok(collection)
    }

    /// Collections the user created or was added to, created ones first.
    pub async fn list(&self, user_id: UserId, page: PageRequest) -> AppResult<Page<UserCollection>> {
        let (items, total) = self.gateway.list_user_collections(user_id, page).await?;
        Ok(Page::new(page, items, total))
    }

    /// Delete a collection together with its tasks and rights rows.
    ///
    /// Only the creator may delete, even members holding every right.
    pub async fn delete(&self, user_id: UserId, collection_id: DbId) -> AppResult<()> {
        let collection = super::load_collection(self.gateway.as_ref(), collection_id).await?;

        require_creator(user_id, collection.creator_id)
            .into_result("Only the creator can delete the collection")?;

        self.gateway.delete_collection(collection_id).await?;
        tracing::info!(%user_id, collection_id, "Collection deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use taskboard_core::error::CoreError;
    use taskboard_core::rights::RightFlags;
    use taskboard_db::models::task::CreateTask;

    use super::*;
    use crate::error::AppError;
    use crate::services::test_support::{collection, gateway, grant, user};

    #[tokio::test]
    async fn create_trims_the_name() {
        let gw = gateway();
        let owner = user(&gw, "Owner").await;
        let service = CollectionService::new(gw);

        let created = service.create(owner, "  Sprint 12  ").await.unwrap();
        assert_eq!(created.name, "Sprint 12");
        assert_eq!(created.creator_id, owner);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let gw = gateway();
        let owner = user(&gw, "Owner").await;
        let service = CollectionService::new(gw);

        assert_matches!(
            service.create(owner, "   ").await,
            Err(AppError::Core(CoreError::Validation(_)))
        );
    }

    #[tokio::test]
    async fn only_the_creator_can_delete() {
        let gw = gateway();
        let owner = user(&gw, "Owner").await;
        let member = user(&gw, "Member").await;
        let id = collection(&gw, owner).await;
        grant(&gw, member, id, RightFlags::all()).await;
        let service = CollectionService::new(gw.clone());

        assert_matches!(
            service.delete(member, id).await,
            Err(AppError::Core(CoreError::Forbidden(msg)))
                if msg == "Only the creator can delete the collection"
        );
        service.delete(owner, id).await.unwrap();
        assert_matches!(
            service.delete(owner, id).await,
            Err(AppError::Core(CoreError::NotFound { entity: "Collection" }))
        );
    }

    #[tokio::test]
    async fn delete_cascades_to_tasks_and_members() {
        let gw = gateway();
        let owner = user(&gw, "Owner").await;
        let member = user(&gw, "Member").await;
        let id = collection(&gw, owner).await;
        grant(&gw, member, id, RightFlags::none()).await;
        let task = gw
            .create_task(&CreateTask {
                collection_id: id,
                name: "Orphan".into(),
                description: String::new(),
                priority: taskboard_core::task::Priority::Low,
            })
            .await
            .unwrap();

        CollectionService::new(gw.clone()).delete(owner, id).await.unwrap();

        assert!(!gw.delete_task(id, task.id).await.unwrap());
        assert!(gw.list_members(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_reports_pages_and_creator_flag() {
        let gw = gateway();
        let owner = user(&gw, "Owner").await;
        let other = user(&gw, "Other").await;
        let shared = collection(&gw, other).await;
        grant(&gw, owner, shared, RightFlags::none()).await;
        let service = CollectionService::new(gw);
        for i in 0..3 {
            service.create(owner, &format!("Mine {i}")).await.unwrap();
        }

        let page = service.list(owner, PageRequest::new(Some(1), Some(2))).await.unwrap();
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 2);
        assert!(page.items.iter().all(|c| c.is_creator));

        let last = service.list(owner, PageRequest::new(Some(2), Some(2))).await.unwrap();
        assert_eq!(last.items.len(), 2);
        assert!(last.items[0].is_creator);
        assert_eq!(last.items[1].id, shared);
        assert_eq!(last.items[1].user_rights, Some(RightFlags::none()));
    }
}

//! Rights lifecycle: granting, revoking, and listing collection members.
//!
//! Only the creator manages rights. The creator can never be the target of a
//! grant or a removal, so no rights row ever exists for them.

use std::sync::Arc;

use taskboard_core::error::CoreError;
use taskboard_core::rights::{
    authorize, ensure_not_creator, require_creator, Access, ReadPolicy, RightFlags,
};
use taskboard_core::types::{DbId, UserId};
use taskboard_db::models::rights::{CollectionMember, Rights, UpsertRights};
use taskboard_db::Gateway;

use crate::error::AppResult;

#[derive(Clone)]
pub struct MembershipService {
    gateway: Arc<dyn Gateway>,
    read_policy: ReadPolicy,
}

impl MembershipService {
    pub fn new(gateway: Arc<dyn Gateway>, read_policy: ReadPolicy) -> Self {
        Self {
            gateway,
            read_policy,
        }
    }

    /// Create or fully replace `target`'s rights in the collection.
    ///
    /// Checks run in order: collection exists, caller is the creator, target
    /// is not the creator, target user exists.
    pub async fn assign_rights(
        &self,
        actor: UserId,
        collection_id: DbId,
        target: UserId,
        flags: RightFlags,
    ) -> AppResult<Rights> {
        let collection = super::load_collection(self.gateway.as_ref(), collection_id).await?;

        require_creator(actor, collection.creator_id)
            .into_result("Only the creator can add users to this collection")?;
        ensure_not_creator(target, collection.creator_id, "You cannot set rights for yourself")?;

        if self.gateway.find_user_by_id(target).await?.is_none() {
            return Err(CoreError::not_found("User").into());
        }

        let rights = self
            .gateway
            .upsert_rights(&UpsertRights {
                user_id: target,
                collection_id,
                flags,
            })
            .await?;

        tracing::info!(
            %actor,
            %target,
            collection_id,
            create = flags.right_to_create,
            edit = flags.right_to_edit,
            delete = flags.right_to_delete,
            change_status = flags.right_to_change_status,
            "User rights set",
        );
        Ok(rights)
    }

    /// Remove `target` from the collection. Removing a non-member succeeds.
    pub async fn remove_user(
        &self,
        actor: UserId,
        collection_id: DbId,
        target: UserId,
    ) -> AppResult<()> {
        let collection = super::load_collection(self.gateway.as_ref(), collection_id).await?;

        require_creator(actor, collection.creator_id)
            .into_result("Only the creator can remove users from this collection")?;
        ensure_not_creator(
            target,
            collection.creator_id,
            "You cannot remove yourself from the collection because you are the creator",
        )?;

        let removed = self.gateway.delete_rights(target, collection_id).await?;
        tracing::info!(%actor, %target, collection_id, removed, "User removed from collection");
        Ok(())
    }

    /// Members of the collection with their rights. Requires read access.
    pub async fn list_members(
        &self,
        actor: UserId,
        collection_id: DbId,
    ) -> AppResult<Vec<CollectionMember>> {
        let found =
            super::load_collection_for(self.gateway.as_ref(), collection_id, actor).await?;

        let decision = authorize(
            actor,
            found.collection.creator_id,
            found.rights.as_ref(),
            Access::Read,
            self.read_policy,
        );
        if !decision.is_allowed() {
            tracing::debug!(%actor, collection_id, ?decision, "Member listing denied");
        }
        decision.into_result("You don't have rights to view users of this collection")?;

        Ok(self.gateway.list_members(collection_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use uuid::Uuid;

    use super::*;
    use crate::error::AppError;
    use crate::services::test_support::{collection, gateway, grant, user};

    fn flags(create: bool, edit: bool) -> RightFlags {
        RightFlags {
            right_to_create: create,
            right_to_edit: edit,
            ..RightFlags::none()
        }
    }

    #[tokio::test]
    async fn assign_is_a_full_replace() {
        let gw = gateway();
        let owner = user(&gw, "Owner").await;
        let member = user(&gw, "Member").await;
        let id = collection(&gw, owner).await;
        let service = MembershipService::new(gw, ReadPolicy::Membership);

        let first = service.assign_rights(owner, id, member, flags(true, true)).await.unwrap();
        let second = service.assign_rights(owner, id, member, flags(false, true)).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.flags(), flags(false, true));
    }

    #[tokio::test]
    async fn assign_twice_with_same_flags_is_idempotent() {
        let gw = gateway();
        let owner = user(&gw, "Owner").await;
        let member = user(&gw, "Member").await;
        let id = collection(&gw, owner).await;
        let service = MembershipService::new(gw, ReadPolicy::Membership);

        let a = service.assign_rights(owner, id, member, RightFlags::all()).await.unwrap();
        let b = service.assign_rights(owner, id, member, RightFlags::all()).await.unwrap();
        assert_eq!((a.id, a.flags()), (b.id, b.flags()));
        assert_eq!(service.list_members(owner, id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn assign_checks_run_in_order() {
        let gw = gateway();
        let owner = user(&gw, "Owner").await;
        let member = user(&gw, "Member").await;
        let id = collection(&gw, owner).await;
        grant(&gw, member, id, RightFlags::all()).await;
        let service = MembershipService::new(gw, ReadPolicy::Membership);

        assert_matches!(
            service.assign_rights(owner, 404, member, RightFlags::all()).await,
            Err(AppError::Core(CoreError::NotFound { entity: "Collection" }))
        );
        assert_matches!(
            service.assign_rights(member, id, owner, RightFlags::all()).await,
            Err(AppError::Core(CoreError::Forbidden(msg)))
                if msg == "Only the creator can add users to this collection"
        );
        assert_matches!(
            service.assign_rights(owner, id, owner, RightFlags::all()).await,
            Err(AppError::Core(CoreError::Validation(msg)))
                if msg == "You cannot set rights for yourself"
        );
        assert_matches!(
            service.assign_rights(owner, id, Uuid::new_v4(), RightFlags::all()).await,
            Err(AppError::Core(CoreError::NotFound { entity: "User" }))
        );
    }

    #[tokio::test]
    async fn self_targeting_never_mutates() {
        let gw = gateway();
        let owner = user(&gw, "Owner").await;
        let id = collection(&gw, owner).await;
        let service = MembershipService::new(gw, ReadPolicy::Membership);

        assert!(service.assign_rights(owner, id, owner, RightFlags::all()).await.is_err());
        assert!(service.remove_user(owner, id, owner).await.is_err());
        assert!(service.list_members(owner, id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_is_idempotent_and_creator_only() {
        let gw = gateway();
        let owner = user(&gw, "Owner").await;
        let member = user(&gw, "Member").await;
        let id = collection(&gw, owner).await;
        grant(&gw, member, id, RightFlags::all()).await;
        let service = MembershipService::new(gw, ReadPolicy::Membership);

        assert_matches!(
            service.remove_user(member, id, member).await,
            Err(AppError::Core(CoreError::Forbidden(msg)))
                if msg == "Only the creator can remove users from this collection"
        );
        service.remove_user(owner, id, member).await.unwrap();
        service.remove_user(owner, id, member).await.unwrap();
        assert!(service.list_members(owner, id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn members_can_list_but_strangers_cannot() {
        let gw = gateway();
        let owner = user(&gw, "Owner").await;
        let member = user(&gw, "Member").await;
        let stranger = user(&gw, "Stranger").await;
        let id = collection(&gw, owner).await;
        grant(&gw, member, id, RightFlags::none()).await;

        let service = MembershipService::new(gw.clone(), ReadPolicy::Membership);
        let members = service.list_members(member, id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].id, member);
        assert_matches!(
            service.list_members(stranger, id).await,
            Err(AppError::Core(CoreError::Forbidden(msg)))
                if msg == "You don't have rights to view users of this collection"
        );

        let strict = MembershipService::new(gw, ReadPolicy::AnyRight);
        assert!(strict.list_members(member, id).await.is_err());
        assert!(strict.list_members(owner, id).await.is_ok());
    }
}

//! Rights resolution for collections and their tasks.
//!
//! A collection's creator may do anything inside it and never has a rights
//! row of their own. Every other user acts through a per-collection
//! [`RightFlags`] record: each write action is gated by one flag, while read
//! access only requires that the record exists (see [`ReadPolicy`]).
//!
//! Everything here is pure. Services load the collection and the caller's
//! rights row, ask [`authorize`] for a [`Decision`], and only turn a denial
//! into a [`CoreError`] at their own boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::UserId;

// ---------------------------------------------------------------------------
// Rights
// ---------------------------------------------------------------------------

/// A single grantable right within a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Right {
    Create,
    Edit,
    Delete,
    ChangeStatus,
}

impl Right {
    pub const ALL: [Right; 4] = [
        Right::Create,
        Right::Edit,
        Right::Delete,
        Right::ChangeStatus,
    ];

    /// Wording used in "You don't have rights to ..." messages.
    pub fn action_phrase(self) -> &'static str {
        match self {
            Right::Create => "create a new task",
            Right::Edit => "edit tasks from this collection",
            Right::Delete => "delete tasks from this collection",
            Right::ChangeStatus => "change status of tasks from this collection",
        }
    }
}

impl fmt::Display for Right {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Right::Create => "create",
            Right::Edit => "edit",
            Right::Delete => "delete",
            Right::ChangeStatus => "change_status",
        };
        f.write_str(name)
    }
}

/// The four right flags held by a non-creator member of a collection.
///
/// Every flag defaults to `false`, so an omitted field in a grant request
/// clears the right.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RightFlags {
    #[serde(default)]
    pub right_to_create: bool,
    #[serde(default)]
    pub right_to_edit: bool,
    #[serde(default)]
    pub right_to_delete: bool,
    #[serde(default)]
    pub right_to_change_status: bool,
}

impl RightFlags {
    /// All four rights granted.
    pub const fn all() -> Self {
        Self {
            right_to_create: true,
            right_to_edit: true,
            right_to_delete: true,
            right_to_change_status: true,
        }
    }

    /// Membership without any write right.
    pub const fn none() -> Self {
        Self {
            right_to_create: false,
            right_to_edit: false,
            right_to_delete: false,
            right_to_change_status: false,
        }
    }

    pub fn has(&self, right: Right) -> bool {
        match right {
            Right::Create => self.right_to_create,
            Right::Edit => self.right_to_edit,
            Right::Delete => self.right_to_delete,
            Right::ChangeStatus => self.right_to_change_status,
        }
    }

    pub fn any(&self) -> bool {
        Right::ALL.iter().any(|r| self.has(*r))
    }
}

// ---------------------------------------------------------------------------
// Read policy
// ---------------------------------------------------------------------------

/// How read access (listing tasks and members) is granted to non-creators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadPolicy {
    /// Any rights row grants read access, even with every flag `false`.
    #[default]
    Membership,
    /// A rights row grants read access only if at least one flag is set.
    AnyRight,
}

impl FromStr for ReadPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "membership" => Ok(Self::Membership),
            "any_right" | "any-right" => Ok(Self::AnyRight),
            other => Err(format!(
                "unknown read policy '{other}', expected 'membership' or 'any_right'"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Decisions
// ---------------------------------------------------------------------------

/// The kind of access being requested inside a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write(Right),
}

/// Why an access request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The action is reserved to the collection creator.
    NotCreator,
    /// The caller has no (qualifying) rights row in the collection.
    NotMember,
    /// The caller is a member but lacks the specific right.
    MissingRight(Right),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }

    /// Convert a denial into [`CoreError::Forbidden`] carrying `message`.
    pub fn into_result(self, message: impl Into<String>) -> Result<(), CoreError> {
        match self {
            Decision::Allowed => Ok(()),
            Decision::Denied(_) => Err(CoreError::Forbidden(message.into())),
        }
    }
}

/// Decide whether `actor` may perform `access` in a collection created by
/// `creator_id`, given the actor's own rights row (if any).
///
/// The creator is always allowed, regardless of any rights row.
pub fn authorize(
    actor: UserId,
    creator_id: UserId,
    rights: Option<&RightFlags>,
    access: Access,
    policy: ReadPolicy,
) -> Decision {
    if actor == creator_id {
        return Decision::Allowed;
    }

    let Some(flags) = rights else {
        return Decision::Denied(DenyReason::NotMember);
    };

    match access {
        Access::Read => match policy {
            ReadPolicy::Membership => Decision::Allowed,
            ReadPolicy::AnyRight if flags.any() => Decision::Allowed,
            ReadPolicy::AnyRight => Decision::Denied(DenyReason::NotMember),
        },
        Access::Write(right) if flags.has(right) => Decision::Allowed,
        Access::Write(right) => Decision::Denied(DenyReason::MissingRight(right)),
    }
}

/// Decide an action reserved to the collection creator.
pub fn require_creator(actor: UserId, creator_id: UserId) -> Decision {
    if actor == creator_id {
        Decision::Allowed
    } else {
        Decision::Denied(DenyReason::NotCreator)
    }
}

/// Reject a rights change that targets the collection creator.
pub fn ensure_not_creator(
    target: UserId,
    creator_id: UserId,
    message: impl Into<String>,
) -> Result<(), CoreError> {
    if target == creator_id {
        return Err(CoreError::Validation(message.into()));
    }
    Ok(())
}

/// The standard denial message for a write action.
pub fn write_denied_message(right: Right) -> String {
    format!("You don't have rights to {}", right.action_phrase())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use uuid::Uuid;

    use super::*;

    fn only(right: Right) -> RightFlags {
        RightFlags {
            right_to_create: right == Right::Create,
            right_to_edit: right == Right::Edit,
            right_to_delete: right == Right::Delete,
            right_to_change_status: right == Right::ChangeStatus,
        }
    }

    #[test]
    fn creator_is_allowed_everything_without_a_rights_row() {
        let creator = Uuid::new_v4();
        for right in Right::ALL {
            let decision = authorize(
                creator,
                creator,
                None,
                Access::Write(right),
                ReadPolicy::Membership,
            );
            assert_eq!(decision, Decision::Allowed, "creator denied {right}");
        }
        assert!(authorize(creator, creator, None, Access::Read, ReadPolicy::AnyRight).is_allowed());
    }

    #[test]
    fn creator_override_ignores_false_flags() {
        let creator = Uuid::new_v4();
        let flags = RightFlags::none();
        for right in Right::ALL {
            assert!(authorize(
                creator,
                creator,
                Some(&flags),
                Access::Write(right),
                ReadPolicy::Membership
            )
            .is_allowed());
        }
    }

    #[test]
    fn stranger_without_rights_row_is_denied() {
        let creator = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        for right in Right::ALL {
            assert_matches!(
                authorize(stranger, creator, None, Access::Write(right), ReadPolicy::Membership),
                Decision::Denied(DenyReason::NotMember)
            );
        }
        assert_matches!(
            authorize(stranger, creator, None, Access::Read, ReadPolicy::Membership),
            Decision::Denied(DenyReason::NotMember)
        );
    }

    #[test]
    fn each_write_action_is_gated_by_its_own_flag() {
        let creator = Uuid::new_v4();
        let member = Uuid::new_v4();

        for granted in Right::ALL {
            let flags = only(granted);
            for requested in Right::ALL {
                let decision = authorize(
                    member,
                    creator,
                    Some(&flags),
                    Access::Write(requested),
                    ReadPolicy::Membership,
                );
                if granted == requested {
                    assert_eq!(decision, Decision::Allowed);
                } else {
                    assert_eq!(
                        decision,
                        Decision::Denied(DenyReason::MissingRight(requested))
                    );
                }
            }
        }
    }

    #[test]
    fn membership_policy_allows_read_with_all_flags_false() {
        let creator = Uuid::new_v4();
        let member = Uuid::new_v4();
        let flags = RightFlags::none();

        assert!(authorize(member, creator, Some(&flags), Access::Read, ReadPolicy::Membership)
            .is_allowed());
    }

    #[test]
    fn any_right_policy_requires_a_set_flag_for_read() {
        let creator = Uuid::new_v4();
        let member = Uuid::new_v4();

        assert_matches!(
            authorize(
                member,
                creator,
                Some(&RightFlags::none()),
                Access::Read,
                ReadPolicy::AnyRight
            ),
            Decision::Denied(DenyReason::NotMember)
        );
        assert!(authorize(
            member,
            creator,
            Some(&only(Right::Edit)),
            Access::Read,
            ReadPolicy::AnyRight
        )
        .is_allowed());
    }

    #[test]
    fn require_creator_rejects_members_with_full_rights() {
        let creator = Uuid::new_v4();
        let member = Uuid::new_v4();
        assert!(require_creator(creator, creator).is_allowed());
        assert_matches!(
            require_creator(member, creator),
            Decision::Denied(DenyReason::NotCreator)
        );
    }

    #[test]
    fn ensure_not_creator_is_a_validation_error() {
        let creator = Uuid::new_v4();
        let result = ensure_not_creator(creator, creator, "You cannot set rights for yourself");
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg == "You cannot set rights for yourself");
        assert!(ensure_not_creator(Uuid::new_v4(), creator, "unused").is_ok());
    }

    #[test]
    fn denial_converts_to_forbidden_with_message() {
        let denied = Decision::Denied(DenyReason::MissingRight(Right::Delete));
        let msg = write_denied_message(Right::Delete);
        assert_eq!(msg, "You don't have rights to delete tasks from this collection");
        assert_matches!(denied.into_result(msg), Err(CoreError::Forbidden(_)));
        assert!(Decision::Allowed.into_result("unused").is_ok());
    }

    #[test]
    fn read_policy_parses_from_config_strings() {
        assert_eq!("membership".parse::<ReadPolicy>(), Ok(ReadPolicy::Membership));
        assert_eq!("ANY_RIGHT".parse::<ReadPolicy>(), Ok(ReadPolicy::AnyRight));
        assert!("everyone".parse::<ReadPolicy>().is_err());
    }

    #[test]
    fn omitted_flags_deserialize_as_false() {
        let flags: RightFlags = serde_json::from_str(r#"{"rightToCreate": true}"#).unwrap();
        assert_eq!(flags, only(Right::Create));
    }
}

//! Membership service
//!
//! Every discussion operation runs on behalf of a group member. Memberships are managed
//! elsewhere; this service only checks them and resolves display names.

use std::collections::HashMap;

use readalong_core::entities::GroupMember;
use readalong_core::{DomainError, Snowflake};
use tracing::{debug, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Membership service
pub struct MembershipService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MembershipService<'a> {
    /// Create a new MembershipService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Require `user_id` to be a member of `group_id`
    ///
    /// # Errors
    /// `NotGroupMember` (403) otherwise
    #[instrument(skip(self))]
    pub async fn require_member(
        &self,
        group_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<GroupMember> {
        match self.ctx.membership_repo().find_member(group_id, user_id).await? {
            Some(member) => Ok(member),
            None => {
                debug!(group_id = %group_id, user_id = %user_id, "Rejected non-member");
                Err(DomainError::NotGroupMember(group_id).into())
            }
        }
    }

    /// Check membership without failing
    pub async fn is_member(&self, group_id: Snowflake, user_id: Snowflake) -> ServiceResult<bool> {
        Ok(self
            .ctx
            .membership_repo()
            .find_member(group_id, user_id)
            .await?
            .is_some())
    }

    /// All members of a group keyed by user ID
    pub async fn members_by_id(
        &self,
        group_id: Snowflake,
    ) -> ServiceResult<HashMap<Snowflake, GroupMember>> {
        let members = self.ctx.membership_repo().find_members(group_id).await?;
        Ok(members.into_iter().map(|m| (m.user_id, m)).collect())
    }
}

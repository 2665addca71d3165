//! PostgreSQL implementation of MembershipRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use readalong_core::entities::GroupMember;
use readalong_core::traits::{MembershipRepository, RepoResult};
use readalong_core::value_objects::Snowflake;

use crate::models::GroupMemberModel;

use super::error::map_db_error;

/// PostgreSQL implementation of MembershipRepository
#[derive(Clone)]
pub struct PgMembershipRepository {
    pool: PgPool,
}

impl PgMembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipRepository for PgMembershipRepository {
    #[instrument(skip(self))]
    async fn find_member(
        &self,
        group_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<GroupMember>> {
        let result = sqlx::query_as::<_, GroupMemberModel>(
            r#"
            SELECT group_id, user_id, display_name, avatar_url, joined_at
            FROM group_members
            WHERE group_id = $1 AND user_id = $2
            "#,
        )
        .bind(group_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(GroupMember::from))
    }

    #[instrument(skip(self))]
    async fn find_members(&self, group_id: Snowflake) -> RepoResult<Vec<GroupMember>> {
        let results = sqlx::query_as::<_, GroupMemberModel>(
            r#"
            SELECT group_id, user_id, display_name, avatar_url, joined_at
            FROM group_members
            WHERE group_id = $1
            ORDER BY joined_at, user_id
            "#,
        )
        .bind(group_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(GroupMember::from).collect())
    }
}

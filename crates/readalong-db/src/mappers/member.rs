//! Group member entity <-> model mapper

use readalong_core::entities::GroupMember;
use readalong_core::value_objects::Snowflake;

use crate::models::GroupMemberModel;

impl From<GroupMemberModel> for GroupMember {
    fn from(model: GroupMemberModel) -> Self {
        GroupMember {
            group_id: Snowflake::new(model.group_id),
            user_id: Snowflake::new(model.user_id),
            display_name: model.display_name,
            avatar_url: model.avatar_url,
            joined_at: model.joined_at,
        }
    }
}

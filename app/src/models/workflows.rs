pub use super::entities::workflows::*;

use kit::{FrameworkError, DB};
use sea_orm::entity::prelude::*;
use sea_orm::QueryOrder;

impl ActiveModelBehavior for ActiveModel {}

impl kit::database::Model for Entity {}
impl kit::database::ModelMut for Entity {}

impl Model {
    /// The user's workflows, newest first
    pub async fn for_user(user_id: Uuid) -> Result<Vec<Model>, FrameworkError> {
        let db = DB::connection()?;
        Ok(Entity::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::CreatedAt)
            .all(db.inner())
            .await?)
    }

    /// A workflow only if it belongs to `user_id`
    pub async fn find_owned(id: Uuid, user_id: Uuid) -> Result<Option<Model>, FrameworkError> {
        let db = DB::connection()?;
        Ok(Entity::find_by_id(id)
            .filter(Column::UserId.eq(user_id))
            .one(db.inner())
            .await?)
    }

    pub async fn count_for_user(user_id: Uuid) -> Result<u64, FrameworkError> {
        let db = DB::connection()?;
        Ok(Entity::find()
            .filter(Column::UserId.eq(user_id))
            .count(db.inner())
            .await?)
    }
}

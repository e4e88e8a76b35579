pub use super::entities::execution_logs::*;

use kit::{FrameworkError, DB};
use sea_orm::entity::prelude::*;

impl ActiveModelBehavior for ActiveModel {}

impl kit::database::Model for Entity {}
impl kit::database::ModelMut for Entity {}

impl Model {
    /// The user's executions at or after `cutoff`
    pub async fn for_user_since(user_id: Uuid, cutoff: DateTimeUtc) -> Result<Vec<Model>, FrameworkError> {
        let db = DB::connection()?;
        Ok(Entity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::ExecutedAt.gte(cutoff))
            .all(db.inner())
            .await?)
    }
}

pub use super::entities::metrics::*;

use kit::{FrameworkError, DB};
use sea_orm::entity::prelude::*;
use sea_orm::QueryOrder;

impl ActiveModelBehavior for ActiveModel {}

impl kit::database::Model for Entity {}
impl kit::database::ModelMut for Entity {}

impl Model {
    /// Metric rows of the given workflows, oldest first
    pub async fn for_workflows(ids: &[Uuid]) -> Result<Vec<Model>, FrameworkError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let db = DB::connection()?;
        Ok(Entity::find()
            .filter(Column::WorkflowId.is_in(ids.iter().copied()))
            .order_by_asc(Column::RecordedAt)
            .all(db.inner())
            .await?)
    }
}

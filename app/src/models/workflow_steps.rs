pub use super::entities::workflow_steps::*;

use kit::{FrameworkError, DB};
use sea_orm::entity::prelude::*;
use sea_orm::QueryOrder;

impl ActiveModelBehavior for ActiveModel {}

impl kit::database::Model for Entity {}
impl kit::database::ModelMut for Entity {}

impl Model {
    /// Steps of the given workflows in execution order
    pub async fn for_workflows(ids: &[Uuid]) -> Result<Vec<Model>, FrameworkError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let db = DB::connection()?;
        Ok(Entity::find()
            .filter(Column::WorkflowId.is_in(ids.iter().copied()))
            .order_by_asc(Column::StepOrder)
            .all(db.inner())
            .await?)
    }
}

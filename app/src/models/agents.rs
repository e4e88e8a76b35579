pub use super::entities::agents::*;

use kit::{FrameworkError, DB};
use sea_orm::entity::prelude::*;
use sea_orm::QueryOrder;

pub const STATUS_IDLE: &str = "Idle";
pub const STATUS_ACTIVE: &str = "Active";
pub const STATUS_DEPLOYING: &str = "Deploying";

impl ActiveModelBehavior for ActiveModel {}

impl kit::database::Model for Entity {}
impl kit::database::ModelMut for Entity {}

impl Model {
    pub async fn for_workflows(ids: &[Uuid]) -> Result<Vec<Model>, FrameworkError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let db = DB::connection()?;
        Ok(Entity::find()
            .filter(Column::WorkflowId.is_in(ids.iter().copied()))
            .order_by_asc(Column::CreatedAt)
            .all(db.inner())
            .await?)
    }

    /// Active or mid-deployment
    pub fn is_live(&self) -> bool {
        self.status == STATUS_ACTIVE || self.status == STATUS_DEPLOYING
    }
}

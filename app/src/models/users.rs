pub use super::entities::users::*;

use chrono::Utc;
use kit::{FrameworkError, DB};
use sea_orm::entity::prelude::*;
use sea_orm::Set;

impl ActiveModelBehavior for ActiveModel {}

impl kit::database::Model for Entity {}
impl kit::database::ModelMut for Entity {}

impl Model {
    pub async fn find_by_email(email: &str) -> Result<Option<Model>, FrameworkError> {
        let db = DB::connection()?;
        Ok(Entity::find()
            .filter(Column::Email.eq(email))
            .one(db.inner())
            .await?)
    }

    /// Whether the stored one-time code is still valid at `now`
    pub fn otp_is_live(&self, now: DateTimeUtc) -> bool {
        self.otp_expires_at.is_some_and(|expires| now <= expires)
    }
}

impl ActiveModel {
    /// A verified account; signup skips email confirmation
    pub fn signup(email: &str, password_hash: String, full_name: Option<String>) -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            email: Set(email.to_string()),
            full_name: Set(full_name),
            password_hash: Set(password_hash),
            email_verified: Set(true),
            otp_code: Set(None),
            otp_expires_at: Set(None),
            created_at: Set(Utc::now()),
        }
    }
}

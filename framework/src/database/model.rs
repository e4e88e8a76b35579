//! Query helpers on SeaORM entities
//!
//! ```rust,ignore
//! impl kit::database::Model for Entity {}
//! impl kit::database::ModelMut for Entity {}
//!
//! let workflow = workflows::Entity::find_by_pk(id).await?;
//! ```

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, EntityTrait, IntoActiveModel, PrimaryKeyTrait,
};

use crate::database::DB;
use crate::error::FrameworkError;

type PrimaryKeyValue<E> = <<E as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

/// Read operations against the default connection
#[async_trait]
pub trait Model: EntityTrait + Sized {
    async fn all() -> Result<Vec<<Self as EntityTrait>::Model>, FrameworkError> {
        let db = DB::connection()?;
        Ok(Self::find().all(db.inner()).await?)
    }

    async fn find_by_pk<K>(id: K) -> Result<Option<<Self as EntityTrait>::Model>, FrameworkError>
    where
        K: Into<PrimaryKeyValue<Self>> + Send,
    {
        let db = DB::connection()?;
        Ok(Self::find_by_id(id).one(db.inner()).await?)
    }
}

/// Write operations against the default connection
#[async_trait]
pub trait ModelMut: Model {
    async fn insert_one<A>(model: A) -> Result<<Self as EntityTrait>::Model, FrameworkError>
    where
        A: ActiveModelTrait<Entity = Self> + ActiveModelBehavior + Send,
        <Self as EntityTrait>::Model: IntoActiveModel<A>,
    {
        let db = DB::connection()?;
        Ok(model.insert(db.inner()).await?)
    }

    async fn update_one<A>(model: A) -> Result<<Self as EntityTrait>::Model, FrameworkError>
    where
        A: ActiveModelTrait<Entity = Self> + ActiveModelBehavior + Send,
        <Self as EntityTrait>::Model: IntoActiveModel<A>,
    {
        let db = DB::connection()?;
        Ok(model.update(db.inner()).await?)
    }

    /// Returns the number of rows removed
    async fn delete_by_pk<K>(id: K) -> Result<u64, FrameworkError>
    where
        K: Into<PrimaryKeyValue<Self>> + Send,
    {
        let db = DB::connection()?;
        let result = Self::delete_by_id(id).exec(db.inner()).await?;
        Ok(result.rows_affected)
    }
}

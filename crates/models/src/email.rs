use sea_orm::{entity::prelude::*, DatabaseConnection, PaginatorTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use common::EmailEntry;

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "emails")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub email: String,
    pub confirmed_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for EmailEntry {
    fn from(m: Model) -> Self {
        EmailEntry { email: m.email, confirmed_at: m.confirmed_at }
    }
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    if email.trim().is_empty() {
        return Err(ModelError::Validation("email required".into()));
    }
    if email.chars().count() > 255 {
        return Err(ModelError::Validation("email longer than 255 characters".into()));
    }
    Ok(())
}

/// Insert a new unconfirmed entry. Fails with `Conflict` when the key exists.
pub async fn create(db: &DatabaseConnection, email: &str) -> Result<Model, ModelError> {
    validate_email(email)?;
    if Entity::find_by_id(email.to_string()).one(db).await?.is_some() {
        return Err(ModelError::Conflict(format!("email {email} already exists")));
    }
    let am = ActiveModel {
        email: Set(email.to_string()),
        confirmed_at: Set(0),
    };
    Ok(am.insert(db).await?)
}

pub async fn get(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(email.to_string()).one(db).await?)
}

/// One page ordered by address; `page_index` is 0-based, `per_page` must be > 0.
pub async fn get_batch(db: &DatabaseConnection, per_page: u64, page_index: u64) -> Result<Vec<Model>, ModelError> {
    if per_page == 0 {
        return Err(ModelError::Validation("per_page must be greater than 0".into()));
    }
    let page = Entity::find()
        .order_by_asc(Column::Email)
        .paginate(db, per_page)
        .fetch_page(page_index)
        .await?;
    Ok(page)
}

/// Overwrite `confirmed_at` of an existing entry; the key itself never changes.
pub async fn update(db: &DatabaseConnection, email: &str, confirmed_at: i64) -> Result<Model, ModelError> {
    let mut am: ActiveModel = Entity::find_by_id(email.to_string())
        .one(db)
        .await?
        .ok_or_else(|| ModelError::NotFound(format!("email {email} not found")))?
        .into();
    am.confirmed_at = Set(confirmed_at);
    Ok(am.update(db).await?)
}

/// Remove an entry; returns whether it existed.
pub async fn delete(db: &DatabaseConnection, email: &str) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(email.to_string()).exec(db).await?;
    Ok(res.rows_affected > 0)
}

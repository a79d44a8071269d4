use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub service_name: String,
    /// Smallest currency unit charged per active month.
    pub price: i64,
    pub user_id: Uuid,
    pub start_month: i32,
    pub start_year: i32,
    pub end_month: Option<i32>,
    pub end_year: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// `(end_month, end_year)` when both halves are stored; `None` means open-ended.
    pub fn end(&self) -> Option<(i32, i32)> {
        self.end_month.zip(self.end_year)
    }
}

use crate::entities::subscription_entity as subscriptions;
use crate::error::{AppError, AppResult};
use crate::models::{SubscriptionFilter, SubscriptionRequest};
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

/// Durable CRUD over subscription records.
///
/// Holds a clone of the process-wide pool; every call is a single-record statement
/// or a read, so the service can be shared freely across workers.
#[derive(Clone)]
pub struct SubscriptionService {
    pool: DatabaseConnection,
}

impl SubscriptionService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Inserts a new record. A fresh id is generated unless the caller supplied one.
    pub async fn create(&self, request: SubscriptionRequest) -> AppResult<subscriptions::Model> {
        let now = Utc::now();
        let id = request.id.filter(|id| !id.is_nil()).unwrap_or_else(Uuid::new_v4);

        let model = subscriptions::ActiveModel {
            id: Set(id),
            service_name: Set(request.service_name),
            price: Set(request.price),
            user_id: Set(request.user_id),
            start_month: Set(request.start_month),
            start_year: Set(request.start_year),
            end_month: Set(request.end_month),
            end_year: Set(request.end_year),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.pool)
        .await?;

        log::info!("Created subscription {} for user {}", model.id, model.user_id);
        Ok(model)
    }

    /// All records, newest first; ties on `created_at` fall back to id order.
    pub async fn list(&self) -> AppResult<Vec<subscriptions::Model>> {
        self.filtered_list(&SubscriptionFilter::default()).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<subscriptions::Model> {
        subscriptions::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Subscription {id} not found")))
    }

    /// Replaces every caller-owned field of `id` and refreshes `updated_at`.
    pub async fn update(
        &self,
        id: Uuid,
        request: SubscriptionRequest,
    ) -> AppResult<subscriptions::Model> {
        let model = subscriptions::ActiveModel {
            id: ActiveValue::Unchanged(id),
            service_name: Set(request.service_name),
            price: Set(request.price),
            user_id: Set(request.user_id),
            start_month: Set(request.start_month),
            start_year: Set(request.start_year),
            end_month: Set(request.end_month),
            end_year: Set(request.end_year),
            created_at: ActiveValue::NotSet,
            updated_at: Set(Utc::now()),
        };

        match model.update(&self.pool).await {
            Ok(updated) => {
                log::info!("Updated subscription {id}");
                Ok(updated)
            }
            // zero rows touched
            Err(DbErr::RecordNotUpdated) | Err(DbErr::RecordNotFound(_)) => {
                Err(AppError::NotFound(format!("Subscription {id} not found")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Hard delete. Deleting an unknown id is not an error.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = subscriptions::Entity::delete_by_id(id)
            .exec(&self.pool)
            .await?;
        if result.rows_affected > 0 {
            log::info!("Deleted subscription {id}");
        } else {
            log::debug!("Delete of unknown subscription {id} ignored");
        }
        Ok(())
    }

    /// Records matching every filter that is present: exact `user_id`, and a
    /// case-insensitive substring of `service_name`.
    ///
    /// Case folding of the stored name is done by the backend's `lower()`:
    /// Postgres folds Unicode, SQLite folds ASCII only, so a non-ASCII
    /// uppercase letter only matches case-insensitively on Postgres.
    pub async fn filtered_list(
        &self,
        filter: &SubscriptionFilter,
    ) -> AppResult<Vec<subscriptions::Model>> {
        let mut query = subscriptions::Entity::find();

        if let Some(user_id) = filter.user_id {
            query = query.filter(subscriptions::Column::UserId.eq(user_id));
        }
        if let Some(needle) = &filter.service_name {
            let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(subscriptions::Column::ServiceName)))
                    .like(LikeExpr::new(pattern).escape(LIKE_ESCAPE)),
            );
        }

        let records = query
            .order_by_desc(subscriptions::Column::CreatedAt)
            .order_by_asc(subscriptions::Column::Id)
            .all(&self.pool)
            .await?;

        log::debug!("Loaded {} subscriptions for {filter:?}", records.len());
        Ok(records)
    }
}

/// Must be written inline without quoting in every supported dialect.
const LIKE_ESCAPE: char = '!';

/// Escapes LIKE wildcards so the needle is matched literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

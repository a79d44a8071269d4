use crate::entities::subscription_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Body of `POST /subscriptions` and `PUT /subscriptions/{id}`.
///
/// Updates replace every field; `id` is only honoured on create.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub service_name: String,
    pub price: i64,
    pub user_id: Uuid,
    pub start_month: i32,
    pub start_year: i32,
    #[serde(default)]
    pub end_month: Option<i32>,
    #[serde(default)]
    pub end_year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: Uuid,
    pub service_name: String,
    pub price: i64,
    pub user_id: Uuid,
    pub start_month: i32,
    pub start_year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_month: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_year: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<subscription_entity::Model> for SubscriptionResponse {
    fn from(m: subscription_entity::Model) -> Self {
        Self {
            id: m.id,
            service_name: m.service_name,
            price: m.price,
            user_id: m.user_id,
            start_month: m.start_month,
            start_year: m.start_year,
            end_month: m.end_month,
            end_year: m.end_year,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Optional narrowing of the candidate set read by the summary.
///
/// `None` means "not requested", which is different from `Some("")`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionFilter {
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
}

/// Raw query string of `GET /subscriptions/summary`.
#[derive(Debug, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryQuery {
    /// First month of the window, `MM-YYYY`
    pub from: Option<String>,
    /// Last month of the window (inclusive), `MM-YYYY`
    pub to: Option<String>,
    pub user_id: Option<String>,
    /// Case-insensitive substring of the service name
    pub service_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SummaryResponse {
    pub total: i64,
}

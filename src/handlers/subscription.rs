use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::{SubscriptionService, SummaryService};
use crate::utils::{OperationTimeout, validate_subscription, within};
use actix_web::{HttpResponse, ResponseError, Result, web};
use uuid::Uuid;

fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::ValidationError("invalid id".to_string()))
}

/// Blank query values count as "not provided".
fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn summary_args(query: &SummaryQuery) -> AppResult<(Period, Period, SubscriptionFilter)> {
    let (Some(from), Some(to)) = (non_empty(query.from.as_ref()), non_empty(query.to.as_ref()))
    else {
        return Err(AppError::ValidationError(
            "from and to are required in MM-YYYY".to_string(),
        ));
    };
    let from = Period::parse(from)?;
    let to = Period::parse(to)?;

    let user_id = non_empty(query.user_id.as_ref())
        .map(|raw| {
            Uuid::parse_str(raw)
                .map_err(|_| AppError::ValidationError("invalid user_id".to_string()))
        })
        .transpose()?;
    let service_name = non_empty(query.service_name.as_ref()).map(str::to_string);

    Ok((
        from,
        to,
        SubscriptionFilter {
            user_id,
            service_name,
        },
    ))
}

#[utoipa::path(
    post,
    path = "/subscriptions",
    tag = "subscription",
    request_body = SubscriptionRequest,
    responses(
        (status = 201, description = "Subscription created", body = SubscriptionResponse),
        (status = 400, description = "Invalid request body"),
        (status = 500, description = "Database error")
    )
)]
pub async fn create_subscription(
    subscription_service: web::Data<SubscriptionService>,
    timeout: web::Data<OperationTimeout>,
    request: web::Json<SubscriptionRequest>,
) -> Result<HttpResponse> {
    let request = request.into_inner();
    if let Err(e) = validate_subscription(&request) {
        return Ok(e.error_response());
    }

    match within(timeout.0, subscription_service.create(request)).await {
        Ok(model) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(SubscriptionResponse::from(model)))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/subscriptions",
    tag = "subscription",
    responses(
        (status = 200, description = "All subscriptions, newest first", body = [SubscriptionResponse]),
        (status = 500, description = "Database error")
    )
)]
pub async fn list_subscriptions(
    subscription_service: web::Data<SubscriptionService>,
    timeout: web::Data<OperationTimeout>,
) -> Result<HttpResponse> {
    match within(timeout.0, subscription_service.list()).await {
        Ok(models) => {
            let items: Vec<SubscriptionResponse> =
                models.into_iter().map(SubscriptionResponse::from).collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(items)))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/subscriptions/{id}",
    tag = "subscription",
    params(("id" = Uuid, Path, description = "Subscription id")),
    responses(
        (status = 200, description = "Subscription found", body = SubscriptionResponse),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Subscription not found")
    )
)]
pub async fn get_subscription(
    subscription_service: web::Data<SubscriptionService>,
    timeout: web::Data<OperationTimeout>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match within(timeout.0, subscription_service.get_by_id(id)).await {
        Ok(model) => Ok(HttpResponse::Ok().json(ApiResponse::success(SubscriptionResponse::from(model)))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/subscriptions/{id}",
    tag = "subscription",
    params(("id" = Uuid, Path, description = "Subscription id")),
    request_body = SubscriptionRequest,
    responses(
        (status = 200, description = "Subscription replaced", body = SubscriptionResponse),
        (status = 400, description = "Invalid request body"),
        (status = 404, description = "Subscription not found")
    )
)]
pub async fn update_subscription(
    subscription_service: web::Data<SubscriptionService>,
    timeout: web::Data<OperationTimeout>,
    path: web::Path<String>,
    request: web::Json<SubscriptionRequest>,
) -> Result<HttpResponse> {
    let request = request.into_inner();
    let id = match parse_id(&path).and_then(|id| validate_subscription(&request).map(|_| id)) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match within(timeout.0, subscription_service.update(id, request)).await {
        Ok(model) => Ok(HttpResponse::Ok().json(ApiResponse::success(SubscriptionResponse::from(model)))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/subscriptions/{id}",
    tag = "subscription",
    params(("id" = Uuid, Path, description = "Subscription id")),
    responses(
        (status = 204, description = "Subscription deleted (or never existed)"),
        (status = 400, description = "Malformed id")
    )
)]
pub async fn delete_subscription(
    subscription_service: web::Data<SubscriptionService>,
    timeout: web::Data<OperationTimeout>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match within(timeout.0, subscription_service.delete(id)).await {
        Ok(()) => Ok(HttpResponse::NoContent().finish()),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/subscriptions/summary",
    tag = "subscription",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Total cost in the window", body = SummaryResponse),
        (status = 400, description = "Malformed or inverted period")
    )
)]
pub async fn summarize_subscriptions(
    summary_service: web::Data<SummaryService>,
    timeout: web::Data<OperationTimeout>,
    query: web::Query<SummaryQuery>,
) -> Result<HttpResponse> {
    let (from, to, filter) = match summary_args(&query) {
        Ok(args) => args,
        Err(e) => return Ok(e.error_response()),
    };

    match within(timeout.0, summary_service.summarize(from, to, &filter)).await {
        Ok(total) => Ok(HttpResponse::Ok().json(ApiResponse::success(SummaryResponse { total }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn subscription_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/subscriptions")
            .route("", web::post().to(create_subscription))
            .route("", web::get().to(list_subscriptions))
            // before /{id} so "summary" is not taken for an id
            .route("/summary", web::get().to(summarize_subscriptions))
            .route("/{id}", web::get().to(get_subscription))
            .route("/{id}", web::put().to(update_subscription))
            .route("/{id}", web::delete().to(delete_subscription)),
    );
}

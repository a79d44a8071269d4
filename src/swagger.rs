use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::subscription::create_subscription,
        handlers::subscription::list_subscriptions,
        handlers::subscription::get_subscription,
        handlers::subscription::update_subscription,
        handlers::subscription::delete_subscription,
        handlers::subscription::summarize_subscriptions,
    ),
    components(
        schemas(
            SubscriptionRequest,
            SubscriptionResponse,
            SummaryResponse,
            ApiError,
        )
    ),
    tags(
        (name = "health", description = "Liveness probe"),
        (name = "subscription", description = "Subscription management and cost summary API"),
    ),
    info(
        title = "Subscriptions API",
        version = "1.0.0",
        description = "API for managing user subscriptions"
    ),
    servers(
        (url = "/", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

pub mod config;
pub mod database;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod swagger;
pub mod utils;

pub use config::Config;
pub use error::{AppError, AppResult};

use actix_web::web;
use services::{SubscriptionService, SummaryService};
use utils::OperationTimeout;

/// Registers services and every route on an actix `App`.
///
/// Both services share the same pool handle; the caller owns it.
pub fn configure_app(
    subscription_service: SubscriptionService,
    timeout: OperationTimeout,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let summary_service = SummaryService::new(subscription_service.clone());
        cfg.app_data(web::JsonConfig::default().error_handler(|err, _| {
            AppError::ValidationError(format!("invalid json body: {err}")).into()
        }))
        .app_data(web::QueryConfig::default().error_handler(|err, _| {
            AppError::ValidationError(format!("invalid query: {err}")).into()
        }))
        .app_data(web::Data::new(subscription_service))
        .app_data(web::Data::new(summary_service))
        .app_data(web::Data::new(timeout))
        .configure(handlers::health_config)
        .configure(swagger::swagger_config)
        .configure(handlers::subscription_config);
    }
}

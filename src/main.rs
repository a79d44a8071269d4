use actix_web::{App, HttpServer, middleware::Logger};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use subscriptions_backend::{
    config::Config,
    configure_app,
    database::{create_pool, run_migrations},
    middlewares::create_cors,
    services::SubscriptionService,
    utils::OperationTimeout,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().map_err(std::io::Error::other)?;
    log::info!("Configuration loaded");

    let pool = create_pool(&config.database)
        .await
        .map_err(std::io::Error::other)?;
    log::info!("Database connection pool established");

    run_migrations(&pool).await.map_err(std::io::Error::other)?;
    log::info!("Database migrations applied");

    let subscription_service = SubscriptionService::new(pool);
    let timeout = OperationTimeout(config.server.request_timeout());

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .configure(configure_app(subscription_service.clone(), timeout))
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}

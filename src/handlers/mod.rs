pub mod health;
pub mod subscription;

pub use health::health_config;
pub use subscription::subscription_config;

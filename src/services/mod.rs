pub mod subscription_service;
pub mod summary_service;

pub use subscription_service::SubscriptionService;
pub use summary_service::{BillingWindow, OPEN_ENDED_INDEX, SummaryService};

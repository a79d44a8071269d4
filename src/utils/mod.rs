pub mod deadline;
pub mod validation;

pub use deadline::{OperationTimeout, within};
pub use validation::validate_subscription;

pub mod common;
pub mod period;
pub mod subscription;

pub use common::*;
pub use period::*;
pub use subscription::*;

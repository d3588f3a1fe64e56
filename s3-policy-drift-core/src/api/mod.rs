//! Policy Drift Checker Core API Interface

mod check_all;
mod check_bucket;
mod verify_access;
mod verify_baselines;

pub use check_all::check_all;
pub use check_bucket::check_bucket;
pub use verify_access::verify_access;
pub use verify_baselines::verify_baselines;

pub mod extract;
pub mod health;

pub use extract::extract;
pub use health::health_check;

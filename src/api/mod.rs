pub mod auth;
pub mod health;
pub mod profile;

pub use auth::AuthApi;
pub use health::HealthApi;
pub use profile::ProfileApi;

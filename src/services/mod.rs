pub mod auth_state;
pub mod login_flow_service;
pub mod registration_service;

pub use auth_state::{AuthStateTracker, InMemoryStateStore, StateStore};
pub use login_flow_service::{CallbackOutcome, LoginFlowService};
pub use registration_service::RegistrationService;

pub mod identity_provider;
pub mod invite;
pub mod login_flow;
pub mod registration;
pub mod storage;

pub use identity_provider::IdentityProviderError;
pub use invite::InviteError;
pub use login_flow::LoginFlowError;
pub use registration::RegistrationError;
pub use storage::StorageError;

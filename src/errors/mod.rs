pub mod api;
pub mod internal;

pub use internal::{
    IdentityProviderError, InviteError, LoginFlowError, RegistrationError, StorageError,
};

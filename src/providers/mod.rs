pub mod identity_provider;
pub mod keycloak;

pub use identity_provider::IdentityProvider;
pub use keycloak::KeycloakProvider;

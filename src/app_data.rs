use std::sync::Arc;

use sea_orm::DatabaseConnection;
use thiserror::Error;
use url::Url;

use crate::config::Settings;
use crate::errors::internal::IdentityProviderError;
use crate::providers::{IdentityProvider, KeycloakProvider};
use crate::services::auth_state::{AuthStateTracker, InMemoryStateStore, STATE_TTL};
use crate::services::{LoginFlowService, RegistrationService};
use crate::stores::{InviteLedger, InviteStore, ProfileRepository, ProfileStore};

#[derive(Error, Debug)]
pub enum InitError {
    #[error("identity provider client could not be constructed")]
    IdentityProvider(#[from] IdentityProviderError),

    #[error("authorize URL is not a valid URL: {0}")]
    BadAuthorizeUrl(#[from] url::ParseError),
}

/// Centralized application data, created once in main and shared across
/// the API structs via Arc.
pub struct AppData {
    pub db: DatabaseConnection,
    pub settings: Settings,
    pub invites: Arc<dyn InviteLedger>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub identity: Arc<dyn IdentityProvider>,
    pub registration: Arc<RegistrationService>,
    pub login_flow: Arc<LoginFlowService>,
}

impl AppData {
    /// Wire stores, providers and services together.
    ///
    /// The database must already be connected and migrated.
    pub fn init(db: DatabaseConnection, settings: Settings) -> Result<Self, InitError> {
        tracing::info!("initializing application data");

        let invites: Arc<dyn InviteLedger> = Arc::new(InviteStore::new(db.clone()));
        let profiles: Arc<dyn ProfileRepository> = Arc::new(ProfileStore::new(db.clone()));

        let keycloak = KeycloakProvider::new(settings.idp.clone())?;
        let authorize_url = Url::parse(&format!(
            "{}/protocol/openid-connect/auth",
            keycloak.issuer()
        ))?;
        let identity: Arc<dyn IdentityProvider> = Arc::new(keycloak);

        let registration = Arc::new(RegistrationService::new(
            Arc::clone(&invites),
            Arc::clone(&identity),
            Arc::clone(&profiles),
        ));

        let tracker = AuthStateTracker::new(Arc::new(InMemoryStateStore::new()), STATE_TTL);
        let login_flow = Arc::new(LoginFlowService::new(
            tracker,
            Arc::clone(&identity),
            authorize_url,
            settings.idp.client_id.clone(),
            settings.idp.redirect_url.clone(),
        ));

        tracing::info!("application data initialization complete");

        Ok(Self {
            db,
            settings,
            invites,
            profiles,
            identity,
            registration,
            login_flow,
        })
    }
}

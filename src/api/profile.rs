use std::sync::Arc;

use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};

use crate::errors::api::ProfileApiError;
use crate::providers::IdentityProvider;
use crate::services::RegistrationService;
use crate::stores::ProfileRepository;
use crate::types::dto::profile::{ProfileResponse, RegistrationRequest};

/// Profile API endpoints
pub struct ProfileApi {
    registration: Arc<RegistrationService>,
    profiles: Arc<dyn ProfileRepository>,
    identity: Arc<dyn IdentityProvider>,
}

/// API tags for profile endpoints
#[derive(Tags)]
enum ProfileTags {
    /// Profile management endpoints
    Profiles,
}

impl ProfileApi {
    pub fn new(
        registration: Arc<RegistrationService>,
        profiles: Arc<dyn ProfileRepository>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            registration,
            profiles,
            identity,
        }
    }
}

#[OpenApi(prefix_path = "/profile")]
impl ProfileApi {
    /// Register a new account using a single-use invite code
    #[oai(path = "/", method = "post", tag = "ProfileTags::Profiles")]
    async fn register(
        &self,
        body: Json<RegistrationRequest>,
    ) -> Result<Json<ProfileResponse>, ProfileApiError> {
        let created = self
            .registration
            .register(&body.username, &body.email, &body.password, &body.invite_code)
            .await?;

        tracing::info!(profile_id = created.id, "registration completed");
        Ok(Json(ProfileResponse::from_model(
            created,
            Some(body.username.clone()),
        )))
    }

    /// Fetch a profile by its numeric id
    #[oai(path = "/:id", method = "get", tag = "ProfileTags::Profiles")]
    async fn get_by_id(&self, id: Path<i64>) -> Result<Json<ProfileResponse>, ProfileApiError> {
        let found = self.profiles.find_by_id(id.0).await?;

        // Username lives with the identity provider; the profile row only
        // holds the subject id, which is never echoed to callers
        let username = match self.identity.get_account(&found.uuid).await {
            Ok(account) => Some(account.username),
            Err(err) => {
                tracing::warn!(error = %err, profile_id = found.id, "could not resolve username from identity provider");
                None
            }
        };

        Ok(Json(ProfileResponse::from_model(found, username)))
    }
}

use poem_openapi::Object;

use crate::types::db::profile;

/// Registration form submitted by a new player
#[derive(Object, Debug, Clone)]
pub struct RegistrationRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub invite_code: String,
}

/// Public view of a profile
///
/// The identity-provider subject id is deliberately absent; the username is
/// joined in from the identity provider at read time.
#[derive(Object, Debug, Clone)]
pub struct ProfileResponse {
    pub id: i64,
    pub username: Option<String>,
    pub experience: i64,
    pub level: i64,
    pub total_score: i64,
    pub play_count: i64,
    pub mastery: i16,
    pub performance_rating: i64,
}

impl ProfileResponse {
    pub fn from_model(model: profile::Model, username: Option<String>) -> Self {
        Self {
            id: model.id,
            username,
            experience: model.experience,
            level: model.level,
            total_score: model.total_score,
            play_count: model.play_count,
            mastery: model.mastery,
            performance_rating: model.performance_rating,
        }
    }
}

use poem_openapi::Object;

/// Health check response
#[derive(Object, Debug, Clone)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

//! Contractor profile handlers.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use bidcraft::{ContractorProfile, Specialty};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Request body for saving a profile.
#[derive(Deserialize)]
pub struct ProfileRequest {
    pub name: String,
    #[serde(default)]
    pub specialty: Specialty,
    #[serde(default)]
    pub license: String,
    #[serde(default)]
    pub region: String,
}

#[derive(Serialize)]
pub struct ProfileInfo {
    pub name: String,
    #[serde(flatten)]
    pub profile: ContractorProfile,
}

/// GET /api/profiles
pub async fn list_profiles(State(state): State<AppState>) -> Json<Vec<ProfileInfo>> {
    let registry = state.profiles.read().await;
    Json(
        registry
            .iter()
            .map(|(name, profile)| ProfileInfo {
                name: name.clone(),
                profile: profile.clone(),
            })
            .collect(),
    )
}

/// POST /api/profiles
pub async fn save_profile(
    State(state): State<AppState>,
    Json(req): Json<ProfileRequest>,
) -> Result<Json<ProfileInfo>, ApiError> {
    let profile = ContractorProfile::new(req.specialty)
        .with_license(req.license)
        .with_region(req.region);

    let mut registry = state.profiles.write().await;
    registry.save_profile(&req.name, profile.clone())?;

    Ok(Json(ProfileInfo {
        name: req.name,
        profile,
    }))
}

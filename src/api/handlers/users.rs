use actix_web::{
    web::{self, Data, Json, Path},
    HttpResponse, Scope,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    core::alert::types::{GeoPoint, UserId, UserRecord},
    storage::CommunityStore,
    utils::error::NodeError,
};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct UpsertUserRequest {
    pub display_name: String,
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub is_responder: bool,
    #[serde(default)]
    pub verified: bool,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub display_name: String,
    pub is_responder: bool,
    pub verified: bool,
    pub has_location: bool,
}

impl From<&UserRecord> for UserResponse {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id.0,
            display_name: user.display_name.clone(),
            is_responder: user.is_responder,
            verified: user.verified,
            has_location: user.location.is_some(),
        }
    }
}

pub fn scope() -> Scope {
    web::scope("/users").service(
        web::resource("/{id}")
            .route(web::put().to(upsert_user))
            .route(web::get().to(get_user)),
    )
}

async fn upsert_user(
    store: Data<Arc<CommunityStore>>,
    id: Path<Uuid>,
    request: Json<UpsertUserRequest>,
) -> Result<HttpResponse, actix_web::Error> {
    let user = UserRecord {
        id: UserId(*id),
        display_name: request.display_name.clone(),
        location: request.location,
        is_responder: request.is_responder,
        verified: request.verified,
        updated_at: Utc::now(),
    };

    store.upsert_user(&user).await.map_err(|e| {
        error!("Failed to store user {}: {}", id, e);
        actix_web::error::ErrorInternalServerError(e)
    })?;

    info!(user = %id, is_responder = user.is_responder, "User profile stored");
    Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
}

async fn get_user(
    store: Data<Arc<CommunityStore>>,
    id: Path<Uuid>,
) -> Result<HttpResponse, actix_web::Error> {
    let user = store
        .get_user(UserId(*id))
        .await
        .map_err(|e| {
            error!("Failed to retrieve user {}: {}", id, e);
            actix_web::error::ErrorInternalServerError(e)
        })?
        .ok_or_else(|| {
            warn!("User {} not found", id);
            actix_web::error::ErrorNotFound(NodeError::Storage("User not found".into()))
        })?;

    Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
}

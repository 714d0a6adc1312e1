use actix_web::{
    web::{Data, Json, Path},
    HttpResponse,
};
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use crate::{
    api::types::ChatMessageResponse,
    core::{
        alert::types::{AlertId, UserId},
        services::chat::ChatService,
    },
    utils::error::NodeError,
};

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub user_id: Uuid,
    pub sender_name: String,
    pub body: String,
}

pub async fn chat_history(
    service: Data<ChatService>,
    id: Path<Uuid>,
) -> Result<HttpResponse, actix_web::Error> {
    let history = service.history(AlertId(*id)).await.map_err(|e| {
        error!("Failed to load chat for alert {}: {}", id, e);
        actix_web::error::ErrorInternalServerError(e)
    })?;

    let messages: Vec<ChatMessageResponse> =
        history.iter().map(ChatMessageResponse::from).collect();
    Ok(HttpResponse::Ok().json(messages))
}

pub async fn send_message(
    service: Data<ChatService>,
    id: Path<Uuid>,
    request: Json<SendMessageRequest>,
) -> Result<HttpResponse, actix_web::Error> {
    let message = service
        .send(
            AlertId(*id),
            UserId(request.user_id),
            &request.sender_name,
            &request.body,
        )
        .await
        .map_err(|e| match e {
            NodeError::Chat(_) => actix_web::error::ErrorBadRequest(e),
            other => {
                error!("Failed to store chat message for alert {}: {}", id, other);
                actix_web::error::ErrorInternalServerError(other)
            }
        })?;

    Ok(HttpResponse::Created().json(ChatMessageResponse::from(&message)))
}

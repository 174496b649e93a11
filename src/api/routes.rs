use actix_web::{delete, get, post, web, HttpResponse, Result as WebResult};
use serde_json::json;
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

use crate::ai::ExplanationGenerator;
use crate::api::models::{validate_question, CreateConversationRequest};
use crate::store::{ConversationWithExplanation, NewConversation, NewExplanation, Storage};

#[get("")]
pub async fn list_conversations(store: web::Data<Arc<dyn Storage>>) -> WebResult<HttpResponse> {
    match store.list_conversations().await {
        Ok(conversations) => Ok(HttpResponse::Ok().json(conversations)),
        Err(e) => {
            error!("Error fetching conversations: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(json!({"error": "Failed to fetch conversations"})))
        }
    }
}

#[get("/{id}")]
pub async fn get_conversation(
    store: web::Data<Arc<dyn Storage>>,
    id: web::Path<String>,
) -> WebResult<HttpResponse> {
    let id: Uuid = match id.parse() {
        Ok(id) => id,
        Err(_) => {
            return Ok(
                HttpResponse::BadRequest().json(json!({"error": "Invalid conversation ID"}))
            )
        }
    };

    match store.get_conversation(id).await {
        Ok(Some(conversation)) => Ok(HttpResponse::Ok().json(conversation)),
        Ok(None) => Ok(HttpResponse::NotFound().json(json!({"error": "Conversation not found"}))),
        Err(e) => {
            error!("Error fetching conversation: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(json!({"error": "Failed to fetch conversation"})))
        }
    }
}

#[post("")]
pub async fn create_conversation(
    store: web::Data<Arc<dyn Storage>>,
    generator: web::Data<Arc<dyn ExplanationGenerator>>,
    req: web::Json<CreateConversationRequest>,
) -> WebResult<HttpResponse> {
    let question = match validate_question(&req.question) {
        Ok(q) => q,
        Err(details) => {
            return Ok(HttpResponse::BadRequest()
                .json(json!({"error": "Invalid request", "details": details})))
        }
    };

    // The slow upstream call happens before any write, so a generation
    // failure leaves the store untouched.
    let generated = match generator.generate(&question).await {
        Ok(g) => g,
        Err(e) => {
            error!("AI Service Error: {}", e);
            return Ok(HttpResponse::InternalServerError()
                .json(json!({"error": format!("Failed to generate explanation: {}", e)})));
        }
    };

    let conversation = match store
        .create_conversation(NewConversation {
            question,
            topic: Some(generated.topic),
        })
        .await
    {
        Ok(c) => c,
        Err(e) => {
            error!("Error creating conversation: {}", e);
            return Ok(HttpResponse::InternalServerError()
                .json(json!({"error": "Failed to create conversation"})));
        }
    };

    let explanation = match store
        .create_explanation(NewExplanation {
            conversation_id: conversation.id,
            definition: generated.definition,
            explanation: generated.explanation,
            code_example: generated.code_example,
            summary: generated.summary,
        })
        .await
    {
        Ok(explanation) => explanation,
        Err(e) => {
            error!("Error creating explanation: {}", e);
            // Compensate so the conversation does not linger without its
            // answer.
            if let Err(cleanup) = store.delete_conversation(conversation.id).await {
                error!(
                    "Failed to clean up conversation {} after explanation failure: {}",
                    conversation.id, cleanup
                );
            }
            return Ok(HttpResponse::InternalServerError()
                .json(json!({"error": "Failed to create conversation"})));
        }
    };

    Ok(HttpResponse::Ok().json(ConversationWithExplanation {
        conversation,
        explanation: Some(explanation),
    }))
}

#[delete("/{id}")]
pub async fn delete_conversation(
    store: web::Data<Arc<dyn Storage>>,
    id: web::Path<String>,
) -> WebResult<HttpResponse> {
    let id: Uuid = match id.parse() {
        Ok(id) => id,
        Err(_) => {
            return Ok(
                HttpResponse::BadRequest().json(json!({"error": "Invalid conversation ID"}))
            )
        }
    };

    // Deleting an id that was never created is a no-op, not an error.
    match store.delete_conversation(id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({"success": true}))),
        Err(e) => {
            error!("Error deleting conversation: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(json!({"error": "Failed to delete conversation"})))
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/conversations")
            .service(list_conversations)
            .service(create_conversation)
            .service(get_conversation)
            .service(delete_conversation),
    );
}

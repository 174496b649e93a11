#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::{Method, StatusCode};
    use actix_web::{test, web, App};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use uuid::Uuid;

    use explaind::ai::{self, ExplanationGenerator, GenerationError, StructuredExplanation};
    use explaind::api;
    use explaind::store::{memory::MemoryStore, Storage};

    /// Stands in for the AI service: replays a canned raw payload through
    /// the real response parser, so coercion behaves as in production.
    struct CannedGenerator {
        raw: String,
    }

    #[async_trait]
    impl ExplanationGenerator for CannedGenerator {
        fn name(&self) -> &str {
            "canned"
        }

        async fn generate(&self, _question: &str) -> Result<StructuredExplanation, GenerationError> {
            ai::parse_structured(&self.raw)
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl ExplanationGenerator for FailingGenerator {
        fn name(&self) -> &str {
            "failing"
        }

        async fn generate(&self, _question: &str) -> Result<StructuredExplanation, GenerationError> {
            Err(GenerationError::Empty)
        }
    }

    fn canned(raw: Value) -> Arc<dyn ExplanationGenerator> {
        Arc::new(CannedGenerator {
            raw: raw.to_string(),
        })
    }

    fn memory() -> Arc<dyn Storage> {
        Arc::new(MemoryStore::new())
    }

    macro_rules! spawn_app {
        ($store:expr, $generator:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($store.clone()))
                    .app_data(web::Data::new($generator.clone()))
                    .configure(api::routes::configure),
            )
            .await
        };
    }

    fn post_question(question: &str) -> actix_web::test::TestRequest {
        test::TestRequest::post()
            .uri("/api/conversations")
            .set_json(json!({ "question": question }))
    }

    #[actix_web::test]
    async fn create_returns_the_merged_conversation() {
        let store = memory();
        let generator = canned(json!({
            "explanation": "Recursion is when a function calls itself...",
            "topic": "Algorithms"
        }));
        let app = spawn_app!(store, generator);

        let resp = test::call_service(&app, post_question("What is recursion?").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["question"], "What is recursion?");
        assert_eq!(body["topic"], "Algorithms");
        assert!(body["id"].as_str().unwrap().parse::<Uuid>().is_ok());
        assert!(body["createdAt"].as_str().is_some());
        assert_eq!(body["explanation"]["explanation"], "Recursion is when a function calls itself...");
        assert!(body["explanation"]["definition"].is_null());
        assert_eq!(body["explanation"]["conversationId"], body["id"]);
    }

    #[actix_web::test]
    async fn out_of_taxonomy_topic_is_stored_as_general() {
        let store = memory();
        let generator = canned(json!({
            "explanation": "Qubits are...",
            "topic": "Quantum Computing"
        }));
        let app = spawn_app!(store, generator);

        let resp = test::call_service(&app, post_question("What is a qubit?").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["topic"], "General");

        // The stored record was coerced too, not just the response.
        let id = body["id"].as_str().unwrap();
        let req = test::TestRequest::get()
            .uri(&format!("/api/conversations/{}", id))
            .to_request();
        let fetched: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched["topic"], "General");
    }

    #[actix_web::test]
    async fn list_reflects_creates_and_deletes_newest_first() {
        let store = memory();
        let generator = canned(json!({"explanation": "...", "topic": "Math"}));
        let app = spawn_app!(store, generator);

        let mut ids = Vec::new();
        for i in 0..3 {
            let resp =
                test::call_service(&app, post_question(&format!("question {}", i)).to_request())
                    .await;
            assert_eq!(resp.status(), StatusCode::OK);
            let body: Value = test::read_body_json(resp).await;
            ids.push(body["id"].as_str().unwrap().to_string());
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        let req = test::TestRequest::delete()
            .uri(&format!("/api/conversations/{}", ids[1]))
            .to_request();
        let deleted: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(deleted["success"], true);

        let req = test::TestRequest::get().uri("/api/conversations").to_request();
        let list: Value = test::call_and_read_body_json(&app, req).await;
        let list = list.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["question"], "question 2");
        assert_eq!(list[1]["question"], "question 0");
    }

    #[actix_web::test]
    async fn delete_of_a_never_created_id_succeeds() {
        let store = memory();
        let generator = canned(json!({"explanation": "...", "topic": "Math"}));
        let app = spawn_app!(store, generator);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/conversations/{}", Uuid::new_v4()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
    }

    #[actix_web::test]
    async fn delete_removes_the_conversation_and_its_explanation() {
        let store = memory();
        let generator = canned(json!({"explanation": "...", "topic": "Math"}));
        let app = spawn_app!(store, generator);

        let resp = test::call_service(&app, post_question("ephemeral").to_request()).await;
        let body: Value = test::read_body_json(resp).await;
        let id = body["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::delete()
            .uri(&format!("/api/conversations/{}", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&format!("/api/conversations/{}", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn blank_questions_are_rejected_without_side_effects() {
        let store = memory();
        let generator = canned(json!({"explanation": "...", "topic": "Math"}));
        let app = spawn_app!(store, generator);

        for question in ["", "   \t\n"] {
            let resp = test::call_service(&app, post_question(question).to_request()).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "Invalid request");
            assert_eq!(body["details"][0]["field"], "question");
        }

        let req = test::TestRequest::get().uri("/api/conversations").to_request();
        let list: Value = test::call_and_read_body_json(&app, req).await;
        assert!(list.as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn generator_failure_creates_no_records() {
        let store = memory();
        let generator: Arc<dyn ExplanationGenerator> = Arc::new(FailingGenerator);
        let app = spawn_app!(store, generator);

        let resp = test::call_service(&app, post_question("doomed").to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to generate explanation:"));

        let req = test::TestRequest::get().uri("/api/conversations").to_request();
        let list: Value = test::call_and_read_body_json(&app, req).await;
        assert!(list.as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn question_round_trips_exactly() {
        let store = memory();
        let generator = canned(json!({"explanation": "...", "topic": "General"}));
        let app = spawn_app!(store, generator);

        // Interior whitespace survives; only the ends are trimmed.
        let resp =
            test::call_service(&app, post_question("  what  is   a  monad  ").to_request()).await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["question"], "what  is   a  monad");

        let id = body["id"].as_str().unwrap();
        let req = test::TestRequest::get()
            .uri(&format!("/api/conversations/{}", id))
            .to_request();
        let fetched: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched["question"], "what  is   a  monad");
    }

    #[actix_web::test]
    async fn malformed_ids_are_rejected() {
        let store = memory();
        let generator = canned(json!({"explanation": "...", "topic": "Math"}));
        let app = spawn_app!(store, generator);

        let req = test::TestRequest::get()
            .uri("/api/conversations/not-a-uuid")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::delete()
            .uri("/api/conversations/not-a-uuid")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn preflight_and_cors_headers_are_open() {
        let store = memory();
        let generator = canned(json!({"explanation": "...", "topic": "Math"}));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(store.clone()))
                .app_data(web::Data::new(generator.clone()))
                .wrap(api::middleware::Cors)
                .configure(api::routes::configure),
        )
        .await;

        let req = test::TestRequest::with_uri("/api/conversations")
            .method(Method::OPTIONS)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );

        let req = test::TestRequest::get().uri("/api/conversations").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }
}

//! Axum route handlers for the interview flow.
//!
//! Page routes (`/interview`, `/result`, `/start`) fail with plain-text bodies;
//! the `/answer` endpoint is called from page script and fails with JSON.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::{AppError, PlainTextError};
use crate::interview::evaluation::evaluate_answers;
use crate::interview::pages::{interview_page, result_page, start_page};
use crate::interview::questions::generate_questions;
use crate::models::session::{parse_num_questions, Advance, InterviewMeta, Session};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StartForm {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub extra: String,
    /// Kept as text so unparsable input falls back to the default count.
    pub num_questions: Option<String>,
}

impl StartForm {
    fn into_meta(self) -> InterviewMeta {
        InterviewMeta {
            role: self.role.trim().to_string(),
            position: self.position.trim().to_string(),
            extra: self.extra.trim().to_string(),
            num_questions: parse_num_questions(self.num_questions.as_deref()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AnswerRequest {
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AnswerResponse {
    Next {
        next_question: String,
        /// 1-based position of `next_question`.
        index: usize,
        total: usize,
        done: bool,
    },
    Done {
        done: bool,
        result_url: String,
    },
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /
pub async fn handle_index() -> Html<&'static str> {
    Html(start_page())
}

/// POST /start
///
/// Generates the questions, creates the session and redirects (302) to the interview view.
pub async fn handle_start(
    State(state): State<AppState>,
    Form(form): Form<StartForm>,
) -> Result<impl IntoResponse, PlainTextError> {
    let meta = form.into_meta();
    let questions = generate_questions(state.llm.as_ref(), &meta).await?;

    let session_id = Uuid::new_v4().to_string();
    state
        .store
        .put(&session_id, Session::new(meta, questions))
        .await
        .map_err(AppError::Internal)?;

    info!("Started interview session {session_id}");
    let location = format!("/interview/{session_id}");
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]))
}

/// GET /interview/:session_id
pub async fn handle_interview(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Html<String>, PlainTextError> {
    let session = load_session(&state, &session_id).await?;
    Ok(Html(interview_page(&session_id, &session)))
}

/// POST /answer/:session_id
///
/// Records one answer. Returns the next question, or evaluates the transcript once
/// the last question is answered. A failed evaluation is not persisted, so the
/// final answer can be resent.
pub async fn handle_answer(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    payload: Option<Json<AnswerRequest>>,
) -> Result<Json<AnswerResponse>, AppError> {
    let answer = payload
        .map(|Json(request)| request.answer.trim().to_string())
        .unwrap_or_default();

    let mut session = load_session(&state, &session_id).await?;

    match session.record_answer(answer) {
        Advance::Next(next_question) => {
            let index = session.current_index + 1;
            let total = session.total();
            state.store.put(&session_id, session).await?;

            Ok(Json(AnswerResponse::Next {
                next_question,
                index,
                total,
                done: false,
            }))
        }
        Advance::Finished => {
            let evaluation =
                evaluate_answers(state.llm.as_ref(), &session.meta, &session.answers).await?;
            session.evaluation = Some(evaluation);
            state.store.put(&session_id, session).await?;

            info!("Interview session {session_id} evaluated");
            Ok(Json(AnswerResponse::Done {
                done: true,
                result_url: format!("/result/{session_id}"),
            }))
        }
    }
}

/// GET /result/:session_id
pub async fn handle_result(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Html<String>, PlainTextError> {
    let session = load_session(&state, &session_id).await?;
    let evaluation = session
        .evaluation
        .as_ref()
        .ok_or_else(|| AppError::NotReady("Evaluation not ready.".to_string()))?;

    Ok(Html(result_page(&session, &evaluation.raw_evaluation)))
}

async fn load_session(state: &AppState, session_id: &str) -> Result<Session, AppError> {
    state
        .store
        .get(session_id)
        .await
        .ok_or_else(|| AppError::NotFound("Session not found.".to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::llm_client::testing::ScriptedChat;
    use crate::routes::build_router;
    use crate::state::AppState;
    use crate::store::SessionStore;

    const EVALUATION: &str = "Overall Score: 82/100\n\n\
        Key Strengths:\n1. You structured your answers well.\n\n\
        Key Weaknesses:\n1. You glossed over pagination.\n\n\
        Tips for Improvement:\n1. You should quantify results.\n\n\
        Brief Feedback:\n- Q1: You were clear.\n- Q2: You were brief.";

    struct Harness {
        app: Router,
        llm: Arc<ScriptedChat>,
        store: SessionStore,
        _dir: TempDir,
    }

    fn harness(llm: ScriptedChat) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("answers.json"));
        let llm = Arc::new(llm);
        let app = build_router(AppState {
            store: store.clone(),
            llm: llm.clone(),
        });
        Harness {
            app,
            llm,
            store,
            _dir: dir,
        }
    }

    struct Reply {
        status: StatusCode,
        location: Option<String>,
        content_type: String,
        body: String,
    }

    impl Reply {
        fn json(&self) -> Value {
            serde_json::from_str(&self.body).unwrap()
        }
    }

    async fn send(app: &Router, request: Request<Body>) -> Reply {
        let response = app.clone().oneshot(request).await.unwrap();
        let headers = response.headers();
        let location = headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        Reply {
            status,
            location,
            content_type,
            body: String::from_utf8(body.to_vec()).unwrap(),
        }
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn start(form: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/start")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap()
    }

    fn answer(session_id: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!("/answer/{session_id}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn start_session(h: &Harness, form: &str) -> String {
        let reply = send(&h.app, start(form)).await;
        assert_eq!(reply.status, StatusCode::FOUND);
        let location = reply.location.unwrap();
        location
            .strip_prefix("/interview/")
            .expect("redirects to interview view")
            .to_string()
    }

    #[tokio::test]
    async fn test_index_serves_start_form() {
        let h = harness(ScriptedChat::new());
        let reply = send(&h.app, get("/")).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert!(reply.content_type.starts_with("text/html"));
        assert!(reply.body.contains(r#"action="/start""#));
    }

    #[tokio::test]
    async fn test_full_interview_flow() {
        let h = harness(
            ScriptedChat::new()
                .reply("1. Design a REST endpoint for orders.\n\n2. How do you version an API?\n")
                .reply(EVALUATION),
        );

        let id = start_session(
            &h,
            "role=Backend+Engineer&position=Mid&extra=APIs&num_questions=2",
        )
        .await;

        let page = send(&h.app, get(&format!("/interview/{id}"))).await;
        assert_eq!(page.status, StatusCode::OK);
        assert!(page.body.contains("1. Design a REST endpoint for orders."));
        assert!(page.body.contains(r#"<span id="index">1</span>"#));
        assert!(page.body.contains(r#"<span id="total">2</span>"#));

        let first = send(&h.app, answer(&id, json!({"answer": "  POST /orders  "}))).await;
        assert_eq!(first.status, StatusCode::OK);
        assert_eq!(
            first.json(),
            json!({
                "next_question": "2. How do you version an API?",
                "index": 2,
                "total": 2,
                "done": false
            })
        );

        let second = send(&h.app, answer(&id, json!({"answer": "URL prefix"}))).await;
        assert_eq!(second.status, StatusCode::OK);
        assert_eq!(
            second.json(),
            json!({"done": true, "result_url": format!("/result/{id}")})
        );

        let result = send(&h.app, get(&format!("/result/{id}"))).await;
        assert_eq!(result.status, StatusCode::OK);
        assert!(result.body.contains("Overall Score: 82/100"));
        assert!(result.body.contains("Key Weaknesses:\n1. You glossed over pagination."));

        let stored = h.store.get(&id).await.unwrap();
        assert_eq!(stored.meta.role, "Backend Engineer");
        assert_eq!(stored.meta.num_questions, 2);
        assert_eq!(stored.current_index, 2);
        assert_eq!(stored.answers.len(), 2);
        assert_eq!(stored.answers[0].answer, "POST /orders");
        assert_eq!(stored.answers[1].question, "2. How do you version an API?");
        assert_eq!(stored.evaluation.unwrap().raw_evaluation, EVALUATION);

        let requests = h.llm.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].user.starts_with("Generate 2 high-quality"));
        assert!(requests[1].user.contains(
            "Q: 1. Design a REST endpoint for orders.\nA: POST /orders\n\
             Q: 2. How do you version an API?\nA: URL prefix"
        ));
    }

    #[tokio::test]
    async fn test_start_redirects_with_found() {
        let h = harness(ScriptedChat::new().reply("1. C++ {extra} question?"));
        let reply = send(&h.app, start("role=C%2B%2B+%7Bextra%7D+guru&extra=SECRET")).await;

        assert_eq!(reply.status, StatusCode::FOUND);
        let location = reply.location.unwrap();
        let id = location.strip_prefix("/interview/").unwrap();
        assert!(h.store.get(id).await.is_some());
        assert!(h.llm.requests()[0]
            .user
            .contains("for the role of C++ {extra} guru, position: ."));
    }

    #[tokio::test]
    async fn test_question_count_follows_reply_lines() {
        let h = harness(ScriptedChat::new().reply("1. A?\n2. B?\n3. C?"));
        let id = start_session(&h, "role=SRE&position=Senior&extra=&num_questions=2").await;

        let stored = h.store.get(&id).await.unwrap();
        assert_eq!(stored.questions.len(), 3);
        assert_eq!(stored.meta.num_questions, 2);
    }

    #[tokio::test]
    async fn test_num_questions_defaults_to_five() {
        for form in [
            "role=SRE&position=Senior&extra=",
            "role=SRE&position=Senior&extra=&num_questions=abc",
            "role=SRE&position=Senior&extra=&num_questions=0",
            "role=SRE&position=Senior&extra=&num_questions=-4",
        ] {
            let h = harness(ScriptedChat::new().reply("1. Q?"));
            let id = start_session(&h, form).await;
            let stored = h.store.get(&id).await.unwrap();
            assert_eq!(stored.meta.num_questions, 5, "form: {form}");
            assert!(h.llm.requests()[0].user.starts_with("Generate 5 "));
        }
    }

    #[tokio::test]
    async fn test_start_generation_failure_is_plain_text_500() {
        let h = harness(ScriptedChat::new().fail(401, "Invalid API Key"));
        let reply = send(&h.app, start("role=SRE&num_questions=3")).await;

        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(reply.content_type.starts_with("text/plain"));
        assert!(reply.body.starts_with("Failed to generate questions:"));
        assert!(h.store.read_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found_everywhere() {
        let h = harness(ScriptedChat::new());

        let interview = send(&h.app, get("/interview/missing")).await;
        assert_eq!(interview.status, StatusCode::NOT_FOUND);
        assert!(interview.content_type.starts_with("text/plain"));
        assert_eq!(interview.body, "Session not found.");

        let answered = send(&h.app, answer("missing", json!({"answer": "x"}))).await;
        assert_eq!(answered.status, StatusCode::NOT_FOUND);
        assert_eq!(answered.json()["error"]["code"], "NOT_FOUND");

        let result = send(&h.app, get("/result/missing")).await;
        assert_eq!(result.status, StatusCode::NOT_FOUND);
        assert!(result.content_type.starts_with("text/plain"));
    }

    #[tokio::test]
    async fn test_result_before_evaluation_is_bad_request() {
        let h = harness(ScriptedChat::new().reply("1. A?\n2. B?"));
        let id = start_session(&h, "role=SRE&num_questions=2").await;

        let reply = send(&h.app, get(&format!("/result/{id}"))).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert!(reply.content_type.starts_with("text/plain"));
        assert_eq!(reply.body, "Evaluation not ready.");
    }

    #[tokio::test]
    async fn test_evaluation_failure_keeps_session_resubmittable() {
        let bad = EVALUATION.replace("Key Weaknesses:", "Weak spots:");
        let h = harness(
            ScriptedChat::new()
                .reply("1. Only question?")
                .reply(&bad)
                .reply(EVALUATION),
        );
        let id = start_session(&h, "role=SRE&num_questions=1").await;

        let failed = send(&h.app, answer(&id, json!({"answer": "first try"}))).await;
        assert_eq!(failed.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(failed.json()["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Key Weaknesses:"));

        let stored = h.store.get(&id).await.unwrap();
        assert_eq!(stored.current_index, 0);
        assert!(stored.answers.is_empty());
        assert!(stored.evaluation.is_none());

        let retried = send(&h.app, answer(&id, json!({"answer": "second try"}))).await;
        assert_eq!(retried.status, StatusCode::OK);
        assert_eq!(retried.json()["done"], true);

        let stored = h.store.get(&id).await.unwrap();
        assert_eq!(stored.answers.len(), 1);
        assert_eq!(stored.answers[0].answer, "second try");
    }

    #[tokio::test]
    async fn test_answer_without_json_body_records_empty_answer() {
        let h = harness(ScriptedChat::new().reply("1. A?\n2. B?"));
        let id = start_session(&h, "role=SRE&num_questions=2").await;

        let request = Request::builder()
            .method("POST")
            .uri(format!("/answer/{id}"))
            .body(Body::empty())
            .unwrap();
        let reply = send(&h.app, request).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.json()["index"], 2);

        let stored = h.store.get(&id).await.unwrap();
        assert_eq!(stored.answers[0].answer, "");
    }

    #[tokio::test]
    async fn test_resubmission_after_evaluation_appends_again() {
        let h = harness(
            ScriptedChat::new()
                .reply("1. A?")
                .reply(EVALUATION)
                .reply(EVALUATION),
        );
        let id = start_session(&h, "role=SRE&num_questions=1").await;

        send(&h.app, answer(&id, json!({"answer": "one"}))).await;
        let again = send(&h.app, answer(&id, json!({"answer": "two"}))).await;
        assert_eq!(again.json()["done"], true);

        let stored = h.store.get(&id).await.unwrap();
        assert_eq!(stored.answers.len(), 2);
        assert_eq!(stored.answers[1].question, "");
        assert_eq!(stored.current_index, 1);
    }

    #[tokio::test]
    async fn test_health() {
        let h = harness(ScriptedChat::new());
        let reply = send(&h.app, get("/health")).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.json()["status"], "ok");
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::{Form, Json};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info};
use uuid::Uuid;

use crate::dialogue::{next_robot_turn, permission_granted, DialogueState, Session};
use crate::models::Turn;

use super::AppState;

type ApiError = (StatusCode, Json<Value>);

fn bad_request(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub session_id: String,
    pub robot_text: String,
    pub audio_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub user_text: String,
    pub robot_text: Option<String>,
    pub audio_url: Option<String>,
    pub finished: bool,
}

/// `POST /start` — open a session and speak the greeting.
pub async fn start_conversation(State(state): State<Arc<AppState>>) -> Json<StartResponse> {
    let mut session = Session::new();
    let robot_text = next_robot_turn(&mut session, &state.catalog, &mut rand::thread_rng())
        .unwrap_or_default();
    let audio_url = state.speech.synthesize(&robot_text).await;

    session.turns.push(Turn::robot(robot_text.clone()));
    let session_id = session.session_id.clone();
    state.sessions.insert(session);
    info!("Session {} started", session_id);

    Json(StartResponse {
        session_id,
        robot_text,
        audio_url,
    })
}

/// `POST /chat` — one patient audio turn in, one robot turn out.
///
/// Multipart fields: `session_id` and `audio` (WAV). On the terminal state
/// the session is flushed to its chat log and dropped from the store.
pub async fn handle_chat(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ChatResponse>, ApiError> {
    let mut session_id: Option<String> = None;
    let mut audio: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| bad_request("Malformed multipart body"))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("session_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| bad_request("Unreadable session_id field"))?;
                session_id = Some(text);
            }
            Some("audio") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| bad_request("Unreadable audio field"))?;
                audio = Some(bytes.to_vec());
            }
            _ => {}
        }
    }

    let session_id = session_id.ok_or_else(|| bad_request("Missing session_id"))?;
    let audio = audio.ok_or_else(|| bad_request("Missing audio"))?;

    let Some(mut session) = state.sessions.get(&session_id) else {
        return Err(bad_request("Invalid session ID"));
    };

    let user_text = state.speech.transcribe(audio).await;
    session.turns.push(Turn::patient(user_text.clone()));

    if session.state == DialogueState::AwaitingPermission {
        let granted = permission_granted(&user_text, &state.permission);
        session.state = session.state.after_patient_reply(granted);
    }

    let robot_text = next_robot_turn(&mut session, &state.catalog, &mut rand::thread_rng());
    if let Some(text) = &robot_text {
        session.turns.push(Turn::robot(text.clone()));
    }
    let audio_url = match &robot_text {
        Some(text) => state.speech.synthesize(text).await,
        None => None,
    };
    let finished = session.state.is_terminal();

    if finished {
        session.ended_at = Some(Utc::now());
        match session.write_log(&state.logs_dir) {
            Ok(path) => info!("Session {} finished, log written to {:?}", session_id, path),
            Err(e) => error!("Failed to write chat log for {}: {:#}", session_id, e),
        }
        state.sessions.remove(&session_id);
    } else if let Err(e) = state.sessions.update(session) {
        error!("Failed to persist session turn: {}", e);
    }

    Ok(Json(ChatResponse {
        user_text,
        robot_text,
        audio_url,
        finished,
    }))
}

/// `GET /form/questions` — one random question from each submodule of one
/// random module, for the paper-form fallback UI.
pub async fn get_form_questions(State(state): State<Arc<AppState>>) -> Json<Value> {
    let questions = {
        let mut rng = rand::thread_rng();
        state
            .catalog
            .choose_module(&mut rng)
            .map(|module| module.form_questions(&mut rng))
            .unwrap_or_default()
    };
    Json(json!({ "questions": questions }))
}

/// `POST /form/submit` — persist a filled paper form as a form log.
pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    Form(responses): Form<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let form_id = Uuid::new_v4().to_string();
    let record = json!({
        "form_id": form_id,
        "submitted_at": Utc::now(),
        "responses": responses,
    });

    let path = state.logs_dir.join(format!("formlog-{}.json", form_id));
    let body = serde_json::to_string_pretty(&record)
        .map_err(|_| bad_request("Unserializable form payload"))?;
    if let Err(e) = std::fs::write(&path, body) {
        error!("Failed to write form log {:?}: {}", path, e);
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to persist form" })),
        ));
    }
    info!("Form {} submitted, log written to {:?}", form_id, path);

    Ok(Json(json!({
        "status": "success",
        "message": "Form submitted successfully!"
    })))
}

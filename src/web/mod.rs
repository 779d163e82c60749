//! The web surface: one page, one form, one session per browser.
//!
//! `GET /` shows the caller's transcript, or an empty page when the caller has no live
//! session; it never creates one.  `POST /` takes the `thought` field, creating the session if
//! needed, runs one turn, and shows the transcript again with any provider error inline.  The
//! session id rides in a cookie with no expiry, so it lasts as long as the browser session
//! does or until the store evicts it for idleness.

mod page;

use std::sync::Arc;

use askama::Template;
use axum::Router;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use tokio::net::TcpListener;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::session::{Reframer, SessionStore, SharedSession};

pub use page::{CAPTION, ChatPage, ICON, PLACEHOLDER, SUBTITLE, THINKING, TITLE};

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "reframe_session";

/// State shared by every request.
#[derive(Clone)]
pub struct AppState {
    reframer: Arc<Reframer>,
    sessions: Arc<SessionStore>,
}

impl AppState {
    /// State with an empty session store.
    pub fn new(reframer: Reframer) -> Self {
        Self::with_sessions(reframer, SessionStore::new())
    }

    /// State over the given session store.
    pub fn with_sessions(reframer: Reframer, sessions: SessionStore) -> Self {
        Self {
            reframer: Arc::new(reframer),
            sessions: Arc::new(sessions),
        }
    }

    /// The session store.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    fn existing_session(&self, jar: &CookieJar) -> Option<SharedSession> {
        session_id(jar).and_then(|id| self.sessions.get(id))
    }

    fn session_for(&self, jar: CookieJar) -> (CookieJar, SharedSession) {
        let known = session_id(&jar);
        let (id, session) = self.sessions.get_or_create(known);
        if known == Some(id) {
            (jar, session)
        } else {
            (jar.add(session_cookie(id)), session)
        }
    }
}

/// The submitted form.
#[derive(Debug, Default, Deserialize)]
pub struct ThoughtForm {
    /// What the user typed.
    #[serde(default)]
    pub thought: String,
}

/// Build the router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .route("/health", get(health))
        .with_state(state)
}

/// Serve `state` on `bind` until Ctrl+C or SIGTERM.
pub async fn serve(state: AppState, bind: &str) -> Result<()> {
    let listener = TcpListener::bind(bind)
        .await
        .map_err(|err| Error::io(format!("failed to bind {bind}"), err))?;
    tracing::info!("listening on http://{bind} (Ctrl+C to stop)");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| Error::io("server error", err))?;
    tracing::info!("server stopped");
    Ok(())
}

async fn index(State(state): State<AppState>, jar: CookieJar) -> Response {
    match state.existing_session(&jar) {
        Some(session) => {
            let session = session.lock().await;
            render(ChatPage::new(session.history(), None))
        }
        None => render(ChatPage::new(&[], None)),
    }
}

async fn submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ThoughtForm>,
) -> Response {
    let (jar, session) = state.session_for(jar);
    let mut session = session.lock().await;
    let mut error = None;
    if !form.thought.trim().is_empty()
        && let Err(err) = state.reframer.take_turn(&mut session, &form.thought).await
    {
        error = Some(err.to_string());
    }
    (jar, render(ChatPage::new(session.history(), error))).into_response()
}

async fn health() -> &'static str {
    "ok"
}

fn render(page: ChatPage<'_>) -> Response {
    match page.render() {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to render page");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to render page").into_response()
        }
    }
}

fn session_id(jar: &CookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

fn session_cookie(id: Uuid) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
}

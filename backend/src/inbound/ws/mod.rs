//! WebSocket inbound adapter for interactive study and quiz sessions.
//!
//! Responsibilities:
//! - gate upgrades on an authenticated session cookie
//! - spawn the per-connection handler
//! - keep WebSocket-specific concerns at the edge of the system

use actix_web::web::{self, Payload};
use actix_web::{HttpRequest, HttpResponse, get, rt};
use tracing::error;

use crate::inbound::http::session::SessionContext;

mod session;

pub mod messages;
pub mod state;

/// Upgrade an authenticated request into a live study session.
#[get("/ws/study")]
pub async fn study_ws(
    ws_state: web::Data<state::WsState>,
    context: SessionContext,
    req: HttpRequest,
    stream: Payload,
) -> actix_web::Result<HttpResponse> {
    let user_id = context.require_user_id()?;

    let (response, session, message_stream) = actix_ws::handle(&req, stream).map_err(|err| {
        error!(error = %err, "WebSocket upgrade failed");
        err
    })?;
    rt::spawn(session::handle_ws_session(
        ws_state.get_ref().clone(),
        user_id,
        session,
        message_stream,
    ));
    Ok(response)
}

use std::collections::HashMap;

use hyperware_process_lib::{
    http::{
        server::{send_response, HttpServerRequest, IncomingHttpRequest},
        Method, StatusCode,
    },
    last_blob,
    logging::{error, info, warn},
};
use panelcore::error::ErrorInfo;
use panelcore::{IntentUpdate, PanelError};
use serde::Serialize;
use serde_json::{json, Value};

use crate::structs::{ApiResponse, State};

/// Entry point for everything `http-server:distro:sys` sends us.
pub fn handle_frontend(body: &[u8], state: &mut State) -> anyhow::Result<()> {
    let server_request = deserialize_request(body)?;
    let HttpServerRequest::Http(req) = server_request else {
        info!("Ignoring non-HTTP ServerRequest");
        return Ok(());
    };

    route_http_request(&req, state)
}

fn deserialize_request(body: &[u8]) -> anyhow::Result<HttpServerRequest> {
    serde_json::from_slice(body).map_err(|e| {
        error!("Failed to deserialize HttpServerRequest: {}", e);
        send_response(StatusCode::BAD_REQUEST, None, b"Invalid request format".to_vec());
        anyhow::anyhow!("Deserialization failed: {}", e)
    })
}

fn route_http_request(req: &IncomingHttpRequest, state: &mut State) -> anyhow::Result<()> {
    let method = req.method()?;
    let path = req.path()?;

    info!("Processing HTTP request: {} {}", method, path);

    match (method.clone(), path.as_str()) {
        (Method::GET, "/api/state") => respond(state, Ok(Value::Null)),
        (Method::POST, "/api/connect") => {
            let result = state.connect().map(|owner| json!({ "owner": owner }));
            respond(state, result)
        }
        (Method::POST, "/api/account") => {
            let result = state
                .resolve()
                .map(|account| json!({ "smart_account": account }));
            respond(state, result)
        }
        (Method::POST, "/api/refresh") => {
            let result = state.refresh().map(|balance| json!({ "balance": balance }));
            respond(state, result)
        }
        (Method::POST, "/api/intent") => {
            let update = read_body()?;
            state.update_intent(update);
            respond(state, Ok(Value::Null))
        }
        (Method::POST, "/api/send") => {
            let update = read_body()?;
            state.update_intent(update);
            let (recipient, amount) = (
                state.session.intent.recipient.clone(),
                state.session.intent.amount.clone(),
            );
            let result = state
                .send(&recipient, &amount)
                .map(|receipt| json!({ "receipt": receipt }));
            respond(state, result)
        }
        (Method::POST, "/api/deposit") => {
            let update = read_body()?;
            state.update_intent(update.amount_only());
            let amount = state.session.intent.amount.clone();
            let result = state
                .deposit(&amount)
                .map(|receipt| json!({ "receipt": receipt }));
            respond(state, result)
        }
        _ => {
            warn!("Unhandled route: {:?} {:?}", method, path);
            send_json_response(
                StatusCode::NOT_FOUND,
                &json!({ "error": "API endpoint not found" }),
            )
        }
    }
}

/// Optional JSON body; an empty body is an empty update.
fn read_body() -> anyhow::Result<IntentUpdate> {
    let Some(blob) = last_blob() else {
        return Ok(IntentUpdate::default());
    };
    if blob.bytes.is_empty() {
        return Ok(IntentUpdate::default());
    }
    match serde_json::from_slice(&blob.bytes) {
        Ok(update) => Ok(update),
        Err(e) => {
            warn!("Malformed request body: {}", e);
            send_json_response(
                StatusCode::BAD_REQUEST,
                &json!({ "error": format!("malformed body: {}", e) }),
            )?;
            Err(anyhow::anyhow!("malformed request body: {}", e))
        }
    }
}

fn respond(state: &State, result: Result<Value, PanelError>) -> anyhow::Result<()> {
    let (status, response) = match result {
        Ok(value) => (
            StatusCode::OK,
            ApiResponse {
                ok: true,
                result: (!value.is_null()).then_some(value),
                error: None,
                state: state.view(),
            },
        ),
        Err(err) => (
            status_for(&err),
            ApiResponse {
                ok: false,
                result: None,
                error: Some(ErrorInfo::from(&err)),
                state: state.view(),
            },
        ),
    };
    send_json_response(status, &response)
}

fn status_for(err: &PanelError) -> StatusCode {
    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

pub fn send_json_response<T: Serialize>(status: StatusCode, data: &T) -> anyhow::Result<()> {
    let json_data = serde_json::to_vec(data)?;
    send_response(
        status,
        Some(HashMap::from([(
            String::from("Content-Type"),
            String::from("application/json"),
        )])),
        json_data,
    );
    Ok(())
}

//! Error containment: the outermost stage of the request pipeline.
//!
//! Two sources of faults end up here:
//! - a handler returned `AppError::Unexpected` (bare 500 + `Fault` marker)
//! - something downstream panicked (caught by `CatchPanicLayer`, same marker)
//!
//! Both are logged once and rendered as `{error, statusCode: 500, details}`.
//! Every other response passes through untouched.

use std::any::Any;

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::{Fault, fault_response};

pub async fn contain(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let res = next.run(req).await;

    let Some(details) = res.extensions().get::<Fault>().map(|f| f.details.clone()) else {
        return res;
    };

    tracing::error!(%method, %path, %details, "unhandled fault contained");
    fault_response(details)
}

/// `CatchPanicLayer::custom` handler: turn a panic payload into a fault.
pub fn panic_to_fault(payload: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };

    let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();
    res.extensions_mut().insert(Fault { details });
    res
}

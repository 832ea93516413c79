use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::info;

/// Procedure name for `/rpc/<name>` paths.
fn procedure_name(path: &str) -> Option<&str> {
    path.strip_prefix("/rpc/").filter(|name| !name.is_empty())
}

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;

    let latency = start.elapsed();
    let status = response.status();

    match procedure_name(uri.path()) {
        Some(procedure) => info!(
            target: "metrics",
            procedure = %procedure,
            status = %status.as_u16(),
            latency_ms = %latency.as_millis(),
            "rpc_completed"
        ),
        None => info!(
            target: "metrics",
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            latency_ms = %latency.as_millis(),
            "request_completed"
        ),
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_procedure_name() {
        assert_eq!(procedure_name("/rpc/getImage"), Some("getImage"));
        assert_eq!(procedure_name("/rpc/"), None);
        assert_eq!(procedure_name("/health"), None);
    }
}

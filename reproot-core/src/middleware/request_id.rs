use axum::http::HeaderValue;
use axum::{extract::Request, middleware::Next, response::Response};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Reuses the caller's id when one is present so a request stays traceable
/// across the frontend and this service; otherwise a fresh uuid is assigned.
/// The id is echoed back on the response.
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let request_id = incoming_id(&req).unwrap_or_else(|| Uuid::new_v4().to_string());

    match HeaderValue::from_str(&request_id) {
        Ok(value) => {
            req.headers_mut().insert(REQUEST_ID_HEADER, value.clone());
            let mut response = next.run(req).await;
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
            response
        }
        Err(_) => next.run(req).await,
    }
}

fn incoming_id(req: &Request) -> Option<String> {
    let raw = req.headers().get(REQUEST_ID_HEADER)?.to_str().ok()?;
    // Cap what we accept from the outside; anything odd gets replaced.
    if raw.is_empty() || raw.len() > 128 {
        return None;
    }
    Some(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with_header(value: &str) -> Request {
        Request::builder()
            .header(REQUEST_ID_HEADER, value)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn accepts_a_reasonable_incoming_id() {
        let req = request_with_header("abc-123");
        assert_eq!(incoming_id(&req).as_deref(), Some("abc-123"));
    }

    #[test]
    fn rejects_empty_and_oversized_ids() {
        assert!(incoming_id(&request_with_header("")).is_none());
        assert!(incoming_id(&request_with_header(&"x".repeat(200))).is_none());
    }
}

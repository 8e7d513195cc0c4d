//! Embedded chat page.
//!
//! The files under `frontend/` are compiled into the binary with
//! `include_str!`, so `cekfakta serve` needs nothing on disk.

use axum::{
    Router,
    extract::Path,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};

const INDEX_HTML: &str = include_str!("../../../frontend/index.html");
const STYLE_CSS: &str = include_str!("../../../frontend/style.css");
const APP_JS: &str = include_str!("../../../frontend/app.js");

/// Build a router that serves the embedded chat page.
pub fn frontend_router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/static/{file}", get(static_handler))
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn static_handler(Path(file): Path<String>) -> Response {
    let (content_type, body) = match file.as_str() {
        "style.css" => ("text/css; charset=utf-8", STYLE_CSS),
        "app.js" => ("application/javascript; charset=utf-8", APP_JS),
        _ => return StatusCode::NOT_FOUND.into_response(),
    };
    ([(header::CONTENT_TYPE, content_type)], body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn get_path(uri: &str) -> Response {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        frontend_router().oneshot(req).await.unwrap()
    }

    #[tokio::test]
    async fn serves_chat_page() {
        let response = get_path("/").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains("<!DOCTYPE html>"));
        assert!(text.contains("<title>Asisten Cek Fakta Medis</title>"));
        assert!(text.contains("Tanyakan klaim medis atau pertanyaan kesehatan..."));
    }

    #[tokio::test]
    async fn serves_assets_with_content_type() {
        let css = get_path("/static/style.css").await;
        assert_eq!(css.status(), StatusCode::OK);
        let ct = css.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(ct.contains("text/css"));

        let js = get_path("/static/app.js").await;
        let ct = js.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
        assert!(ct.contains("javascript"));
        let body = js.into_body().collect().await.unwrap().to_bytes();
        assert!(String::from_utf8_lossy(&body).contains("/v1/chat"));
    }

    #[tokio::test]
    async fn unknown_asset_is_404() {
        assert_eq!(get_path("/static/nope.txt").await.status(), StatusCode::NOT_FOUND);
    }
}

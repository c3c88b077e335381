use std::convert::Infallible;

use axum::{extract::DefaultBodyLimit, routing, Router};
use jobs_common::store::SharedStore;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::trace::TraceLayer;

use super::postings;

pub fn add_routes(
    router: Router,
    store: SharedStore,
    max_body_size: usize,
    concurrency_limit: usize,
) -> Router {
    router
        .route("/", routing::get(index))
        .route("/_readiness", routing::get(index))
        .route("/_liveness", routing::get(index)) // No async loop for now, just check axum health
        .route(
            "/jobs/postings",
            routing::post(postings::post_posting)
                .with_state(store)
                .layer::<_, Infallible>(ConcurrencyLimitLayer::new(concurrency_limit))
                .layer(DefaultBodyLimit::max(max_body_size)),
        )
        .layer(TraceLayer::new_for_http())
}

pub async fn index() -> &'static str {
    "jobs api"
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt; // for `collect`
    use jobs_common::store::PrintStore;
    use tower::ServiceExt; // for `call`, `oneshot`, and `ready`

    #[tokio::test]
    async fn index() {
        let app = add_routes(Router::new(), Arc::new(PrintStore {}), 1_000_000, 10);

        for uri in ["/", "/_readiness", "/_liveness"] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);

            let body = response.into_body().collect().await.unwrap().to_bytes();
            assert_eq!(&body[..], b"jobs api");
        }
    }

    #[tokio::test]
    async fn postings_only_accepts_post() {
        let app = add_routes(Router::new(), Arc::new(PrintStore {}), 1_000_000, 10);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/jobs/postings")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}

//! # HTTP Routes
//!
//! ```text
//! GET    /health                   liveness
//! GET    /health/ready             database reachable
//! GET    /api/items                list items (?name= filter)
//! POST   /api/items                create item
//! GET    /api/items/{id}           fetch item
//! PUT    /api/items/{id}           replace item
//! DELETE /api/items/{id}           delete item
//! POST   /api/checkout             atomic checkout
//! GET    /api/transactions/{id}    fetch recorded transaction
//! ```

pub mod checkout;
pub mod health;
pub mod items;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the application router with request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::ready))
        .route("/api/items", get(items::list_items).post(items::create_item))
        .route(
            "/api/items/{id}",
            get(items::get_item)
                .put(items::update_item)
                .delete(items::delete_item),
        )
        .route("/api/checkout", post(checkout::checkout))
        .route("/api/transactions/{id}", get(checkout::get_transaction))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// Router Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use kasir_core::NewItem;
    use kasir_db::{Database, DbConfig};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    /// Router over a fresh in-memory store holding
    /// item 1: Indomie Goreng, 100 @ 3500 and item 2: Teh Botol Sosro, 50 @ 5000.
    async fn app() -> Router {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        for (name, price, stock) in [("Indomie Goreng", 3500, 100), ("Teh Botol Sosro", 5000, 50)] {
            db.items()
                .insert(&NewItem {
                    name: name.to_string(),
                    price,
                    stock,
                })
                .await
                .unwrap();
        }
        router(AppState::new(db))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, json)
    }

    async fn stock_of(app: &Router, id: i64) -> i64 {
        let (_, body) = send(app, Method::GET, &format!("/api/items/{id}"), None).await;
        body["data"]["stock"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = app().await;

        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "API is running");

        let (status, body) = send(&app, Method::GET, "/health/ready", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn test_checkout_success() {
        let app = app().await;
        let request = json!({"items": [{"item_id": 1, "quantity": 2}, {"item_id": 2, "quantity": 3}]});

        let (status, body) =
            send(&app, Method::POST, "/api/checkout", Some(&request.to_string())).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["total_amount"], 22000);
        assert_eq!(body["data"]["details"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"]["details"][1]["subtotal"], 15000);
        assert_eq!(stock_of(&app, 1).await, 98);
        assert_eq!(stock_of(&app, 2).await, 47);

        let id = body["data"]["id"].as_i64().unwrap();
        let (status, stored) =
            send(&app, Method::GET, &format!("/api/transactions/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stored["data"]["details"], body["data"]["details"]);
    }

    #[tokio::test]
    async fn test_checkout_accepts_product_id() {
        let app = app().await;
        let request = r#"{"items":[{"product_id":1,"quantity":1}]}"#;

        let (status, _) = send(&app, Method::POST, "/api/checkout", Some(request)).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(stock_of(&app, 1).await, 99);
    }

    #[tokio::test]
    async fn test_checkout_error_statuses() {
        let app = app().await;
        let cases = [
            (r#"{"items":[]}"#, StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (
                r#"{"items":[{"item_id":1,"quantity":0}]}"#,
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            (
                r#"{"items":[{"item_id":99,"quantity":1}]}"#,
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
            ),
            (
                r#"{"items":[{"item_id":1,"quantity":1},{"item_id":2,"quantity":51}]}"#,
                StatusCode::UNPROCESSABLE_ENTITY,
                "INSUFFICIENT_STOCK",
            ),
            (r#"{"items":"#, StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        ];

        for (request, expected_status, expected_code) in cases {
            let (status, body) = send(&app, Method::POST, "/api/checkout", Some(request)).await;
            assert_eq!(status, expected_status, "request: {request}");
            assert_eq!(body["success"], false);
            assert_eq!(body["code"], expected_code);
        }

        assert_eq!(stock_of(&app, 1).await, 100);
        assert_eq!(stock_of(&app, 2).await, 50);
        let (status, _) = send(&app, Method::GET, "/api/transactions/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_item_crud() {
        let app = app().await;

        let (status, created) = send(
            &app,
            Method::POST,
            "/api/items",
            Some(r#"{"name":"Aqua 600ml","price":4000,"stock":200}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["data"]["id"].as_i64().unwrap();
        assert_eq!(id, 3);

        let (status, updated) = send(
            &app,
            Method::PUT,
            &format!("/api/items/{id}"),
            Some(r#"{"name":"Aqua 1500ml","price":6000,"stock":20}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["data"]["name"], "Aqua 1500ml");

        let (status, _) = send(&app, Method::DELETE, &format!("/api/items/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, Method::GET, &format!("/api/items/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/items/999",
            Some(r#"{"name":"Ghost","price":1,"stock":1}"#),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_item_validation() {
        let app = app().await;

        for body in [
            r#"{"name":"","price":1000,"stock":1}"#,
            r#"{"name":"Free","price":0,"stock":1}"#,
            r#"{"name":"Owed","price":1000,"stock":-1}"#,
            r#"{"name":"Half"}"#,
        ] {
            let (status, response) = send(&app, Method::POST, "/api/items", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(response["success"], false);
        }

        let (status, _) = send(&app, Method::GET, "/api/items/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_items_filter() {
        let app = app().await;

        let (status, all) = send(&app, Method::GET, "/api/items", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all["data"].as_array().unwrap().len(), 2);

        let (_, filtered) = send(&app, Method::GET, "/api/items?name=teh", None).await;
        let filtered = filtered["data"].as_array().unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0]["name"], "Teh Botol Sosro");
    }

    #[tokio::test]
    async fn test_sold_item_cannot_be_deleted() {
        let app = app().await;
        send(
            &app,
            Method::POST,
            "/api/checkout",
            Some(r#"{"items":[{"item_id":2,"quantity":1}]}"#),
        )
        .await;

        let (status, body) = send(&app, Method::DELETE, "/api/items/2", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONFLICT");
        assert_eq!(stock_of(&app, 2).await, 49);
    }
}

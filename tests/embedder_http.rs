//! Integration tests for the HTTP embedding client against a mock server.
//!
//! Every failure mode must surface as `Error::EmbeddingUnavailable` so the
//! arbiter can degrade to exact-only matching instead of failing requests.

#![cfg(feature = "http-embedder")]

use gencache_rust::embeddings::{Embedder, HttpEmbedder};
use gencache_rust::Error;
use mockito::Server;

async fn embedder_for(server: &Server, dimensions: usize) -> HttpEmbedder {
    HttpEmbedder::builder()
        .model("text-embedding-3-small")
        .api_key("sk-test")
        .base_url(server.url())
        .dimensions(dimensions)
        .build()
        .await
        .expect("builder should accept explicit credentials")
}

#[tokio::test]
async fn test_successful_embedding_round_trip() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/embeddings")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":[{"embedding":[0.1,0.2,0.3]}]}"#)
        .create_async()
        .await;

    let embedder = embedder_for(&server, 3).await;
    let vector = embedder.embed("calm ocean waves").await.unwrap();

    assert_eq!(vector, vec![0.1, 0.2, 0.3]);
    assert_eq!(embedder.dimensions(), 3);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_request_carries_model_and_auth() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/embeddings")
        .match_header("authorization", "Bearer sk-test")
        .match_body(mockito::Matcher::PartialJsonString(
            r#"{"model":"text-embedding-3-small","input":"soft piano","dimensions":3}"#.to_string(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":[{"embedding":[1.0,0.0,0.0]}]}"#)
        .create_async()
        .await;

    let embedder = embedder_for(&server, 3).await;
    embedder.embed("soft piano").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_degrades_to_embedding_unavailable() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/embeddings")
        .with_status(500)
        .with_body(r#"{"error":"internal"}"#)
        .create_async()
        .await;

    let embedder = embedder_for(&server, 3).await;
    let err = embedder.embed("calm ocean waves").await.unwrap_err();
    assert!(matches!(err, Error::EmbeddingUnavailable { .. }));
}

#[tokio::test]
async fn test_rate_limit_degrades_to_embedding_unavailable() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/embeddings")
        .with_status(429)
        .with_body(r#"{"error":{"message":"rate limited"}}"#)
        .create_async()
        .await;

    let embedder = embedder_for(&server, 3).await;
    let err = embedder.embed("calm ocean waves").await.unwrap_err();
    assert!(matches!(err, Error::EmbeddingUnavailable { .. }));
}

#[tokio::test]
async fn test_malformed_body_degrades_to_embedding_unavailable() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/embeddings")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("not json at all")
        .create_async()
        .await;

    let embedder = embedder_for(&server, 3).await;
    let err = embedder.embed("calm ocean waves").await.unwrap_err();
    assert!(matches!(err, Error::EmbeddingUnavailable { .. }));
}

#[tokio::test]
async fn test_empty_data_degrades_to_embedding_unavailable() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/embeddings")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":[]}"#)
        .create_async()
        .await;

    let embedder = embedder_for(&server, 3).await;
    let err = embedder.embed("calm ocean waves").await.unwrap_err();
    assert!(matches!(err, Error::EmbeddingUnavailable { .. }));
}

#[tokio::test]
async fn test_wrong_vector_width_degrades_to_embedding_unavailable() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/embeddings")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":[{"embedding":[0.1,0.2]}]}"#)
        .create_async()
        .await;

    // Embedder expects width 3, response carries width 2.
    let embedder = embedder_for(&server, 3).await;
    let err = embedder.embed("calm ocean waves").await.unwrap_err();
    assert!(matches!(err, Error::EmbeddingUnavailable { .. }));
}

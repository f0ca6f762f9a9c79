use super::*;
use tempfile::TempDir;

const KEY: &str = "fedcba9876543210fedcba9876543210";

fn test_image(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("test.jpg");
    std::fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn test_returns_body_verbatim() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/customvision/v2.0/Prediction/abc/image")
        .match_header("Prediction-Key", KEY)
        .match_header("content-type", "application/octet-stream")
        .match_body("raw-image-bytes")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"result":"ok"}"#)
        .create_async()
        .await;

    let request = PredictionRequest {
        prediction_key: KEY.to_string(),
        image_path: test_image(&dir, "raw-image-bytes"),
        url: format!("{}/customvision/v2.0/Prediction/abc/image", server.url()),
    };
    let body = PredictionClient::new().predict(&request).await.unwrap();

    mock.assert_async().await;
    assert_eq!(body, r#"{"result":"ok"}"#);
}

#[tokio::test]
async fn test_non_success_status_is_an_error_with_body() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/predict")
        .with_status(404)
        .with_body(r#"{"code":"NotFound"}"#)
        .create_async()
        .await;

    let request = PredictionRequest {
        prediction_key: KEY.to_string(),
        image_path: test_image(&dir, "img"),
        url: format!("{}/predict", server.url()),
    };
    let err = PredictionClient::new().predict(&request).await.unwrap_err();

    match err {
        PredictionError::Api(ApiError::Status { status, body }) => {
            assert_eq!(status, 404);
            assert_eq!(body, r#"{"code":"NotFound"}"#);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_image_fails_before_any_request() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/predict")
        .expect(0)
        .create_async()
        .await;

    let request = PredictionRequest {
        prediction_key: KEY.to_string(),
        image_path: dir.path().join("missing.jpg"),
        url: format!("{}/predict", server.url()),
    };
    let err = PredictionClient::new().predict(&request).await.unwrap_err();

    assert!(matches!(err, PredictionError::Image { .. }));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_endpoint_is_network_error() {
    let dir = TempDir::new().unwrap();
    let request = PredictionRequest {
        prediction_key: KEY.to_string(),
        image_path: test_image(&dir, "img"),
        url: "http://127.0.0.1:1/predict".to_string(),
    };
    let err = PredictionClient::new().predict(&request).await.unwrap_err();

    assert!(matches!(err, PredictionError::Api(ApiError::Network(_))));
}

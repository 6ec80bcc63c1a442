use super::*;
use httpmock::{Method::GET, Method::POST, MockServer};
use rstest::{fixture, rstest};
use serde_json::json;
use utils::time::parse_timestamp;

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

#[fixture]
fn image_file() -> ImageFile {
    ImageFile::from_bytes("street.png", PNG_MAGIC.to_vec()).unwrap()
}

fn detection_json(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "timestamp": "2024-05-01T10:20:30.5",
        "num_people": 4,
        "confidence_threshold": 0.3,
        "original_image_path": format!("uploads/{id}.png"),
        "result_image_path": format!("results/{id}.png"),
    })
}

fn client_for(server: &MockServer) -> Arc<dyn DetectionApi> {
    make_detection_client(DetectionApiConfig::new(server.url("/api"))).unwrap()
}

#[tokio::test]
#[rstest]
async fn upload_image_success(image_file: ImageFile) {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/detection/")
                .body_contains("name=\"file\"")
                .body_contains("filename=\"street.png\"")
                .body_contains("image/png")
                .body_contains("name=\"confidence_threshold\"")
                .body_contains("0.3");
            then.status(200).json_body(detection_json(11));
        })
        .await;

    let result = client_for(&server)
        .upload_image(image_file, 0.3)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(result.id, 11);
    assert_eq!(result.num_people, 4);
    assert_eq!(result.result_image_path, "results/11.png");
}

#[tokio::test]
#[rstest]
#[case(400, json!({"detail": "File must be an image"}).to_string(), "File must be an image")]
#[case(500, "Internal Server Error".to_string(), "Failed to upload image")]
#[case(422, json!({"detail": [{"msg": "field required"}]}).to_string(), "Failed to upload image")]
#[case(502, String::new(), "Failed to upload image")]
#[case(400, json!(["File must be an image"]).to_string(), "Failed to upload image")]
async fn upload_image_failure(
    image_file: ImageFile,
    #[case] status: u16,
    #[case] body: String,
    #[case] expected_message: &str,
) {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/detection/");
            then.status(status).body(body);
        })
        .await;

    let error = client_for(&server)
        .upload_image(image_file, 0.5)
        .await
        .unwrap_err();

    // Exactly one call, no retries
    assert_eq!(mock.hits_async().await, 1);
    assert_eq!(error.message(), expected_message);
}

#[tokio::test]
#[rstest]
async fn upload_image_malformed_success_body(image_file: ImageFile) {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/detection/");
            then.status(200).body("{\"id\": ");
        })
        .await;

    let error = client_for(&server)
        .upload_image(image_file, 0.5)
        .await
        .unwrap_err();
    assert_eq!(error, RequestError::new("Failed to upload image"));
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(17)]
fn history_query_string(#[case] page: u32) {
    let client = DetectionApiClient {
        client: reqwest::Client::new(),
        config: DetectionApiConfig::new("http://localhost/api"),
    };

    let request = client
        .history_request(&HistoryQuery::page(page, 10))
        .build()
        .unwrap();

    assert_eq!(request.url().path(), "/api/history/");
    assert_eq!(request.url().query(), Some(format!("page={page}&limit=10").as_str()));
}

#[test]
fn history_query_string_defaults_and_filters() {
    let client = DetectionApiClient {
        client: reqwest::Client::new(),
        config: DetectionApiConfig::new("http://localhost/api/"),
    };

    let request = client
        .history_request(&HistoryQuery::default())
        .build()
        .unwrap();
    assert_eq!(request.url().as_str(), "http://localhost/api/history/?page=1&limit=10");

    let query = HistoryQuery {
        min_people: Some(1),
        max_people: Some(5),
        ..HistoryQuery::page(2, 10)
    };
    let request = client.history_request(&query).build().unwrap();
    assert_eq!(
        request.url().query(),
        Some("page=2&limit=10&min_people=1&max_people=5")
    );

    let query = HistoryQuery {
        date_from: Some(parse_timestamp("2024-05-01T00:00:00").unwrap()),
        date_to: Some(parse_timestamp("2024-05-31T23:59:59").unwrap()),
        ..HistoryQuery::page(1, 10)
    };
    let request = client.history_request(&query).build().unwrap();
    assert_eq!(
        request.url().query(),
        Some("page=1&limit=10&date_from=2024-05-01T00%3A00%3A00&date_to=2024-05-31T23%3A59%3A59")
    );
}

#[tokio::test]
async fn detection_history_envelope() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/history/")
                .query_param("page", "3")
                .query_param("limit", "10");
            then.status(200).json_body(json!({
                "items": [detection_json(21), detection_json(22)],
                "total": 22,
                "page": 3,
                "limit": 10,
                "total_pages": 3,
            }));
        })
        .await;

    let payload = client_for(&server)
        .detection_history(HistoryQuery::page(3, 10))
        .await
        .unwrap();

    mock.assert_async().await;
    let page = payload.normalize();
    assert_eq!(page.total, 22);
    assert_eq!(page.items.len(), 2);
}

#[tokio::test]
async fn detection_history_envelope_without_total() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/history/");
            then.status(200).json_body(json!({
                "items": [detection_json(1), detection_json(2)],
                "total": null,
            }));
        })
        .await;

    let page = client_for(&server)
        .detection_history(HistoryQuery::default())
        .await
        .unwrap()
        .normalize();

    assert_eq!(page.total, 0);
    assert_eq!(page.items.len(), 2);
}

#[tokio::test]
async fn detection_history_legacy() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/history/");
            then.status(200)
                .json_body(json!([detection_json(1), detection_json(2), detection_json(3)]));
        })
        .await;

    let payload = client_for(&server)
        .detection_history(HistoryQuery::default())
        .await
        .unwrap();

    assert!(matches!(payload, HistoryPayload::Legacy(ref items) if items.len() == 3));
}

#[tokio::test]
async fn detection_history_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/history/");
            then.status(503).body("Service Unavailable");
        })
        .await;

    let error = client_for(&server)
        .detection_history(HistoryQuery::default())
        .await
        .unwrap_err();
    assert_eq!(error.message(), "Failed to fetch detection history");
}

#[tokio::test]
async fn detection_by_id() {
    let server = MockServer::start_async().await;
    let found = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/history/5");
            then.status(200).json_body(detection_json(5));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/history/6");
            then.status(404)
                .json_body(json!({"detail": "Detection not found"}));
        })
        .await;

    let client = client_for(&server);

    let result = client.detection_by_id(5).await.unwrap();
    found.assert_async().await;
    assert_eq!(result.id, 5);

    let error = client.detection_by_id(6).await.unwrap_err();
    assert_eq!(error.message(), "Detection not found");
}

#[tokio::test]
async fn test_call() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/");
            then.status(200).json_body(json!({
                "message": "Person Detection API is running",
                "environment": "development",
            }));
        })
        .await;

    let status = client_for(&server).test_call().await.unwrap();
    assert_eq!(status.message, "Person Detection API is running");
    assert_eq!(status.environment.as_deref(), Some("development"));
}

#[tokio::test]
async fn unreachable_service() {
    // Nothing listens on port 9 (discard) on a test machine
    let config = DetectionApiConfig {
        request_timeout: Some(std::time::Duration::from_secs(2)),
        ..DetectionApiConfig::new("http://127.0.0.1:9/api")
    };
    let client = make_detection_client(config).unwrap();

    let error = client.test_call().await.unwrap_err();
    assert_eq!(error.message(), "Failed to reach detection service");

    let error = client.detection_by_id(1).await.unwrap_err();
    assert_eq!(error.message(), "Failed to fetch detection");
}

#[test]
fn invalid_proxy_is_rejected() {
    let config = DetectionApiConfig {
        api_proxy: Some("not a proxy".to_string()),
        ..DetectionApiConfig::new("http://localhost/api")
    };
    assert!(make_detection_client(config).is_err());
}

#[tokio::test]
#[ignore = "If you want to run this, start the detection service locally then run it"]
async fn live_service() {
    let client = make_detection_client(DetectionApiConfig::new("http://localhost/api")).unwrap();
    println!("Status: {:?}", client.test_call().await.unwrap());
    println!(
        "History: {:?}",
        client
            .detection_history(HistoryQuery::default())
            .await
            .unwrap()
            .normalize()
    );
}

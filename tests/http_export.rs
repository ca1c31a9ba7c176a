//! End-to-end export against a mock Bugsnag API.

use bugsnag2csv::{
    events_path, export_csv, fetch_all, find_project, AppError, ApiToken, BugsnagHttpClient,
    Credentials, SchemaPolicy, TimeWindow,
};
use serde_json::json;
use std::num::NonZeroUsize;
use url::Url;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> BugsnagHttpClient {
    let credentials = Credentials::Token(ApiToken::new("integration-token").unwrap());
    BugsnagHttpClient::with_base_url(Url::parse(&server.uri()).unwrap(), credentials).unwrap()
}

async fn mount_directory(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "acc1", "name": "Acme"}
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/accounts/acc1/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "proj1", "name": "storefront"}
        ])))
        .mount(server)
        .await;
}

async fn mount_first_events_page(server: &MockServer) {
    let next = format!(
        "<{}/projects/proj1/events?offset=2&per_page=100>; rel=\"next\"",
        server.uri()
    );
    Mock::given(method("GET"))
        .and(path("/projects/proj1/events"))
        .and(query_param("per_page", "100"))
        .and(query_param_is_missing("offset"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([
                    {"id": "e1", "error": {"class": "TypeError"}, "severity": "error"},
                    {"id": "e2", "error": {"class": "RangeError"}}
                ]))
                .insert_header("link", next.as_str()),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn exports_every_page_of_a_named_project() {
    let server = MockServer::start().await;
    mount_directory(&server).await;
    mount_first_events_page(&server).await;

    Mock::given(method("GET"))
        .and(path("/projects/proj1/events"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "e3", "error": {"class": "TypeError"}, "severity": "info", "unhandled": false}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let project = find_project(&client, "Acme", "storefront").await.unwrap();
    assert_eq!(project, "proj1");

    let fetched = fetch_all(&client, &events_path(&project, &TimeWindow::default()), None)
        .await
        .unwrap();
    assert_eq!(fetched.pages_fetched, 2);

    let csv = export_csv(&fetched.records, SchemaPolicy::Frequency).unwrap();
    assert_eq!(
        csv,
        concat!(
            "id,error.class,severity,unhandled\n",
            "e1,TypeError,error,\n",
            "e2,RangeError,,\n",
            "e3,TypeError,info,false\n",
        )
    );
}

#[tokio::test]
async fn limit_stops_before_the_next_page() {
    let server = MockServer::start().await;
    mount_first_events_page(&server).await;

    let client = client_for(&server);
    let fetched = fetch_all(
        &client,
        &events_path("proj1", &TimeWindow::default()),
        NonZeroUsize::new(1),
    )
    .await
    .unwrap();

    assert_eq!(fetched.records.len(), 1);
    assert_eq!(fetched.records[0]["id"], "e1");
    // expect(1) on the first page and no mock for offset=2 verify the walk stopped
}

#[tokio::test]
async fn failing_page_aborts_with_progress_counts() {
    let server = MockServer::start().await;
    mount_first_events_page(&server).await;

    Mock::given(method("GET"))
        .and(path("/projects/proj1/events"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = fetch_all(&client, &events_path("proj1", &TimeWindow::default()), None)
        .await
        .unwrap_err();

    match err {
        AppError::PageFetchFailed {
            uri,
            pages_fetched,
            records_fetched,
            source,
        } => {
            assert_eq!(uri, "/projects/proj1/events?offset=2&per_page=100");
            assert_eq!(pages_fetched, 1);
            assert_eq!(records_fetched, 2);
            assert!(matches!(*source, AppError::ServiceStatus { status: 503, .. }));
        }
        other => panic!("expected PageFetchFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn unknown_project_is_an_error() {
    let server = MockServer::start().await;
    mount_directory(&server).await;

    let client = client_for(&server);
    let err = find_project(&client, "Acme", "missing").await.unwrap_err();
    assert!(matches!(err, AppError::ProjectNotFound { .. }));
}

use paperdigest_core::JobStatus;
use paperdigest_engine::{ApiSettings, FailureKind, JobStore, Page, ReqwestJobStore};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_for(server: &MockServer) -> ReqwestJobStore {
    ReqwestJobStore::new(ApiSettings {
        base_url: server.uri(),
        ..ApiSettings::default()
    })
    .expect("store")
}

#[tokio::test]
async fn get_returns_status_and_progress() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/jobs/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "processing",
            "progress": 45,
            "error_message": null,
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:05Z"
        })))
        .mount(&server)
        .await;

    let job = store_for(&server).get("abc").await.expect("get ok");
    assert_eq!(job.id.as_deref(), Some("abc"));
    assert_eq!(job.status.as_deref(), Some("processing"));
    assert_eq!(job.progress, Some(45));
    assert_eq!(job.error_message, None);
}

#[tokio::test]
async fn get_carries_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/jobs/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "progress": 30,
            "error_message": "Could not extract text"
        })))
        .mount(&server)
        .await;

    let job = store_for(&server).get("abc").await.expect("get ok");
    assert_eq!(job.error_message.as_deref(), Some("Could not extract text"));
}

#[tokio::test]
async fn get_missing_job_reports_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/jobs/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "JOB_NOT_FOUND",
            "message": "Job not found"
        })))
        .mount(&server)
        .await;

    let err = store_for(&server).get("nope").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
    assert_eq!(err.message, "Job not found");
}

#[tokio::test]
async fn list_sends_paging_and_summarizes_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/jobs"))
        .and(query_param("offset", "20"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "a", "source_type": "pdf", "status": "done", "progress": 100,
             "created_at": "2026-01-01T00:00:00Z", "updated_at": "2026-01-01T00:01:00Z"},
            {"id": "b", "source_type": "url", "status": "processing", "progress": 60}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let jobs = store_for(&server)
        .list(Page::new(20, 500))
        .await
        .expect("list ok");
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].id.as_deref(), Some("a"));
    assert_eq!(jobs[0].status, JobStatus::Done);
    assert_eq!(jobs[0].source_type.as_deref(), Some("pdf"));
    assert_eq!(jobs[0].updated_at.as_deref(), Some("2026-01-01T00:01:00Z"));
    assert_eq!(jobs[1].status, JobStatus::Processing);
    assert_eq!(jobs[1].progress, Some(60));
    assert_eq!(jobs[1].created_at, None);
}

#[tokio::test]
async fn list_rejects_non_list_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    let err = store_for(&server).list(Page::default()).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn delete_accepts_empty_success() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/jobs/abc"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    store_for(&server).delete("abc").await.expect("delete ok");
}

#[test]
fn page_limit_is_clamped() {
    assert_eq!(Page::new(0, 0).limit, 1);
    assert_eq!(Page::new(0, 250).limit, 100);
    assert_eq!(Page::default(), Page::new(0, 100));
}

//! Tests for application workflow HTTP handlers.

use super::*;
use crate::domain::ports::{BulkTransitionResponse, ConfirmApplicationResponse};
use crate::domain::{ApplicationStatus, CollegeId, JobId, Role, UserId};
use crate::inbound::http::test_utils::{MockPorts, as_college_admin, as_student};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::{TimeZone, Utc};
use pagination::PageRequest;
use rstest::rstest;
use serde_json::{Value, json};

fn app(
    ports: MockPorts,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(ports.into_state()))
        .service(
            web::scope("/api/v1")
                .service(confirm_application)
                .service(bulk_update_status)
                .service(list_applications)
                .service(get_application),
        )
}

fn sample_application(id: i64) -> Application {
    let at = Utc
        .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    Application {
        id: ApplicationId::new(id).expect("valid id"),
        job_id: JobId::new(7).expect("valid id"),
        student_id: UserId::new(100).expect("valid id"),
        college_id: CollegeId::new(10).expect("valid id"),
        status: ApplicationStatus::Applied,
        resume_snapshot_url: "https://cdn.example/resume.pdf".to_owned(),
        created_at: at,
        updated_at: at,
    }
}

#[actix_web::test]
async fn confirm_returns_new_application() {
    let mut ports = MockPorts::default();
    ports
        .confirmations
        .expect_confirm()
        .withf(|principal, intent| {
            principal.user_id().get() == 100
                && principal.role() == Role::Student
                && intent.get() == 55
        })
        .times(1)
        .return_once(|_, _| {
            Ok(ConfirmApplicationResponse {
                application_id: ApplicationId::new(9).expect("valid id"),
                status: ApplicationStatus::Applied,
                message: "Application submitted".to_owned(),
            })
        });
    let app = actix_test::init_service(app(ports)).await;

    let req = as_student(
        actix_test::TestRequest::post().uri("/api/v1/applications/55/confirm"),
        100,
        10,
    )
    .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["application_id"], json!(9));
    assert_eq!(body["status"], json!("APPLIED"));
}

#[actix_web::test]
async fn confirm_of_expired_intent_is_gone() {
    let mut ports = MockPorts::default();
    ports
        .confirmations
        .expect_confirm()
        .return_once(|_, _| Err(Error::expired("intent has expired")));
    let app = actix_test::init_service(app(ports)).await;

    let req = as_student(
        actix_test::TestRequest::post().uri("/api/v1/applications/55/confirm"),
        100,
        10,
    )
    .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::GONE);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], json!("expired"));
}

#[actix_web::test]
async fn confirm_rejects_non_positive_intent_id_before_the_service() {
    let app = actix_test::init_service(app(MockPorts::default())).await;

    let req = as_student(
        actix_test::TestRequest::post().uri("/api/v1/applications/0/confirm"),
        100,
        10,
    )
    .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn confirm_without_identity_is_unauthorized() {
    let app = actix_test::init_service(app(MockPorts::default())).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/applications/55/confirm")
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn bulk_update_forwards_request_body() {
    let mut ports = MockPorts::default();
    ports
        .bulk_transitions
        .expect_bulk_update()
        .withf(|principal, request| {
            principal.role() == Role::CollegeAdmin
                && request.new_status == ApplicationStatus::Shortlisted
                && request
                    .application_ids
                    .iter()
                    .map(|id| id.get())
                    .eq([1, 2, 3])
        })
        .times(1)
        .return_once(|_, request| {
            Ok(BulkTransitionResponse {
                updated_count: 3,
                new_status: request.new_status,
            })
        });
    let app = actix_test::init_service(app(ports)).await;

    let req = as_college_admin(
        actix_test::TestRequest::patch().uri("/api/v1/applications/status/bulk"),
        5,
        10,
    )
    .set_json(json!({"application_ids": [1, 2, 3], "new_status": "SHORTLISTED"}))
    .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body, json!({"updated_count": 3, "new_status": "SHORTLISTED"}));
}

#[rstest]
#[case(Error::forbidden("not your college"), StatusCode::FORBIDDEN)]
#[case(Error::invalid_transition("illegal"), StatusCode::UNPROCESSABLE_ENTITY)]
#[case(Error::invalid_request("empty batch"), StatusCode::BAD_REQUEST)]
#[case(Error::service_unavailable("timed out"), StatusCode::SERVICE_UNAVAILABLE)]
#[actix_web::test]
async fn bulk_update_maps_domain_failures(#[case] error: Error, #[case] status: StatusCode) {
    let mut ports = MockPorts::default();
    ports
        .bulk_transitions
        .expect_bulk_update()
        .return_once(move |_, _| Err(error));
    let app = actix_test::init_service(app(ports)).await;

    let req = as_college_admin(
        actix_test::TestRequest::patch().uri("/api/v1/applications/status/bulk"),
        5,
        10,
    )
    .set_json(json!({"application_ids": [1], "new_status": "OFFERED"}))
    .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), status);
}

#[actix_web::test]
async fn list_passes_query_string_through() {
    let mut ports = MockPorts::default();
    ports
        .applications
        .expect_list()
        .withf(|_, request| {
            *request
                == ListingRequest {
                    page: Some(2),
                    limit: Some(5),
                    status: Some("APPLIED".to_owned()),
                    job_id: Some(7),
                    job_domain: None,
                    job_type: Some("FTE".to_owned()),
                    search: Some("asha".to_owned()),
                    sort_by: Some("status".to_owned()),
                    sort_dir: Some("asc".to_owned()),
                }
        })
        .times(1)
        .return_once(|_, _| {
            let page = PageRequest::new(Some(2), Some(5)).expect("valid page");
            Ok(Paginated::new(vec![sample_application(11)], page, 6))
        });
    let app = actix_test::init_service(app(ports)).await;

    let req = as_college_admin(
        actix_test::TestRequest::get().uri(
            "/api/v1/applications?page=2&limit=5&status=APPLIED&job_id=7&job_type=FTE\
             &search=asha&sort_by=status&sort_dir=asc",
        ),
        5,
        10,
    )
    .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["meta"], json!({"page": 2, "limit": 5, "total": 6}));
    assert_eq!(body["data"][0]["id"], json!(11));
}

#[actix_web::test]
async fn list_with_malformed_page_is_bad_request() {
    let app = actix_test::init_service(app(MockPorts::default())).await;

    let req = as_student(
        actix_test::TestRequest::get().uri("/api/v1/applications?page=abc"),
        100,
        10,
    )
    .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn get_returns_application() {
    let mut ports = MockPorts::default();
    ports
        .applications
        .expect_get()
        .withf(|_, id| id.get() == 11)
        .return_once(|_, _| Ok(sample_application(11)));
    let app = actix_test::init_service(app(ports)).await;

    let req = as_student(
        actix_test::TestRequest::get().uri("/api/v1/applications/11"),
        100,
        10,
    )
    .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["status"], json!("APPLIED"));
    assert_eq!(body["student_id"], json!(100));
}

#[actix_web::test]
async fn get_outside_scope_is_not_found() {
    let mut ports = MockPorts::default();
    ports
        .applications
        .expect_get()
        .return_once(|_, _| Err(Error::not_found("application not found")));
    let app = actix_test::init_service(app(ports)).await;

    let req = as_student(
        actix_test::TestRequest::get().uri("/api/v1/applications/12"),
        101,
        10,
    )
    .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

//! The REST surface wired onto real services over the in-memory store.

mod support;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use career_portal::Trace;
use career_portal::domain::{ApplicationStatus, TRACE_ID_HEADER};
use career_portal::inbound::http::applications::{
    bulk_update_status, confirm_application, get_application, list_applications,
};
use career_portal::inbound::http::jobs::apply_to_job;
use career_portal::inbound::http::notifications::{list_notifications, mark_notification_read};
use career_portal::inbound::http::principal::{COLLEGE_ID_HEADER, ROLE_HEADER, USER_ID_HEADER};
use rstest::rstest;
use serde_json::{Value, json};
use support::{HOME_COLLEGE, Harness, harness};

async fn init(
    harness: &Harness,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    actix_test::init_service(
        App::new()
            .app_data(web::Data::new(harness.http_state()))
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .service(apply_to_job)
                    .service(confirm_application)
                    .service(bulk_update_status)
                    .service(list_applications)
                    .service(get_application)
                    .service(list_notifications)
                    .service(mark_notification_read),
            ),
    )
    .await
}

fn identify(
    req: actix_test::TestRequest,
    user: i64,
    role: &'static str,
) -> actix_test::TestRequest {
    req.insert_header((USER_ID_HEADER, user.to_string()))
        .insert_header((ROLE_HEADER, role))
        .insert_header((COLLEGE_ID_HEADER, HOME_COLLEGE.to_string()))
}

#[rstest]
#[actix_web::test]
async fn student_applies_and_admin_shortlists(harness: Harness) {
    let app = init(&harness).await;

    let reserve = identify(
        actix_test::TestRequest::post().uri("/api/v1/jobs/1/apply"),
        100,
        "student",
    )
    .to_request();
    let reserved: Value = actix_test::call_and_read_body_json(&app, reserve).await;
    let intent_id = reserved["intent_id"].as_i64().expect("intent id");
    assert_eq!(reserved["redirect_url"], json!("https://forms.example.test/jobs/1"));

    let confirm = identify(
        actix_test::TestRequest::post().uri(&format!("/api/v1/applications/{intent_id}/confirm")),
        100,
        "student",
    )
    .to_request();
    let confirmed: Value = actix_test::call_and_read_body_json(&app, confirm).await;
    assert_eq!(confirmed["status"], json!("APPLIED"));
    let application_id = confirmed["application_id"].as_i64().expect("application id");

    let bulk = identify(
        actix_test::TestRequest::patch().uri("/api/v1/applications/status/bulk"),
        5,
        "college_admin",
    )
    .set_json(json!({"application_ids": [application_id], "new_status": "SHORTLISTED"}))
    .to_request();
    let updated: Value = actix_test::call_and_read_body_json(&app, bulk).await;
    assert_eq!(updated, json!({"updated_count": 1, "new_status": "SHORTLISTED"}));

    let listing = identify(
        actix_test::TestRequest::get().uri("/api/v1/applications?status=SHORTLISTED"),
        100,
        "student",
    )
    .to_request();
    let page: Value = actix_test::call_and_read_body_json(&app, listing).await;
    assert_eq!(page["meta"]["total"], json!(1));
    assert_eq!(page["data"][0]["id"], json!(application_id));

    let inbox = identify(
        actix_test::TestRequest::get().uri("/api/v1/notifications"),
        100,
        "student",
    )
    .to_request();
    let notifications: Value = actix_test::call_and_read_body_json(&app, inbox).await;
    let kinds: Vec<&str> = notifications["data"]
        .as_array()
        .expect("data array")
        .iter()
        .filter_map(|n| n["type"].as_str())
        .collect();
    assert_eq!(
        kinds,
        vec!["APPLICATION_STATUS_UPDATE", "JOB_APPLIED", "JOB_APPLY_INTENT"]
    );
}

#[rstest]
#[actix_web::test]
async fn second_application_to_the_same_job_conflicts(harness: Harness) {
    harness.seed_application(1, 100, ApplicationStatus::Applied);
    let app = init(&harness).await;

    let req = identify(
        actix_test::TestRequest::post().uri("/api/v1/jobs/1/apply"),
        100,
        "student",
    )
    .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::CONFLICT);
    let trace_header = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], json!("conflict"));
    assert_eq!(body["traceId"], json!(trace_header));
}

#[rstest]
#[actix_web::test]
async fn students_cannot_bulk_update(harness: Harness) {
    let id = harness.seed_application(1, 100, ApplicationStatus::Applied);
    let app = init(&harness).await;

    let req = identify(
        actix_test::TestRequest::patch().uri("/api/v1/applications/status/bulk"),
        100,
        "student",
    )
    .set_json(json!({"application_ids": [id.get()], "new_status": "SHORTLISTED"}))
    .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        harness.portal.applications()[0].status,
        ApplicationStatus::Applied
    );
}

#[rstest]
#[actix_web::test]
async fn missing_identity_is_rejected(harness: Harness) {
    let app = init(&harness).await;

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/applications")
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

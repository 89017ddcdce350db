//! API client and voting booth against an in-process stub of the voting
//! backend.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use idol_voting::api::{admin, auth, contestants, vote, voting_lines};
use idol_voting::booth::fetch_booth;
use idol_voting::error::ApiError;
use idol_voting::flight::SingleFlight;
use idol_voting::login::Identifier;
use idol_voting::models::{Gender, NewContestant, NewVotingLine};
use idol_voting::route::Route;
use idol_voting::session::{SessionContext, SessionKind};
use idol_voting::storage::{MemoryTokenStore, TokenStore};
use reqwest::Client;
use serde_json::{json, Value};

const GOOD_TOKEN: &str = "good";

type Seen = Arc<Mutex<Vec<Value>>>;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client() -> Client {
    Client::builder().no_proxy().build().unwrap()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", GOOD_TOKEN))
        .unwrap_or(false)
}

async fn vote_state(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({
        "contestants": [
            {"id": 1, "name": "Asha", "age": 21, "gender": "Female", "details": "Soprano", "image_url": null,
             "created_at": "2025-01-01T00:00:00"},
            {"id": 2, "name": "Ravi", "details": null, "image_url": "images/ravi.png"}
        ],
        "voting_line": {
            "id": 7, "name": "Grand Finale", "max_votes_per_user": 5,
            "start_time": "2025-03-01T18:00:00", "end_time": "2025-03-01T22:00:00",
            "is_active": true
        },
        "user_total_votes": 2
    }))
    .into_response()
}

async fn submit(State(seen): State<Seen>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    seen.lock().unwrap().push(body);
    Json(json!({"status": "success", "message": "Votes submitted successfully."})).into_response()
}

fn voter_router(seen: Seen) -> Router {
    Router::new()
        .route("/api/vote/state", get(vote_state))
        .route("/api/vote/submit", post(submit))
        .route(
            "/api/vote/history",
            get(|headers: HeaderMap| async move {
                if !authorized(&headers) {
                    return StatusCode::UNAUTHORIZED.into_response();
                }
                Json(json!({"history": [
                    {"voting_line_name": "Week 2", "voting_line_dates": "Mar 8 - Mar 9",
                     "contestant_name": "Ravi", "vote_count": 3, "voted_at": "2025-03-08T19:00:00"},
                    {"voting_line_name": "Week 1", "voting_line_dates": "Mar 1 - Mar 2",
                     "contestant_name": "Asha", "vote_count": 10, "voted_at": "2025-03-01T19:00:00"}
                ]}))
                .into_response()
            }),
        )
        .with_state(seen)
}

fn voter_session(token: &str) -> (SessionContext, Arc<dyn TokenStore>) {
    let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    let mut session = SessionContext::restore(SessionKind::Voter, Arc::clone(&store));
    session.authenticate(token.to_owned());
    (session, store)
}

#[tokio::test]
async fn loads_booth_with_server_quota() {
    let base = serve(voter_router(Seen::default())).await;
    let booth = fetch_booth(&client(), &base, GOOD_TOKEN).await.unwrap();

    assert_eq!(booth.line().name, "Grand Finale");
    assert_eq!(booth.contestants().len(), 2);
    assert_eq!(booth.tracker().confirmed(), 2);
    assert_eq!(booth.remaining(), 3);
}

#[tokio::test]
async fn rejected_token_ends_session_and_redirects() {
    let base = serve(voter_router(Seen::default())).await;
    let (mut voter, store) = voter_session("stale");
    let admin = SessionContext::restore(SessionKind::Admin, Arc::clone(&store));

    let token = voter.token().unwrap().to_owned();
    let result = voter.guard(fetch_booth(&client(), &base, &token).await);

    assert!(matches!(result, Err(ApiError::Unauthorized)));
    assert!(!voter.is_authenticated());
    assert_eq!(store.load(SessionKind::Voter), None);
    assert_eq!(Route::Voting.resolve(&voter, &admin), Route::Login);
}

#[tokio::test]
async fn closed_voting_and_server_errors_are_distinct() {
    let closed = serve(Router::new().route(
        "/api/vote/state",
        get(|| async { (StatusCode::NOT_FOUND, Json(json!({"detail": "Voting is currently closed."}))) }),
    ))
    .await;
    let broken = serve(Router::new().route(
        "/api/vote/state",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    ))
    .await;
    let client = client();

    assert!(matches!(
        vote::get_vote_state(&client, &closed, GOOD_TOKEN).await,
        Err(ApiError::NotAvailable)
    ));
    assert!(matches!(
        vote::get_vote_state(&client, &broken, GOOD_TOKEN).await,
        Err(ApiError::Status(StatusCode::INTERNAL_SERVER_ERROR))
    ));
}

#[tokio::test]
async fn successful_submission_confirms_pending_votes() {
    let seen = Seen::default();
    let base = serve(voter_router(Arc::clone(&seen))).await;
    let client = client();
    let (mut voter, _) = voter_session(GOOD_TOKEN);
    let flights = SingleFlight::new();

    let mut booth = fetch_booth(&client, &base, GOOD_TOKEN).await.unwrap();
    booth.vote(1);
    booth.vote(1);
    booth.vote(2);
    assert!(!booth.vote(2), "quota of 5 with 2 confirmed allows 3 more");

    let submission = booth.begin_submission(&voter, &flights).unwrap();
    let outcome = submission.send(&client, &base).await;
    let count = booth.finish_submission(&mut voter, outcome).unwrap();

    assert_eq!(count, 3);
    assert_eq!(booth.tracker().total_pending(), 0);
    assert_eq!(booth.tracker().confirmed(), 5);
    assert_eq!(booth.remaining(), 0);

    let bodies = seen.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0], json!({"votes": {"1": 2, "2": 1}}));
}

#[tokio::test]
async fn failed_submission_keeps_votes_for_retry() {
    let base = serve(Router::new().route(
        "/api/vote/submit",
        post(|| async { (StatusCode::BAD_REQUEST, Json(json!({"detail": "Vote limit exceeded."}))) }),
    ))
    .await;
    let client = client();
    let (mut voter, _) = voter_session(GOOD_TOKEN);
    let flights = SingleFlight::new();

    let mut booth = idol_voting::booth::VotingBooth::from_state(
        serde_json::from_value(json!({
            "contestants": [{"id": 1, "name": "Asha"}],
            "voting_line": {"id": 1, "name": "Week 1", "max_votes_per_user": 50},
            "user_total_votes": 0
        }))
        .unwrap(),
    );
    booth.vote(1);
    booth.vote(1);
    let before = booth.tracker().pending();

    let submission = booth.begin_submission(&voter, &flights).unwrap();
    let outcome = submission.send(&client, &base).await;
    let result = booth.finish_submission(&mut voter, outcome);

    assert!(matches!(result, Err(ApiError::SubmissionFailed)));
    assert_eq!(booth.tracker().pending(), before);
    assert_eq!(booth.tracker().confirmed(), 0);
    assert!(voter.is_authenticated());
    assert!(booth.can_submit());
}

#[tokio::test]
async fn unauthorized_submission_is_not_a_generic_failure() {
    let base = serve(voter_router(Seen::default())).await;
    let client = client();
    let mut votes = std::collections::HashMap::new();
    votes.insert(1, 1);

    let result = vote::submit_votes(&client, &base, "stale", &votes).await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));
}

#[tokio::test]
async fn unreachable_server_fails_submission() {
    let client = client();
    let mut votes = std::collections::HashMap::new();
    votes.insert(1, 1);

    let result = vote::submit_votes(&client, "http://127.0.0.1:1", GOOD_TOKEN, &votes).await;
    assert!(matches!(result, Err(ApiError::SubmissionFailed)));
}

#[tokio::test]
async fn history_preserves_server_order() {
    let base = serve(voter_router(Seen::default())).await;
    let history = vote::get_vote_history(&client(), &base, GOOD_TOKEN)
        .await
        .unwrap();

    let names: Vec<_> = history.iter().map(|h| h.voting_line_name.as_str()).collect();
    assert_eq!(names, ["Week 2", "Week 1"]);
    assert_eq!(history[1].vote_count, 10);
}

#[tokio::test]
async fn otp_requests_use_identifier_field() {
    let seen = Seen::default();
    let router = Router::new()
        .route(
            "/api/auth/send-otp",
            post(|State(seen): State<Seen>, Json(body): Json<Value>| async move {
                seen.lock().unwrap().push(body);
                Json(json!({"status": "success", "message": "OTP sent successfully."}))
            }),
        )
        .route(
            "/api/auth/verify-otp",
            post(|State(seen): State<Seen>, Json(body): Json<Value>| async move {
                let ok = body["otp_code"] == "123456";
                seen.lock().unwrap().push(body);
                if ok {
                    Json(json!({"access_token": "issued", "token_type": "bearer"})).into_response()
                } else {
                    (StatusCode::BAD_REQUEST, Json(json!({"detail": "Invalid or expired OTP."})))
                        .into_response()
                }
            }),
        )
        .with_state(Arc::clone(&seen));
    let base = serve(router).await;
    let client = client();

    let mobile = Identifier::Mobile("1234567890".to_owned());
    auth::send_otp(&client, &base, &mobile).await.unwrap();
    let token = auth::verify_otp(&client, &base, &mobile, "123456").await.unwrap();
    assert_eq!(token, "issued");

    let email = Identifier::Email("a@b.com".to_owned());
    let rejected = auth::verify_otp(&client, &base, &email, "000000").await;
    assert!(matches!(rejected, Err(ApiError::Status(StatusCode::BAD_REQUEST))));

    let bodies = seen.lock().unwrap();
    assert_eq!(bodies[0], json!({"mobile_number": "1234567890"}));
    assert_eq!(
        bodies[1],
        json!({"mobile_number": "1234567890", "otp_code": "123456"})
    );
    assert_eq!(bodies[2], json!({"email": "a@b.com", "otp_code": "000000"}));
}

fn admin_router(seen: Seen) -> Router {
    Router::new()
        .route(
            "/api/admin/login",
            post(|Json(body): Json<Value>| async move {
                if body["username"] == "admin" && body["password"] == "secret" {
                    Json(json!({"access_token": GOOD_TOKEN, "token_type": "bearer"})).into_response()
                } else {
                    StatusCode::UNAUTHORIZED.into_response()
                }
            }),
        )
        .route(
            "/api/contestants",
            get(|| async { Json(json!([{"id": 1, "name": "Asha", "age": 21, "gender": "Female"}])) }),
        )
        .route(
            "/api/admin/contestants",
            post(|headers: HeaderMap| async move {
                if !authorized(&headers) {
                    return StatusCode::UNAUTHORIZED.into_response();
                }
                let multipart = headers
                    .get("content-type")
                    .and_then(|v| v.to_str().ok())
                    .map(|v| v.starts_with("multipart/form-data"))
                    .unwrap_or(false);
                if !multipart {
                    return StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response();
                }
                (
                    StatusCode::CREATED,
                    Json(json!({"id": 9, "name": "Meera", "age": 19, "gender": "Female",
                                "details": "", "image_url": "images/meera.png"})),
                )
                    .into_response()
            }),
        )
        .route(
            "/api/admin/voting-lines",
            get(|headers: HeaderMap| async move {
                if !authorized(&headers) {
                    return StatusCode::UNAUTHORIZED.into_response();
                }
                Json(json!([{
                    "id": 3, "name": "Week 1", "max_votes_per_user": 50,
                    "start_time": "2025-03-01T18:00:00", "end_time": "2025-03-02T18:00:00",
                    "is_active": false,
                    "contestants": [{"id": 1, "name": "Asha"}]
                }]))
                .into_response()
            })
            .post(
                |State(seen): State<Seen>, headers: HeaderMap, Json(body): Json<Value>| async move {
                    if !authorized(&headers) {
                        return StatusCode::UNAUTHORIZED.into_response();
                    }
                    let reply = json!({
                        "id": 4, "name": body["name"], "max_votes_per_user": body["max_votes_per_user"],
                        "start_time": body["start_time"], "end_time": body["end_time"],
                        "is_active": false, "contestants": []
                    });
                    seen.lock().unwrap().push(body);
                    (StatusCode::CREATED, Json(reply)).into_response()
                },
            ),
        )
        .route(
            "/api/admin/voting-lines/{id}/{action}",
            patch(
                |State(seen): State<Seen>, Path((id, action)): Path<(i64, String)>| async move {
                    seen.lock().unwrap().push(json!({"id": id, "action": action}));
                    Json(json!({"id": id, "name": "Week 1", "max_votes_per_user": 50,
                                "is_active": action == "activate"}))
                },
            ),
        )
        .route(
            "/api/admin/dashboard-stats/{line_id}",
            get(|Path(line_id): Path<i64>| async move {
                Json(json!({
                    "voting_line_name": format!("Line {}", line_id),
                    "stats": [
                        {"contestant_id": 1, "contestant_name": "Asha", "total_votes": 120},
                        {"contestant_id": 2, "contestant_name": "Ravi", "total_votes": 80}
                    ]
                }))
            }),
        )
        .with_state(seen)
}

#[tokio::test]
async fn admin_login_and_listing() {
    let base = serve(admin_router(Seen::default())).await;
    let client = client();

    let token = auth::admin_login(&client, &base, "admin", "secret").await.unwrap();
    assert_eq!(token, GOOD_TOKEN);
    assert!(matches!(
        auth::admin_login(&client, &base, "admin", "wrong").await,
        Err(ApiError::Unauthorized)
    ));

    let lines = voting_lines::list_voting_lines(&client, &base, &token).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].contestants[0].name, "Asha");
    assert!(!lines[0].is_active);

    let everyone = contestants::list_contestants(&client, &base).await.unwrap();
    assert_eq!(everyone[0].gender.as_deref(), Some("Female"));
}

#[tokio::test]
async fn admin_mutations_hit_the_right_endpoints() {
    let seen = Seen::default();
    let base = serve(admin_router(Arc::clone(&seen))).await;
    let client = client();

    let line = NewVotingLine {
        name: "Week 2".to_owned(),
        start_time: "2025-03-08T12:30:00Z".parse().unwrap(),
        end_time: "2025-03-09T12:30:00Z".parse().unwrap(),
        max_votes_per_user: 25,
        contestant_ids: vec![1, 2],
    };
    let created = voting_lines::create_voting_line(&client, &base, GOOD_TOKEN, &line)
        .await
        .unwrap();
    assert_eq!(created.name, "Week 2");
    assert_eq!(created.max_votes_per_user, 25);

    voting_lines::set_voting_line_active(&client, &base, GOOD_TOKEN, 4, true)
        .await
        .unwrap();
    voting_lines::set_voting_line_active(&client, &base, GOOD_TOKEN, 4, false)
        .await
        .unwrap();

    let contestant = contestants::create_contestant(
        &client,
        &base,
        GOOD_TOKEN,
        NewContestant {
            name: "Meera".to_owned(),
            age: 19,
            gender: Gender::Female,
            details: String::new(),
            image: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(contestant.id, 9);

    let stats = admin::get_dashboard_stats(&client, &base, GOOD_TOKEN, 3)
        .await
        .unwrap();
    assert_eq!(stats.voting_line_name, "Line 3");
    assert_eq!(stats.peak(), 120);

    let bodies = seen.lock().unwrap();
    assert_eq!(bodies[0]["contestant_ids"], json!([1, 2]));
    assert_eq!(bodies[0]["start_time"], json!("2025-03-08T12:30:00Z"));
    assert_eq!(bodies[1], json!({"id": 4, "action": "activate"}));
    assert_eq!(bodies[2], json!({"id": 4, "action": "deactivate"}));
}

#[tokio::test]
async fn admin_calls_with_stale_token_are_unauthorized() {
    let base = serve(admin_router(Seen::default())).await;
    let client = client();
    let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    let mut admin_session = SessionContext::restore(SessionKind::Admin, Arc::clone(&store));
    admin_session.authenticate("stale".to_owned());
    let voter = SessionContext::restore(SessionKind::Voter, store);

    let token = admin_session.token().unwrap().to_owned();
    let result = admin_session.guard(voting_lines::list_voting_lines(&client, &base, &token).await);

    assert!(matches!(result, Err(ApiError::Unauthorized)));
    assert_eq!(
        Route::AdminVotingLines.resolve(&voter, &admin_session),
        Route::AdminLogin
    );
}

#[tokio::test]
async fn missing_voting_line_is_not_reported_as_closed_voting() {
    let base = serve(Router::new().route(
        "/api/admin/dashboard-stats/{line_id}",
        get(|| async { (StatusCode::NOT_FOUND, Json(json!({"detail": "Voting line not found"}))) }),
    ))
    .await;
    let client = client();

    let result = admin::get_dashboard_stats(&client, &base, GOOD_TOKEN, 99).await;
    assert!(matches!(
        result,
        Err(ApiError::Status(StatusCode::NOT_FOUND))
    ));
}

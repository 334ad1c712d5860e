//! End-to-end flow over the match lifecycle routes.

mod common;

use axum::http::StatusCode;
use pitchconnect_back::auth::RoleTag;
use serde_json::json;
use time::{Duration, OffsetDateTime, format_description::well_known::Rfc3339};

use common::{create_test_user, request, setup_app};

fn kickoff_minutes_ago(minutes: i64) -> String {
    (OffsetDateTime::now_utc() - Duration::minutes(minutes))
        .format(&Rfc3339)
        .expect("format kickoff")
}

fn friendly_match_payload(kickoff: &str) -> serde_json::Value {
    json!({
        "sport": "FOOTBALL",
        "kickoff": kickoff,
        "home_team_id": uuid::Uuid::new_v4(),
        "away_team_id": uuid::Uuid::new_v4(),
        "friendly": true
    })
}

#[tokio::test]
async fn scheduling_requires_authentication_and_permission() {
    let (state, app) = setup_app();
    let payload = friendly_match_payload(&kickoff_minutes_ago(-60));

    let (status, _) = request(&app, "POST", "/matches", None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, player_token) =
        create_test_user(&state, "player@club.test", &[RoleTag::Player], false).await;
    let (status, body) = request(
        &app,
        "POST",
        "/matches",
        Some(&player_token),
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    // The body never names the missing permission.
    let message = body["message"].as_str().unwrap_or_default();
    assert!(!message.contains("matches:write"), "leaked: {message}");
}

#[tokio::test]
async fn competition_scope_must_be_exactly_one() {
    let (state, app) = setup_app();
    let (_, token) =
        create_test_user(&state, "manager@club.test", &[RoleTag::ClubManager], false).await;

    let mut neither = friendly_match_payload(&kickoff_minutes_ago(-60));
    neither["friendly"] = json!(false);
    let (status, _) = request(&app, "POST", "/matches", Some(&token), Some(neither)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut both = friendly_match_payload(&kickoff_minutes_ago(-60));
    both["competition_id"] = json!(uuid::Uuid::new_v4());
    let (status, _) = request(&app, "POST", "/matches", Some(&token), Some(both)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn full_live_flow_with_clamped_clock() {
    let (state, app) = setup_app();
    let (_, staff) =
        create_test_user(&state, "owner@club.test", &[RoleTag::ClubOwner], false).await;

    // Kickoff 50 minutes ago: the LIVE clock must clamp at 45.
    let payload = friendly_match_payload(&kickoff_minutes_ago(50));
    let (status, created) = request(&app, "POST", "/matches", Some(&staff), Some(payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["status"], "SCHEDULED");
    assert!(created["home_score"].is_null());
    let id = created["id"].as_str().unwrap().to_string();

    // No timer while scheduled.
    let (status, snapshot) =
        request(&app, "GET", &format!("/matches/{id}/live"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(snapshot["minute"].is_null());

    // Going live materializes the scoreline at 0-0.
    let (status, live) = request(
        &app,
        "POST",
        &format!("/matches/{id}/status"),
        Some(&staff),
        Some(json!({"status": "LIVE"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(live["home_score"], 0);
    assert_eq!(live["away_score"], 0);

    let (_, snapshot) = request(&app, "GET", &format!("/matches/{id}/live"), None, None).await;
    assert_eq!(snapshot["minute"], 45);

    // A goal inside the envelope moves the derived score.
    let scorer = uuid::Uuid::new_v4();
    let (status, event) = request(
        &app,
        "POST",
        &format!("/matches/{id}/events"),
        Some(&staff),
        Some(json!({
            "kind": "GOAL",
            "minute": 41,
            "side": "home",
            "player_id": scorer
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(event["voided"], false);

    let (_, snapshot) = request(&app, "GET", &format!("/matches/{id}/live"), None, None).await;
    assert_eq!(snapshot["home_score"], 1);
    assert_eq!(snapshot["away_score"], 0);
    assert_eq!(snapshot["events"].as_array().unwrap().len(), 1);

    // A minute outside the LIVE envelope is rejected.
    let (status, _) = request(
        &app,
        "POST",
        &format!("/matches/{id}/events"),
        Some(&staff),
        Some(json!({
            "kind": "GOAL",
            "minute": 80,
            "side": "home",
            "player_id": scorer
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Finish through the remaining periods and record the result.
    for next in ["HALFTIME", "SECOND_HALF", "FINISHED"] {
        let (status, _) = request(
            &app,
            "POST",
            &format!("/matches/{id}/status"),
            Some(&staff),
            Some(json!({"status": next})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "transition to {next}");
    }

    let (status, with_result) = request(
        &app,
        "POST",
        &format!("/matches/{id}/result"),
        Some(&staff),
        Some(json!({"home_score": 1, "away_score": 0, "halftime_home": 1, "halftime_away": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(with_result["result_approval"], "PENDING");

    let (status, approved) = request(
        &app,
        "POST",
        &format!("/matches/{id}/result/approve"),
        Some(&staff),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["result_approval"], "APPROVED");

    // Regression attempts fail naming both states.
    let (status, body) = request(
        &app,
        "POST",
        &format!("/matches/{id}/status"),
        Some(&staff),
        Some(json!({"status": "LIVE"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("Finished"));
    assert!(message.contains("Live"));

    // Events can no longer be recorded.
    let (status, _) = request(
        &app,
        "POST",
        &format!("/matches/{id}/events"),
        Some(&staff),
        Some(json!({
            "kind": "YELLOW_CARD",
            "minute": 45,
            "side": "away",
            "player_id": uuid::Uuid::new_v4()
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn lineups_freeze_at_kickoff() {
    let (state, app) = setup_app();
    let (_, staff) =
        create_test_user(&state, "coach@club.test", &[RoleTag::Coach, RoleTag::ClubManager], false)
            .await;

    let payload = friendly_match_payload(&kickoff_minutes_ago(-120));
    let (_, created) = request(&app, "POST", "/matches", Some(&staff), Some(payload)).await;
    let id = created["id"].as_str().unwrap().to_string();

    let keeper = uuid::Uuid::new_v4();
    let lineup = json!({
        "slots": [
            {"player_id": keeper, "shirt_number": 1, "position": "GK", "starting": true},
            {"player_id": uuid::Uuid::new_v4(), "shirt_number": 9, "position": "ST", "starting": true}
        ]
    });

    let (status, saved) = request(
        &app,
        "PUT",
        &format!("/matches/{id}/lineups/home"),
        Some(&staff),
        Some(lineup.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["slots"].as_array().unwrap().len(), 2);
    assert_eq!(saved["slots"][0]["player_id"], json!(keeper));

    let (status, fetched) = request(
        &app,
        "GET",
        &format!("/matches/{id}/lineups/home"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["slots"].as_array().unwrap().len(), 2);

    // Duplicate shirt numbers are rejected.
    let duplicated = json!({
        "slots": [
            {"player_id": uuid::Uuid::new_v4(), "shirt_number": 7, "position": "LW", "starting": true},
            {"player_id": uuid::Uuid::new_v4(), "shirt_number": 7, "position": "RW", "starting": true}
        ]
    });
    let (status, _) = request(
        &app,
        "PUT",
        &format!("/matches/{id}/lineups/home"),
        Some(&staff),
        Some(duplicated),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Once the match is under way the lineup is frozen.
    let (status, _) = request(
        &app,
        "POST",
        &format!("/matches/{id}/status"),
        Some(&staff),
        Some(json!({"status": "WARMUP"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request(
        &app,
        "PUT",
        &format!("/matches/{id}/lineups/home"),
        Some(&staff),
        Some(lineup),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn voided_events_leave_scores_and_stats() {
    let (state, app) = setup_app();
    let (_, staff) =
        create_test_user(&state, "referee@league.test", &[RoleTag::Referee, RoleTag::ClubManager], false)
            .await;

    let payload = friendly_match_payload(&kickoff_minutes_ago(10));
    let (_, created) = request(&app, "POST", "/matches", Some(&staff), Some(payload)).await;
    let id = created["id"].as_str().unwrap().to_string();

    request(
        &app,
        "POST",
        &format!("/matches/{id}/status"),
        Some(&staff),
        Some(json!({"status": "LIVE"})),
    )
    .await;

    let scorer = uuid::Uuid::new_v4();
    let (_, event) = request(
        &app,
        "POST",
        &format!("/matches/{id}/events"),
        Some(&staff),
        Some(json!({"kind": "GOAL", "minute": 8, "side": "away", "player_id": scorer})),
    )
    .await;
    let event_id = event["id"].as_str().unwrap().to_string();

    let (_, stats) = request(&app, "GET", &format!("/players/{scorer}/stats"), None, None).await;
    assert_eq!(stats["goals"], 1);

    let (status, voided) = request(
        &app,
        "POST",
        &format!("/matches/{id}/events/{event_id}/void"),
        Some(&staff),
        Some(json!({"note": "offside on review"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(voided["voided"], true);

    let (_, snapshot) = request(&app, "GET", &format!("/matches/{id}/live"), None, None).await;
    assert_eq!(snapshot["away_score"], 0);
    // The event stays visible in the log, flagged.
    assert_eq!(snapshot["events"].as_array().unwrap().len(), 1);
    assert_eq!(snapshot["events"][0]["voided"], true);

    let (_, stats) = request(&app, "GET", &format!("/players/{scorer}/stats"), None, None).await;
    assert_eq!(stats["goals"], 0);
}

#[tokio::test]
async fn soft_deleted_matches_disappear_from_listings() {
    let (state, app) = setup_app();
    let (_, admin) =
        create_test_user(&state, "league@league.test", &[RoleTag::LeagueAdmin], false).await;

    let payload = friendly_match_payload(&kickoff_minutes_ago(-30));
    let (_, created) = request(&app, "POST", "/matches", Some(&admin), Some(payload)).await;
    let id = created["id"].as_str().unwrap().to_string();

    let (_, listing) = request(&app, "GET", "/matches", None, None).await;
    assert_eq!(listing.as_array().unwrap().len(), 1);

    let (status, _) = request(&app, "DELETE", &format!("/matches/{id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, listing) = request(&app, "GET", "/matches", None, None).await;
    assert!(listing.as_array().unwrap().is_empty());

    let (status, _) = request(&app, "GET", &format!("/matches/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

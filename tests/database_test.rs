//! Database-backed invariant tests.
//!
//! These run against a real PostgreSQL instance and are ignored by
//! default; run them with `cargo test -- --ignored` and a
//! `TEST_DATABASE_URL` pointing at a scratch database.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use serial_test::serial;
use uuid::Uuid;

use common::database::TestDatabase;
use common::{bearer_token, test_server_with_db};
use studyhub::chat::db as chat_db;
use studyhub::chat::scope::MessageKind;
use studyhub::exams::db as exams_db;
use studyhub::exams::scoring::{score_exam, ExamQuestion};
use studyhub::friends::db as friends_db;
use studyhub::profiles::db as profiles_db;

fn two_question_exam() -> Vec<ExamQuestion> {
    vec![
        ExamQuestion {
            question: "۲+۲؟".to_string(),
            question_type: Some("multiple_choice".to_string()),
            options: Some(vec!["۳".to_string(), "۴".to_string()]),
            correct_answer: json!("۴"),
            explanation: None,
        },
        ExamQuestion {
            question: "۳×۳؟".to_string(),
            question_type: Some("multiple_choice".to_string()),
            options: Some(vec!["۶".to_string(), "۹".to_string()]),
            correct_answer: json!("۹"),
            explanation: None,
        },
    ]
}

#[tokio::test]
#[serial]
#[ignore = "requires a postgres instance"]
async fn resubmitting_an_exam_awards_points_exactly_once() {
    let db = TestDatabase::new().await;
    let user = db.create_test_user("examinee").await;

    let questions = two_question_exam();
    let answers = vec![json!("۴"), json!("۹")];
    let score = score_exam(&questions, &answers);
    assert_eq!(score.points, 22);

    let exam_id = Uuid::new_v4();
    let questions_json = serde_json::to_value(&questions).unwrap();
    let answers_json = json!(answers);

    let first = exams_db::record_submission(
        &db.pool, exam_id, user.id, "آزمون ریاضی", &questions_json, &answers_json, &score,
    )
    .await
    .unwrap();
    assert_eq!(first, 22);

    // Same exam id again: the ledger blocks a second award, and the
    // response repeats the original one
    let second = exams_db::record_submission(
        &db.pool, exam_id, user.id, "آزمون ریاضی", &questions_json, &answers_json, &score,
    )
    .await
    .unwrap();
    assert_eq!(second, 22);

    let profile = profiles_db::get_profile(&db.pool, user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.points, 22);
    assert_eq!(profile.exams_completed, 1);
}

#[tokio::test]
#[serial]
#[ignore = "requires a postgres instance"]
async fn accepting_a_friend_request_creates_both_directions() {
    let db = TestDatabase::new().await;
    let sender = db.create_test_user("sender").await;
    let receiver = db.create_test_user("receiver").await;

    let request_id = friends_db::insert_request(&db.pool, sender.id, receiver.id)
        .await
        .unwrap();

    friends_db::accept_request(&db.pool, request_id, sender.id, receiver.id)
        .await
        .unwrap();

    assert!(friends_db::are_friends(&db.pool, sender.id, receiver.id)
        .await
        .unwrap());
    assert!(friends_db::are_friends(&db.pool, receiver.id, sender.id)
        .await
        .unwrap());

    let row = friends_db::get_request(&db.pool, request_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, "accepted");
}

#[tokio::test]
#[serial]
#[ignore = "requires a postgres instance"]
async fn duplicate_pending_requests_hit_the_partial_unique_index() {
    let db = TestDatabase::new().await;
    let sender = db.create_test_user("dupsender").await;
    let receiver = db.create_test_user("dupreceiver").await;

    friends_db::insert_request(&db.pool, sender.id, receiver.id)
        .await
        .unwrap();

    let second = friends_db::insert_request(&db.pool, sender.id, receiver.id).await;
    match second {
        Err(sqlx::Error::Database(e)) => assert!(e.is_unique_violation()),
        other => panic!("expected unique violation, got {other:?}"),
    }
}

#[tokio::test]
#[serial]
#[ignore = "requires a postgres instance"]
async fn bookmark_toggle_flips_state_and_never_duplicates() {
    let db = TestDatabase::new().await;
    let owner = db.create_test_user("chanowner").await;

    let channel = chat_db::create_channel(&db.pool, owner.id, "کانال تست", "")
        .await
        .unwrap();
    let message_id = chat_db::insert_channel_message(&db.pool, channel.id, owner.id, "سلام")
        .await
        .unwrap();

    let saved =
        chat_db::toggle_saved(&db.pool, owner.id, MessageKind::Channel, message_id)
            .await
            .unwrap();
    assert!(saved);

    // Saving again through delete-first semantics unsaves
    let saved =
        chat_db::toggle_saved(&db.pool, owner.id, MessageKind::Channel, message_id)
            .await
            .unwrap();
    assert!(!saved);

    assert!(chat_db::list_saved(&db.pool, owner.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
#[serial]
#[ignore = "requires a postgres instance"]
async fn editing_a_message_overwrites_content_and_marks_it_edited() {
    let db = TestDatabase::new().await;
    let owner = db.create_test_user("editor").await;

    let channel = chat_db::create_channel(&db.pool, owner.id, "کانال ویرایش", "")
        .await
        .unwrap();
    let message_id = chat_db::insert_channel_message(&db.pool, channel.id, owner.id, "نسخه اول")
        .await
        .unwrap();

    let server = test_server_with_db(db.pool.clone());
    let token = bearer_token(owner.id, &owner.username);

    let response = server
        .patch(&format!("/api/messages/channel/{message_id}"))
        .authorization_bearer(&token)
        .json(&json!({ "content": "نسخه دوم" }))
        .await;
    response.assert_status_ok();

    let messages = chat_db::list_channel_messages(&db.pool, channel.id)
        .await
        .unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "نسخه دوم");
    assert!(messages[0].is_edited);
}

#[tokio::test]
#[serial]
#[ignore = "requires a postgres instance"]
async fn bookmarking_requires_read_access_to_the_conversation() {
    let db = TestDatabase::new().await;
    let owner = db.create_test_user("chansaver").await;
    let outsider = db.create_test_user("nonmember").await;

    let channel = chat_db::create_channel(&db.pool, owner.id, "کانال خصوصی", "")
        .await
        .unwrap();
    let message_id = chat_db::insert_channel_message(&db.pool, channel.id, owner.id, "پیام")
        .await
        .unwrap();

    let server = test_server_with_db(db.pool.clone());
    let body = json!({ "message_type": "channel", "message_id": message_id });

    // A non-member cannot bookmark into a conversation they cannot read
    let response = server
        .post("/api/saved/toggle")
        .authorization_bearer(&bearer_token(outsider.id, &outsider.username))
        .json(&body)
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = server
        .post("/api/saved/toggle")
        .authorization_bearer(&bearer_token(owner.id, &owner.username))
        .json(&body)
        .await;
    response.assert_status_ok();
    let toggled: serde_json::Value = response.json();
    assert_eq!(toggled["saved"], true);
}

#[tokio::test]
#[serial]
#[ignore = "requires a postgres instance"]
async fn deleting_a_message_removes_bookmarks_pointing_at_it() {
    let db = TestDatabase::new().await;
    let owner = db.create_test_user("sweeper").await;

    let channel = chat_db::create_channel(&db.pool, owner.id, "کانال پاکسازی", "")
        .await
        .unwrap();
    let message_id = chat_db::insert_channel_message(&db.pool, channel.id, owner.id, "پیام")
        .await
        .unwrap();

    chat_db::toggle_saved(&db.pool, owner.id, MessageKind::Channel, message_id)
        .await
        .unwrap();

    chat_db::delete_message(&db.pool, MessageKind::Channel, message_id)
        .await
        .unwrap();

    assert!(chat_db::list_saved(&db.pool, owner.id)
        .await
        .unwrap()
        .is_empty());
    assert!(
        chat_db::get_message_meta(&db.pool, MessageKind::Channel, message_id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
#[serial]
#[ignore = "requires a postgres instance"]
async fn channel_creation_auto_joins_the_owner() {
    let db = TestDatabase::new().await;
    let owner = db.create_test_user("autojoin").await;
    let outsider = db.create_test_user("outsider").await;

    let channel = chat_db::create_channel(&db.pool, owner.id, "کانال عضویت", "")
        .await
        .unwrap();

    let owner_facts = chat_db::channel_facts(&db.pool, channel.id, owner.id)
        .await
        .unwrap()
        .unwrap();
    let outsider_facts = chat_db::channel_facts(&db.pool, channel.id, outsider.id)
        .await
        .unwrap()
        .unwrap();

    assert!(studyhub::chat::scope::authorize_read(&owner_facts, owner.id).is_ok());
    assert!(studyhub::chat::scope::authorize_read(&outsider_facts, outsider.id).is_err());
}

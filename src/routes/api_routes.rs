/**
 * API Route Tables
 *
 * Two routers: the public surface (signup, login) and the protected
 * surface, which the caller reaches only through the authentication
 * middleware. The SSE change feed is protected too: events carry scope
 * ids and activity metadata, so they are not for anonymous eyes.
 */

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::ai::handlers as ai;
use crate::auth::handlers as auth;
use crate::chat::handlers as chat;
use crate::exams::handlers as exams;
use crate::friends::handlers as friends;
use crate::plans::handlers as plans;
use crate::profiles::handlers as profiles;
use crate::realtime::subscription;
use crate::server::state::AppState;

/// Routes reachable without a token
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(auth::signup::signup))
        .route("/api/auth/login", post(auth::login::login))
}

/// Routes behind the authentication middleware
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        // Session
        .route("/api/auth/me", get(auth::me::get_me))
        // Change feed
        .route(
            "/realtime",
            get(subscription::handle_realtime_subscription),
        )
        // Profile and analytics
        .route(
            "/api/profile",
            get(profiles::get_profile).patch(profiles::update_profile),
        )
        .route("/api/page-views", post(profiles::record_page_view))
        .route("/api/admin/stats", get(profiles::admin_stats))
        // Channels
        .route(
            "/api/channels",
            get(chat::channels::list_channels).post(chat::channels::create_channel),
        )
        .route("/api/channels/{id}/join", post(chat::channels::join_channel))
        .route(
            "/api/channels/{id}/messages",
            get(chat::channels::list_messages).post(chat::channels::post_message),
        )
        // Groups
        .route(
            "/api/groups",
            get(chat::groups::list_groups).post(chat::groups::create_group),
        )
        .route("/api/groups/{id}/join", post(chat::groups::join_group))
        .route(
            "/api/groups/{id}/messages",
            get(chat::groups::list_messages).post(chat::groups::post_message),
        )
        // Direct messages
        .route(
            "/api/dm/{peer_id}/messages",
            get(chat::direct::list_messages).post(chat::direct::send_message),
        )
        // Unified edit/delete across all three message kinds
        .route(
            "/api/messages/{kind}/{id}",
            patch(chat::messages::edit_message).delete(chat::messages::delete_message),
        )
        // Bookmarks
        .route("/api/saved", get(chat::saved::list_saved))
        .route("/api/saved/toggle", post(chat::saved::toggle_save))
        // Friends
        .route("/api/friends", get(friends::list_friends))
        .route(
            "/api/friends/requests",
            get(friends::list_requests).post(friends::send_request),
        )
        .route(
            "/api/friends/requests/{id}/respond",
            post(friends::respond_to_request),
        )
        // Exams
        .route("/api/exams", get(exams::list_exams))
        .route("/api/exams/submit", post(exams::submit_exam))
        // Study plans
        .route(
            "/api/plans",
            get(plans::list_plans).post(plans::create_plan),
        )
        .route(
            "/api/plans/{id}",
            patch(plans::update_plan).delete(plans::delete_plan),
        )
        // AI proxy
        .route("/api/ai/answer", post(ai::answer::answer))
        .route("/api/ai/summarize", post(ai::summarize::summarize))
        .route("/api/ai/exam-generator", post(ai::exam_generator::generate_exam))
        .route("/api/ai/consultation", post(ai::consultation::consultation))
        .route("/api/ai/study-planner", post(ai::study_planner::study_planner))
        .route("/api/ai/image-analysis", post(ai::image_analysis::analyze_image))
        .route("/api/ai/group-chat", post(ai::group_chat::group_chat))
}

mod actions;
mod get_journal;
mod mark_intake_skipped;
mod mark_intake_taken;
pub mod scheduler_tick;
mod snooze_intake;

use actix_web::web;
use actions::intake_action_controller;
use get_journal::get_journal_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/users/{user_id}/intakes/{intake_id}/actions",
        web::post().to(intake_action_controller),
    );
    cfg.route(
        "/users/{user_id}/journal",
        web::get().to(get_journal_controller),
    );
}

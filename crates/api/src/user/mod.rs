mod delete_user;
mod get_user;
mod update_user_settings;

use actix_web::web;
use delete_user::delete_user_controller;
use get_user::get_user_controller;
use update_user_settings::update_user_settings_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/users/{user_id}", web::get().to(get_user_controller));
    cfg.route(
        "/users/{user_id}",
        web::put().to(update_user_settings_controller),
    );
    cfg.route("/users/{user_id}", web::delete().to(delete_user_controller));
}

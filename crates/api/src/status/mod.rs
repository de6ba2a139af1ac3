use actix_web::{web, HttpResponse};
use pillbox_api_structs::get_service_health::APIResponse;

async fn status() -> HttpResponse {
    HttpResponse::Ok().json(APIResponse {
        message: "Pillbox is up!\r\n".into(),
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(status));
}

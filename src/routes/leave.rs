use actix_web::web;

use crate::handlers::leave;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/leave")
            .route("/requests", web::post().to(leave::submit_request))
            .route("/requests", web::get().to(leave::list_requests))
            .route("/requests/{id}", web::get().to(leave::get_request))
            .route(
                "/requests/{id}/status",
                web::put().to(leave::set_request_status),
            )
            .route(
                "/requests/{id}/cancel",
                web::put().to(leave::cancel_request),
            )
            .route("/pending", web::get().to(leave::pending_requests))
            .route("/on-leave", web::get().to(leave::on_leave))
            .route("/balance/{employee_id}", web::get().to(leave::get_balance))
            .route(
                "/balance/{employee_id}/adjust",
                web::post().to(leave::adjust_balance),
            ),
    );
}

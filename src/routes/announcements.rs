use actix_web::web;

use crate::handlers::announcements;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/announcements")
            .route("", web::post().to(announcements::create_announcement))
            .route("", web::get().to(announcements::list_announcements))
            .route("/feed", web::get().to(announcements::feed))
            .route("/{id}", web::put().to(announcements::update_announcement))
            .route(
                "/{id}",
                web::delete().to(announcements::delete_announcement),
            )
            .route("/{id}/read", web::post().to(announcements::mark_read)),
    );
}

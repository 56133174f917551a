use actix_web::web;

use crate::handlers::{ai, retention};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/ai")
            .route("/chat", web::post().to(ai::chat))
            .route("/faq", web::get().to(ai::faq))
            .route("/career-paths", web::post().to(ai::career_paths))
            .route("/roadmap", web::post().to(ai::roadmap))
            .route(
                "/screening-questions",
                web::post().to(ai::screening_questions),
            ),
    );
    cfg.service(
        web::scope("/retention")
            .route("/predict", web::post().to(retention::predict))
            .route("/analytics", web::get().to(retention::analytics)),
    );
}

use actix_web::web;

use crate::handlers::assets;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/assets")
            .route("", web::post().to(assets::create_asset))
            .route("", web::get().to(assets::list_assets)),
    );
}

use actix_web::web;

pub mod ai;
pub mod announcements;
pub mod assets;
pub mod attendance;
pub mod auth;
pub mod employees;
pub mod holidays;
pub mod invoices;
pub mod leave;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(auth::configure)
            .configure(employees::configure)
            .configure(leave::configure)
            .configure(attendance::configure)
            .configure(announcements::configure)
            .configure(invoices::configure)
            .configure(assets::configure)
            .configure(ai::configure)
            .configure(holidays::configure),
    );
}

use actix_web::web;

use crate::handlers::employees;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/employees")
            .route("", web::get().to(employees::list_employees))
            .route("", web::post().to(employees::create_employee))
            .route("/me/dashboard", web::get().to(employees::my_dashboard))
            .route("/me/profile", web::put().to(employees::update_my_profile))
            .route("/{id}", web::get().to(employees::get_employee))
            .route("/{id}", web::put().to(employees::update_employee))
            .route("/{id}", web::delete().to(employees::delete_employee)),
    );
}

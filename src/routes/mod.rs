// Route exports
pub mod error;
pub mod recommendations;

use actix_web::web;

pub use error::ApiError;
pub use recommendations::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(recommendations::configure),
    );
}

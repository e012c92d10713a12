//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod feeds;
mod health;
mod posts;
mod profile;
mod views;

#[cfg(test)]
mod tests;

use actix_web::web;

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Register shared state, extractor configuration and routes.
pub fn configure_app(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(state.tokens.clone()))
            .app_data(web::Data::new(state))
            .app_data(
                web::JsonConfig::default()
                    .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
            )
            .app_data(
                web::QueryConfig::default()
                    .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
            );
        configure_routes(cfg);
    }
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/", web::get().to(feeds::index))
            .route("/health", web::get().to(health::health_check))
            .route("/category/{slug}", web::get().to(feeds::category))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/registration", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login)),
            )
            // Profile; `/profile/edit` must win over `/profile/{username}`
            .service(
                web::resource("/profile/edit")
                    .route(web::get().to(profile::edit_form))
                    .route(web::post().to(profile::edit)),
            )
            .route("/profile/{username}", web::get().to(feeds::profile))
            // Posts
            .service(
                web::resource("/posts/create")
                    .route(web::get().to(posts::create_form))
                    .route(web::post().to(posts::create)),
            )
            .route("/posts/{post_id}", web::get().to(posts::detail))
            .service(
                web::resource("/posts/{post_id}/edit")
                    .route(web::get().to(posts::edit_form))
                    .route(web::post().to(posts::edit)),
            )
            .service(
                web::resource("/posts/{post_id}/delete")
                    .route(web::get().to(posts::delete_form))
                    .route(web::post().to(posts::delete)),
            )
            // Comments
            .service(
                web::resource("/add_comment/{post_id}")
                    .route(web::post().to(comments::add))
                    .default_service(web::to(comments::reject_method)),
            )
            .service(
                web::resource("/posts/{post_id}/edit_comment/{comment_id}")
                    .route(web::get().to(comments::edit_form))
                    .route(web::post().to(comments::edit)),
            )
            .service(
                web::resource("/posts/{post_id}/delete_comment/{comment_id}")
                    .route(web::get().to(comments::delete_form))
                    .route(web::post().to(comments::delete)),
            ),
    );
}

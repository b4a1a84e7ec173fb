use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use tracing_actix_web::TracingLogger;

use crate::email_client::{Dispatcher, MailRouting};
use crate::routes;

/// Size caps applied while buffering uploads in memory.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_resume_bytes: usize,
}

pub fn run(
    listener: TcpListener,
    dispatcher: Arc<dyn Dispatcher>,
    routing: MailRouting,
    limits: UploadLimits,
) -> Result<Server, std::io::Error> {
    let dispatcher: web::Data<dyn Dispatcher> = web::Data::from(dispatcher);
    let routing = web::Data::new(routing);
    let limits = web::Data::new(limits);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .route("/health", web::get().to(routes::health_check))
            .service(
                web::scope("/api")
                    .route("/contact", web::post().to(routes::contact))
                    .route("/careers", web::post().to(routes::apply)),
            )
            .app_data(dispatcher.clone())
            .app_data(routing.clone())
            .app_data(limits.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(serde_json::json!({ "error": err.to_string() }));
    InternalError::from_response(err, response).into()
}

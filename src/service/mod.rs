//! The scoring service: `GET /health` and `POST /predict` over actix-web.
//!
//! The pipeline is loaded once by `run` and shared read-only by every worker.

use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{App, HttpResponse, HttpServer, middleware, web};
use serde::Serialize;

use crate::domain::{FeatureVector, PredictionResult};
use crate::error::AppError;
use crate::models::{LogisticPipeline, Pipeline, default_artifact_path};

pub mod error;
pub mod validate;

pub use error::*;
pub use validate::*;

/// Bind settings for `credit-risk serve`.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub host: String,
    pub port: u16,
    /// Worker threads; `None` keeps actix's default (one per core).
    pub workers: Option<usize>,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            workers: None,
        }
    }
}

/// Shared, immutable per-process state.
pub struct AppState {
    pub pipeline: Arc<dyn Pipeline>,
}

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
}

/// Load the model and serve until the process is stopped.
pub fn run(config: ServeConfig) -> Result<(), AppError> {
    let path = default_artifact_path();
    let pipeline = LogisticPipeline::load(&path)?;
    log::info!(
        "loaded model from {} ({} features)",
        path.display(),
        pipeline.features().len()
    );

    let listener = TcpListener::bind((config.host.as_str(), config.port)).map_err(|e| {
        AppError::server(format!("Failed to bind {}:{}: {e}", config.host, config.port))
    })?;

    actix_web::rt::System::new().block_on(async move {
        let server = start(Arc::new(pipeline), listener, config.workers)?;
        server
            .await
            .map_err(|e| AppError::server(format!("Server error: {e}")))
    })
}

/// Start serving on an already-bound listener.
///
/// Must be called from within an actix system; the returned `Server` runs
/// until it is stopped or awaited to completion.
pub fn start(
    pipeline: Arc<dyn Pipeline>,
    listener: TcpListener,
    workers: Option<usize>,
) -> Result<Server, AppError> {
    let addr = listener
        .local_addr()
        .map_err(|e| AppError::server(format!("Failed to read listener address: {e}")))?;
    let state = web::Data::new(AppState { pipeline });

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(routes)
    });
    if let Some(n) = workers {
        server = server.workers(n.max(1));
    }

    let server = server
        .listen(listener)
        .map_err(|e| AppError::server(format!("Failed to listen on {addr}: {e}")))?
        .run();
    log::info!("scoring service listening on http://{addr}");
    Ok(server)
}

/// Register the service's routes.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/predict", web::post().to(predict));
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthStatus { status: "ok" })
}

async fn predict(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, PredictError> {
    let outcome = parse_record(&body).and_then(|row| score(state.pipeline.as_ref(), &row));
    match outcome {
        Ok(result) => {
            log::debug!(
                "predicted class {} (p={:.3})",
                result.predicted_class,
                result.probability_score
            );
            Ok(HttpResponse::Ok().json(result))
        }
        Err(err @ PredictError::Inference(_)) => {
            log::error!("{err}");
            Err(err)
        }
        Err(err) => {
            log::warn!("rejected prediction request: {err}");
            Err(err)
        }
    }
}

/// Run one validated record through the pipeline.
pub fn score(pipeline: &dyn Pipeline, row: &FeatureVector) -> Result<PredictionResult, PredictError> {
    let [_, p1] = pipeline.predict_probability(row)?;
    let class = pipeline.predict(row)?;
    if !(0.0..=1.0).contains(&p1) {
        return Err(PredictError::Inference(format!(
            "probability {p1} is outside [0, 1]"
        )));
    }
    if class > 1 {
        return Err(PredictError::Inference(format!("unexpected class {class}")));
    }
    Ok(PredictionResult::new(p1, class))
}

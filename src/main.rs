use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use infergate::gemini::ChatRelay;
use infergate::labels::LabelTable;
use infergate::predict::Predictor;
use infergate::server::{routes, WebError};
use infergate::settings::Settings;
use infergate::torch::ImageClassifier;
use std::sync::Mutex;

use tracing::info;
use tracing_subscriber;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let settings = Settings::load().context("failed to load configuration from environment")?;

    // Both loads are fatal: the process must not serve without a model
    let labels = LabelTable::from_file(&settings.labels_path)?;
    let classifier = ImageClassifier::load(&settings.weights_path, labels.len() as i64)
        .context("failed to load classifier weights")?;
    info!(
        "loaded classifier ({} classes) from {:?}",
        labels.len(),
        settings.weights_path
    );

    let predictor = web::Data::new(Mutex::new(Predictor::new(classifier, labels)));
    let relay = web::Data::new(ChatRelay::new(
        settings.gemini_api_key.clone(),
        settings.gemini_model.clone(),
    ));

    info!("serving on 0.0.0.0:{}", settings.port);

    // Start the HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(predictor.clone())
            .app_data(relay.clone())
            // Keep undeserializable JSON on the shared {"error": ...} contract
            .app_data(
                web::JsonConfig::default()
                    .error_handler(|err, _req| WebError::from(err).into()),
            )
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
            .service(routes::predict)
            .service(routes::chat)
    })
    .bind(("0.0.0.0", settings.port))?
    .run()
    .await?;

    Ok(())
}

use actix_web::{App, HttpResponse, HttpServer, Responder, get, web};
use dotenvy::dotenv;
use log::{error, info, warn};
use serde_json::json;

use lnsearch::client::HttpExplorer;
use lnsearch::config::Config;
use lnsearch::decode::InvoiceDecoder;
use lnsearch::error::SearchError;
use lnsearch::models::SearchResponse;
use lnsearch::search::Searcher;

mod env_setup;

type AppSearcher = Searcher<HttpExplorer, InvoiceDecoder>;

/// Handler for the GET /search/{query} endpoint.
///
/// Every request runs the whole pipeline against the explorer API; nothing
/// is kept between requests.
#[get("/search/{query}")]
async fn search(query: web::Path<String>, searcher: web::Data<AppSearcher>) -> impl Responder {
    let query = query.into_inner();
    info!("[API] Search for {:?}", query);

    match searcher.search(&query).await {
        Ok(outcome) => HttpResponse::Ok().json(SearchResponse::from(&outcome)),
        Err(e @ SearchError::Decode(_)) => {
            warn!("[API] {}", e);
            HttpResponse::UnprocessableEntity().json(json!({ "error": e.to_string() }))
        }
        Err(e) => {
            error!("[API] Search for {:?} failed: {}", query, e);
            HttpResponse::BadGateway().json(json!({ "error": e.to_string() }))
        }
    }
}

/// This is where the app starts.
///
/// It sets up the .env file, the logger and the explorer client, then
/// starts the web server.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Create a default .env file if needed, then load it.
    env_setup::setup_env()?;
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let explorer = HttpExplorer::new(&config).map_err(|e| {
        error!("Failed to set up the explorer client: {}", e);
        std::io::Error::other(e.to_string())
    })?;
    info!("[Main] Using explorer API at {} ({}).", config.api_url, config.currency);

    let searcher = web::Data::new(Searcher::new(explorer, InvoiceDecoder));

    info!("Starting server on http://0.0.0.0:{}", config.server_port);
    HttpServer::new(move || App::new().app_data(searcher.clone()).service(search))
        .bind(("0.0.0.0", config.server_port))?
        .run()
        .await
}

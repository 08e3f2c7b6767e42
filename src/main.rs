use actix_web::HttpServer;
use gatewatch_api::{AppState, create_app};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let bind_addr =
        std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    // One state instance shared by every worker, so denylist updates and
    // ledger appends are visible across all of them.
    let state = AppState::from_env();

    tracing::info!(target: "startup", bind_addr = %bind_addr, "Server starting");

    HttpServer::new(move || create_app(state.clone()))
        .bind(bind_addr)?
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};
    use gatewatch_api::{health, version};

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(App::new().route("/api/health", web::get().to(health))).await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());

        let body = test::read_body(resp).await;
        let body_str = std::str::from_utf8(&body).unwrap();
        assert!(body_str.contains("healthy"));
    }

    #[actix_web::test]
    async fn test_version() {
        let app =
            test::init_service(App::new().route("/api/version", web::get().to(version))).await;

        let req = test::TestRequest::get().uri("/api/version").to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());

        let body = test::read_body(resp).await;
        let body_str = std::str::from_utf8(&body).unwrap();
        assert!(body_str.contains("version"));
        assert!(body_str.contains("commit"));
        assert!(body_str.contains("build_time"));
    }
}

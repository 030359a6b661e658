use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stockbook_observability::init();

    let jwt_secret = std::env::var("STOCKBOOK_JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("STOCKBOOK_JWT_SECRET not set; using insecure dev default");
        "dev-secret".to_string()
    });

    let seed_demo = std::env::var("STOCKBOOK_SEED_DEMO")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    let addr = std::env::var("STOCKBOOK_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let app = stockbook_api::app::build_app(jwt_secret, seed_demo);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

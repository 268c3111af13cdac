use customer_update_service::infra::config::AppConfig;
use customer_update_service::PgCustomerStore;
use tracing_subscriber::EnvFilter;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--create-schema]\n\
         \n\
         Reads the same env vars as api_server:\n\
           DATABASE_URL, DB_MAX_CONNECTIONS, BIND_ADDR, APP_ENV,\n\
           LEGACY_VALIDATOR, LEGACY_VALIDATOR_TIMEOUT_MS, SEED_DEMO_DATA\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let create_schema = args.iter().any(|a| a == "--create-schema");

    // Parse config (nice error messages if something is malformed)
    let config = AppConfig::from_env()?;

    tracing::info!("Preflight:");
    tracing::info!("  BIND_ADDR={}", config.bind_addr);
    tracing::info!("  APP_ENV={}", config.environment);
    tracing::info!("  LEGACY_VALIDATOR={:?}", config.validator_mode);
    tracing::info!("  LEGACY_VALIDATOR_TIMEOUT={:?}", config.validator_timeout);

    let Some(database_url) = config.database_url.as_deref() else {
        tracing::info!("  DATABASE_URL not set; the server will use the in-memory store");
        tracing::info!("Preflight OK.");
        return Ok(());
    };

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(1)
        .connect(database_url)
        .await
        .map_err(|e| anyhow::anyhow!("Cannot connect to DATABASE_URL: {}", e))?;
    sqlx::query("SELECT 1").execute(&pool).await?;
    tracing::info!("  Database reachable.");

    let store = PgCustomerStore::new(pool);
    if store.schema_present().await? {
        tracing::info!("  customers table exists.");
    } else if create_schema {
        tracing::info!("  customers table missing -> creating it...");
        store.ensure_schema().await?;
        tracing::info!("  customers table created.");
    } else {
        return Err(anyhow::anyhow!(
            "customers table does not exist. Re-run with --create-schema or start api_server once"
        ));
    }

    tracing::info!("Preflight OK.");
    Ok(())
}

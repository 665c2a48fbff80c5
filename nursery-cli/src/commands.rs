//! Subcommand implementations

use nursery_core::{ActorId, DEFAULT_CATEGORIES};
use nursery_db::{CategoryService, NurseryDatabase, NurseryDbError, StoreConfig, MEMORY_ENDPOINT};
use std::sync::Arc;

type CommandResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

async fn open_database(config: &StoreConfig) -> Result<Arc<NurseryDatabase>, NurseryDbError> {
    if config.endpoint.starts_with(MEMORY_ENDPOINT) || config.endpoint.starts_with("mem://") {
        tracing::warn!(
            endpoint = %config.endpoint,
            "Store is in-memory; changes end with this process"
        );
    }

    let store = nursery_db::open_store(config).await?;
    let database = Arc::new(NurseryDatabase::new(store));
    database.init_schema().await?;
    Ok(database)
}

pub async fn init_schema(config: &StoreConfig) -> CommandResult {
    println!("Initializing catalog schema at {}...", config.endpoint);
    open_database(config).await?;
    println!("Database schema initialized successfully.");
    Ok(())
}

pub async fn seed_categories(config: &StoreConfig, actor: &str) -> CommandResult {
    let database = open_database(config).await?;
    let service = CategoryService::new(database);

    let created = service
        .seed(&ActorId::new(actor), DEFAULT_CATEGORIES)
        .await?;

    tracing::info!(count = created.len(), "Default categories seeded");
    for category in &created {
        println!("  + {}", category.name);
    }
    println!(
        "Created {} of {} default categories.",
        created.len(),
        DEFAULT_CATEGORIES.len()
    );
    Ok(())
}

pub async fn status(api_url: &str) -> CommandResult {
    println!("Checking catalog server at {}...", api_url);

    let client = reqwest::Client::new();
    let base = api_url.trim_end_matches('/');

    let health = client
        .get(format!("{}/health", base))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    println!("Health: {}", serde_json::to_string_pretty(&health)?);

    let ready = client.get(format!("{}/ready", base)).send().await?;
    let code = ready.status();
    let body = ready.json::<serde_json::Value>().await?;
    println!("Ready ({}): {}", code, serde_json::to_string_pretty(&body)?);
    Ok(())
}

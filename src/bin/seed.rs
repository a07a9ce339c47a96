use dotenvy::dotenv;
use envconfig::Envconfig;

use blog_server::{seeder, storage, Config, ContentWorkflow};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::init_from_env()?;
    let backend = storage::connect(&config).await?;

    seeder::seed(
        backend.clone(),
        &config.admin_username,
        config.seed_demo_content,
    )
    .await?;

    // Sanity check: the workflow must be able to see what was seeded.
    let workflow = ContentWorkflow::new(backend, &config.default_author);
    let categories = workflow.list_categories().await?;
    tracing::info!(count = categories.len(), "categories available");

    Ok(())
}

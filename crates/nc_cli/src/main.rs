use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use nc_core::{ArticleStore, Result, UserStore};
use nc_fetcher::{HeadlineSource, NewsApiSource};
use nc_recommend::Recommender;
use nc_storage::{MemoryStorage, SqliteStorage};

mod menu;
use menu::Menu;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Storage backend for articles, accounts and ratings
    #[arg(long, default_value = "sqlite", value_parser = ["memory", "sqlite"])]
    storage: String,
    /// Database file used by the sqlite backend
    #[arg(long, default_value = "newscollector.db")]
    db_path: PathBuf,
    /// newsapi.org API key
    #[arg(long, env = "NEWS_API_KEY")]
    api_key: String,
    /// Number of articles pulled in on account creation and login
    #[arg(long, default_value_t = 50)]
    fetch_size: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let (articles, users): (Arc<dyn ArticleStore>, Arc<dyn UserStore>) = match cli.storage.as_str()
    {
        "sqlite" => {
            let storage = Arc::new(SqliteStorage::open(&cli.db_path).await?);
            (storage.clone(), storage)
        }
        _ => {
            let storage = Arc::new(MemoryStorage::new());
            (storage.clone(), storage)
        }
    };
    info!("💾 Storage initialized (using {})", cli.storage);

    let fetcher: Arc<dyn HeadlineSource> = Arc::new(NewsApiSource::new(cli.api_key)?);
    info!("📰 Headline source ready (using {})", fetcher.source_name());

    let recommender = Recommender::new(articles.clone(), users.clone());

    Menu::new(articles, users, fetcher, recommender, cli.fetch_size)
        .start()
        .await
}

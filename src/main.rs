use clap::Parser;

use fire_moni::api::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    api::run(cli).await
}

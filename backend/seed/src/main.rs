use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path or http(s) URL of a JSON array of recipes
    source: String,

    #[arg(long, default_value = "redis://127.0.0.1:6379")]
    redis_url: String,

    #[arg(long, default_value = server::config::DEFAULT_REDIS_KEY)]
    redis_key: String,

    /// Validate the recipes without writing them
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    seed::load_recipes(&args.source, &args.redis_url, &args.redis_key, args.dry_run).await?;

    Ok(())
}

use env_logger::Env;
use std::sync::Arc;

use busifavor::{
    cli,
    config::Config,
    database::{create_pool, run_migrations},
    external::BusifavorClient,
    services::BusifavorService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let command = match cli::parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}\n\n{}", cli::USAGE);
            std::process::exit(2);
        }
    };

    let config = Config::from_toml()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {e}"))?;
    let pool = create_pool(&config.database).await?;
    run_migrations(&pool).await?;

    let client = BusifavorClient::new(config.wechat_pay.clone());
    let service = BusifavorService::new(pool, Arc::new(client));

    let mut stdout = std::io::stdout().lock();
    let code = cli::run(command, &service, &config.wechat_pay, &mut stdout).await?;
    std::process::exit(code);
}

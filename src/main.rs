use clap::Parser;
use ledgerlift::{account, cli, config, demo, session_store};
use ledgerlift::client::ReqwestClient;
use ledgerlift_common::ApiClient;
use cli::{Cli, Commands};
use config::Config;
use demo::DemoOptions;

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { "debug" } else { "warn" };

    let filter = tracing_subscriber::EnvFilter::try_from_env("LEDGERLIFT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // tracing-logブリッジにより共通ライブラリの `log` 出力もここに流れる
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn api_client(config: &Config) -> anyhow::Result<demo::CliApi> {
    Ok(ApiClient::new(ReqwestClient::new(), config.base_url(), config.get_api_key()?))
}

async fn open_auth(config: &Config) -> anyhow::Result<account::CliAuthStore> {
    let store = session_store::FileStore::new(Config::session_path()?);
    Ok(account::open_store(config, api_client(config)?, store).await?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    let config = Config::load()?;

    match cli.command {
        Commands::Demo { kind, files, json, export, report } => {
            println!("📊 ledgerlift - {}\n", kind.spec().title);
            let api = api_client(&config)?;
            let options = DemoOptions { json, export, report };
            demo::run_demo(&api, kind, &files, &options).await?;
            println!("\n✅ 完了");
        }

        Commands::Demos => {
            print!("{}", demo::describe_demos());
        }

        Commands::Login { email } => {
            let auth = open_auth(&config).await?;
            account::login(&auth, email).await?;
        }

        Commands::Logout => {
            let auth = open_auth(&config).await?;
            account::logout(&auth).await?;
        }

        Commands::Whoami => {
            let auth = open_auth(&config).await?;
            println!("{}", account::describe(&auth.state())?);
        }

        Commands::Config { set_api_key, set_base_url, set_auth_url, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }
            if let Some(url) = set_base_url {
                config.set_base_url(url)?;
                println!("✔ ベースURLを設定しました");
            }
            if let Some(url) = set_auth_url {
                config.set_auth_url(url)?;
                println!("✔ 認証URLを設定しました");
            }

            if show {
                println!("設定:");
                println!("  ベースURL: {}", config.base_url());
                println!("  認証URL: {}", config.auth_url());
                println!("  APIキー: {}", if config.get_api_key().is_ok() { "設定済み" } else { "未設定" });
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}

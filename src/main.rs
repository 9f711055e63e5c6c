use clap::Parser;
use quiz_snap::{capture, cli, config, display, error, interactive, progress, session};
use quiz_snap::service::GeminiClient;
use cli::{Cli, Commands};
use config::Config;
use error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    if let Err(e) = run(cli).await {
        log::debug!("{:?}", e);
        eprintln!("✖ {}", e.user_notice());
        std::process::exit(1);
    }
}

/// 設定ファイルは使うサブコマンドでだけ読む（`bank` はオフラインで動く）
async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Bank { input, output } => {
            println!("📚 quiz-snap - 問題集読み込み\n");

            if !input.exists() {
                return Err(error::QuizSnapError::FileNotFound(input.display().to_string()));
            }
            let bank = quiz_snap_common::load_bank_file(&input)?;

            match output {
                Some(path) => {
                    std::fs::write(&path, bank.text())?;
                    println!("✔ {}行を書き出しました: {}", bank.rows(), path.display());
                }
                None => {
                    print!("{}", bank.text());
                    println!("\n✔ {}行 ({})", bank.rows(), bank.name());
                }
            }
        }

        Commands::Ask { bank, image, json } => {
            let client = gemini_client(&Config::load()?, cli.model)?;
            let session = session::spawn(client);

            let loaded = session.load_bank_file(bank).await?;
            if !json {
                println!("✔ 問題集: {} ({}行)", loaded.name(), loaded.rows());
            }

            let image = capture::read_image(&image).await?;

            let spinner = progress::processing_spinner("AIが問題集を検索中...");
            let outcome = session.capture(image).await;
            spinner.finish_and_clear();
            let result = outcome?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                display::print_result(&result);
            }
        }

        Commands::Session { bank } => {
            let client = gemini_client(&Config::load()?, cli.model)?;
            log::info!("モデル: {}", client.model());
            let session = session::spawn(client);
            interactive::run_interactive_session(&session, bank.as_deref()).await?;
        }

        Commands::Config { set_api_key, set_model, show } => {
            let mut config = Config::load()?;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if let Some(model) = set_model {
                config.set_model(model)?;
                println!("✔ モデルを設定しました");
            }

            if show {
                println!("設定:");
                println!("  ファイル: {}", Config::config_path()?.display());
                println!("  モデル: {}", config.model);
                println!("  エンドポイント: {}", config.endpoint);
                println!("  temperature: {}", config.temperature);
                match config.timeout_seconds {
                    Some(s) => println!("  タイムアウト: {}秒", s),
                    None => println!("  タイムアウト: なし"),
                }
                println!("  APIキー: {}", if config.get_api_key().is_ok() { "設定済み" } else { "未設定" });
            }
        }
    }

    Ok(())
}

/// `--model` 指定は設定ファイルを書き換えずにその回だけ適用
fn gemini_client(config: &Config, model: Option<String>) -> Result<GeminiClient> {
    match model {
        Some(model) => GeminiClient::new(&Config { model, ..config.clone() }),
        None => GeminiClient::new(config),
    }
}

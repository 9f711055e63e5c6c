use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quiz-snap")]
#[command(about = "写真・スクリーンショットの問題をExcel問題集と照合する学習支援ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 使用するモデル（設定ファイルより優先）
    #[arg(long, global = true)]
    pub model: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 問題集ファイルを読み込み、AIに渡すテキストを表示
    Bank {
        /// 問題集ファイル（xlsx/xls/ods/csv）
        #[arg(required = true)]
        input: PathBuf,

        /// 出力ファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 画像1枚を問題集と照合
    Ask {
        /// 問題集ファイル（xlsx/xls/ods/csv）
        #[arg(short, long, required = true)]
        bank: PathBuf,

        /// 問題の写真・スクリーンショット
        #[arg(required = true)]
        image: PathBuf,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 対話モード（問題集を保持したまま繰り返し照合）
    Session {
        /// 起動時に読み込む問題集
        #[arg(short, long)]
        bank: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 既定モデルを設定
        #[arg(long)]
        set_model: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask() {
        let cli = Cli::try_parse_from(["quiz-snap", "ask", "--bank", "bank.xlsx", "shot.png", "--json"])
            .unwrap();
        match cli.command {
            Commands::Ask { bank, image, json } => {
                assert_eq!(bank, PathBuf::from("bank.xlsx"));
                assert_eq!(image, PathBuf::from("shot.png"));
                assert!(json);
            }
            _ => panic!("Expected Ask"),
        }
    }

    #[test]
    fn test_ask_requires_bank() {
        assert!(Cli::try_parse_from(["quiz-snap", "ask", "shot.png"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["quiz-snap", "session", "-v", "--model", "gemini-pro"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.model.as_deref(), Some("gemini-pro"));
        assert!(matches!(cli.command, Commands::Session { bank: None }));
    }
}

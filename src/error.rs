use thiserror::Error;

/// 照合失敗時にユーザーへ表示する共通メッセージ
pub const GENERIC_FAILURE_NOTICE: &str =
    "認識に失敗しました。スクリーンショットが鮮明で、文字が含まれていることを確認してください。";

#[derive(Error, Debug)]
pub enum QuizSnapError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`quiz-snap config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    /// 通信失敗・エラーステータス
    #[error("AIサービスに接続できません: {0}")]
    ServiceUnavailable(String),

    #[error("問題集が読み込まれていません")]
    NoBankLoaded,

    #[error("認識処理中です。完了までお待ちください")]
    Busy,

    #[error("セッションが終了しています")]
    SessionClosed,

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("バックグラウンド処理エラー: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] quiz_snap_common::Error),
}

impl QuizSnapError {
    /// 照合パイプラインの失敗か（ユーザーには共通メッセージのみ表示する）
    pub fn is_match_failure(&self) -> bool {
        matches!(
            self,
            QuizSnapError::ServiceUnavailable(_)
                | QuizSnapError::Common(quiz_snap_common::Error::MatchFormat(_))
                | QuizSnapError::Common(quiz_snap_common::Error::Image(_))
        )
    }

    /// ユーザー向けメッセージ
    pub fn user_notice(&self) -> String {
        if self.is_match_failure() {
            GENERIC_FAILURE_NOTICE.to_string()
        } else {
            self.to_string()
        }
    }
}

pub type Result<T> = std::result::Result<T, QuizSnapError>;

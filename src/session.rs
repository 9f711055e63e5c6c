//! セッション状態を所有するアクター
//!
//! 問題集・履歴・処理中フラグ・表示中の結果は1つのtokioタスクだけが保持し、
//! `SessionHandle` からのメッセージで更新する。
//!
//! - 問題集なしの照合要求は `NoBankLoaded` で即拒否（サービスは呼ばない）
//! - 照合中の照合要求は `Busy` で即拒否（キューに積まない）
//! - 照合の成否（パニックを含む）にかかわらず完了時に処理中フラグを戻す。履歴追加は成功時のみ

use crate::error::{QuizSnapError, Result};
use crate::pipeline;
use crate::service::VisionMatchService;
use quiz_snap_common::{bank, CapturedImage, HistoryLog, MatchResult, QuestionBank};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

const COMMAND_BUFFER: usize = 16;

/// 表示用の状態コピー
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub bank_name: Option<String>,
    pub bank_rows: usize,
    pub processing: bool,
    /// 直近の照合結果（閉じるまで表示）
    pub current: Option<MatchResult>,
    /// 新しい順
    pub history: Vec<MatchResult>,
}

impl SessionSnapshot {
    pub fn has_bank(&self) -> bool {
        self.bank_name.is_some()
    }

    /// 照合操作を受け付けられる状態か
    pub fn can_capture(&self) -> bool {
        self.has_bank() && !self.processing
    }
}

enum Command {
    SetBank(Arc<QuestionBank>),
    ClearBank,
    Capture {
        image: CapturedImage,
        reply: oneshot::Sender<Result<MatchResult>>,
    },
    CloseResult,
    Snapshot(oneshot::Sender<SessionSnapshot>),
}

/// 照合タスクの完了通知
struct Finished {
    outcome: Result<MatchResult>,
    reply: oneshot::Sender<Result<MatchResult>>,
}

#[derive(Default)]
struct SessionState {
    bank: Option<Arc<QuestionBank>>,
    history: HistoryLog,
    processing: bool,
    current: Option<MatchResult>,
}

/// セッションへの操作口（複製可）
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Command>,
}

/// セッションアクターを起動（tokioランタイム内で呼ぶこと）
pub fn spawn<S: VisionMatchService>(service: S) -> SessionHandle {
    let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
    tokio::spawn(run(Arc::new(service), rx));
    SessionHandle { tx }
}

async fn run<S: VisionMatchService>(service: Arc<S>, mut commands: mpsc::Receiver<Command>) {
    let (done_tx, mut done_rx) = mpsc::channel::<Finished>(1);
    let mut state = SessionState::default();

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(command) => state.handle(command, &service, &done_tx),
                None => break,
            },
            Some(finished) = done_rx.recv() => state.finish(finished),
        }
    }

    log::debug!("セッション終了");
}

impl SessionState {
    fn handle<S: VisionMatchService>(
        &mut self,
        command: Command,
        service: &Arc<S>,
        done_tx: &mpsc::Sender<Finished>,
    ) {
        match command {
            Command::SetBank(bank) => {
                log::info!("問題集を設定: {} ({}行)", bank.name(), bank.rows());
                self.bank = Some(bank);
            }
            Command::ClearBank => {
                self.bank = None;
            }
            Command::Capture { image, reply } => {
                let Some(bank) = self.bank.clone() else {
                    let _ = reply.send(Err(QuizSnapError::NoBankLoaded));
                    return;
                };
                if self.processing {
                    let _ = reply.send(Err(QuizSnapError::Busy));
                    return;
                }

                self.processing = true;
                self.current = None;

                let service = Arc::clone(service);
                let done_tx = done_tx.clone();
                tokio::spawn(async move {
                    // 照合側でパニックしても完了通知は必ず送る
                    let outcome = tokio::spawn(async move {
                        pipeline::run_match(service.as_ref(), &image, &bank).await
                    })
                    .await
                    .unwrap_or_else(|e| Err(QuizSnapError::TaskJoin(e)));
                    let _ = done_tx.send(Finished { outcome, reply }).await;
                });
            }
            Command::CloseResult => {
                self.current = None;
            }
            Command::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
        }
    }

    fn finish(&mut self, finished: Finished) {
        self.processing = false;

        match &finished.outcome {
            Ok(result) => {
                if let Some(evicted) = self.history.push(result.clone()) {
                    log::debug!("履歴から削除: {}", evicted.question_text);
                }
                self.current = Some(result.clone());
            }
            // 詳細は --verbose のときだけ表示
            Err(e) => log::debug!("照合失敗: {}", e),
        }

        let _ = finished.reply.send(finished.outcome);
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            bank_name: self.bank.as_ref().map(|b| b.name().to_string()),
            bank_rows: self.bank.as_ref().map(|b| b.rows()).unwrap_or(0),
            processing: self.processing,
            current: self.current.clone(),
            history: self.history.to_vec(),
        }
    }
}

impl SessionHandle {
    async fn send(&self, command: Command) -> Result<()> {
        self.tx
            .send(command)
            .await
            .map_err(|_| QuizSnapError::SessionClosed)
    }

    /// 読み込み済みの問題集で置き換える
    pub async fn set_bank(&self, bank: QuestionBank) -> Result<()> {
        self.send(Command::SetBank(Arc::new(bank))).await
    }

    /// ファイルから問題集を読み込んで置き換える
    ///
    /// 読み込みに失敗した場合、既存の問題集はそのまま残る。
    pub async fn load_bank_file(&self, path: PathBuf) -> Result<Arc<QuestionBank>> {
        if !path.exists() {
            return Err(QuizSnapError::FileNotFound(path.display().to_string()));
        }

        let loaded = tokio::task::spawn_blocking(move || bank::load_file(&path)).await??;
        let loaded = Arc::new(loaded);
        self.send(Command::SetBank(Arc::clone(&loaded))).await?;
        Ok(loaded)
    }

    pub async fn clear_bank(&self) -> Result<()> {
        self.send(Command::ClearBank).await
    }

    /// 画像を照合（完了まで待つ）
    pub async fn capture(&self, image: CapturedImage) -> Result<MatchResult> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Capture { image, reply }).await?;
        rx.await.map_err(|_| QuizSnapError::SessionClosed)?
    }

    /// 表示中の結果を閉じる（履歴は残る）
    pub async fn close_result(&self) -> Result<()> {
        self.send(Command::CloseResult).await
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot(reply)).await?;
        rx.await.map_err(|_| QuizSnapError::SessionClosed)
    }
}

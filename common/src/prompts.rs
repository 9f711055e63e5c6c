//! プロンプト生成モジュール
//!
//! 画像内の問題を問題集と照合させる指示文を組み立てる。
//! 出力形式（3フィールドのJSON）はパーサーと対になっている。

/// AIに出力させるフィールド名（出力順）
pub const MATCH_FIELDS: [&str; 3] = ["questionText", "answer", "reason"];

/// 照合用の指示文を生成
///
/// 問題集テキスト本体はリクエストの別パートとして渡すため、ここには含めない。
pub fn build_match_instruction() -> String {
    r#"あなたは試験問題の照合アシスタントです。
添付画像（写真またはスクリーンショット）に写っている問題を読み取り、
別途渡す「問題集」(CSV形式。1行目が見出しの場合あり) から最も一致する問題を探してください。

## 出力形式（厳密にこのJSONオブジェクト形式で出力）
{
  "questionText": "画像から読み取った問題文",
  "answer": "問題集から選んだ最も適切な解答",
  "reason": "照合の根拠（問題集のどの行を使ったか）を簡潔に"
}

## 注意
- 問題文は画像の文字をそのまま正確に書き起こす
- 解答は問題集の内容から取る。問題集に無い場合はその旨をreasonに書く
- 選択肢問題は選択肢の記号と本文の両方を解答に含める
- 出力言語は問題集の言語に合わせる
- JSONオブジェクトのみ出力。説明文は不要"#
        .to_string()
}

/// 問題集パートの本文を生成
pub fn build_bank_section(bank_text: &str) -> String {
    format!("## 問題集\n{}", bank_text)
}

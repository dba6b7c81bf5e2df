//! Scanner Module
//!
//! シート第1列の行走査と2状態アキュムレータによる問題抽出を実装するモジュール。
//!
//! 選択肢シートでは「問題開始行で直前の問題を確定し、次の問題開始行または
//! 走査終端まで選択肢行を蓄積する」flush-on-boundary方式を取ります。
//! 判断シートには蓄積がなく、問題開始行がそのまま1レコードになります。

use regex::Regex;

use crate::api::{OptionKey, QuestionKind, QuestionRecord};
use crate::error::QuizBankError;
use crate::types::{ArgbColor, SourceCell};

/// 問題開始行のパターン（1個以上の数字 + 区切り文字）
const QUESTION_START_PATTERN: &str = r"^\d+[、.]";

/// 選択肢行のパターン（A〜Dの1文字 + 区切り文字）
const OPTION_LINE_PATTERN: &str = r"^[A-D][.、]";

/// 行分類の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RowLabel {
    /// 問題開始行（新しい問題ブロックの先頭）
    QuestionStart,

    /// 選択肢行
    Option {
        /// 選択肢キー（行の先頭文字）
        key: OptionKey,
        /// マーカー2文字を除去しトリムした本文
        body: String,
    },

    /// どのパターンにも一致しない行（走査状態を変えない）
    Other,
}

/// 行分類器
///
/// 2種類の行パターンをコンパイル済み正規表現として保持します。
/// `ExtractorBuilder::build()`で一度だけ構築されます。
#[derive(Debug)]
pub(crate) struct RowClassifier {
    question_start: Regex,
    option_line: Regex,
}

impl RowClassifier {
    pub fn new() -> Result<Self, QuizBankError> {
        let question_start = Regex::new(QUESTION_START_PATTERN)
            .map_err(|e| QuizBankError::Config(format!("Invalid question pattern: {}", e)))?;
        let option_line = Regex::new(OPTION_LINE_PATTERN)
            .map_err(|e| QuizBankError::Config(format!("Invalid option pattern: {}", e)))?;
        Ok(Self {
            question_start,
            option_line,
        })
    }

    /// トリム済みのセルテキストを分類
    ///
    /// 問題開始パターンが選択肢パターンより優先されます（両方に一致する
    /// テキストは存在しませんが、判定順は固定です）。
    pub fn classify(&self, text: &str) -> RowLabel {
        if self.question_start.is_match(text) {
            return RowLabel::QuestionStart;
        }

        if self.option_line.is_match(text) {
            // パターンにより先頭文字はA〜D、2文字目は区切り文字
            if let Some(key) = text.chars().next().and_then(OptionKey::from_char) {
                let body: String = text.chars().skip(2).collect();
                return RowLabel::Option {
                    key,
                    body: body.trim().to_string(),
                };
            }
        }

        RowLabel::Other
    }
}

/// 構築中の選択問題（未確定レコード）
#[derive(Debug)]
pub(crate) struct QuestionDraft {
    prompt: String,
    options: [String; 4],
    answer: String,
}

impl QuestionDraft {
    /// 問題開始行のテキストから新しいドラフトを生成
    fn new(prompt: String) -> Self {
        Self {
            prompt,
            options: Default::default(),
            answer: String::new(),
        }
    }

    /// 選択肢本文を設定（同じキーの再出現は上書き＝last-wins）
    fn set_option(&mut self, key: OptionKey, body: String) {
        self.options[key.index()] = body;
    }

    /// 正解文字を追記（重複排除なし、検出順）
    fn mark_correct(&mut self, key: OptionKey) {
        self.answer.push(key.letter());
    }

    /// ドラフトを確定し、不変のレコードとして出力
    fn finish(self) -> QuestionRecord {
        QuestionRecord {
            kind: QuestionKind::SingleChoice,
            prompt: self.prompt,
            options: self.options,
            answer: self.answer,
            explanation: String::new(),
        }
    }
}

/// 走査状態
///
/// 選択肢シート走査の状態機械。`Idle`では選択肢行を帰属させる問題が
/// 存在しないため、選択肢行は読み飛ばされます。
#[derive(Debug)]
pub(crate) enum ScanState {
    /// 構築中の問題なし
    Idle,

    /// 問題を構築中
    Building(QuestionDraft),
}

/// 選択肢シートの第1列セルを走査し、確定した問題を`records`へ追記
///
/// # アルゴリズム
///
/// 1. 問題開始行: 構築中の問題があれば確定して出力し、新しいドラフトを開始
/// 2. 選択肢行: 構築中の問題があれば本文を設定。セルのフォント色が
///    `correct_color`と一致すれば選択肢文字を正解欄へ追記
/// 3. 走査終端: 構築中の問題があれば確定して出力（最終フラッシュ）
///
/// 空セル・不一致行・帰属先のない選択肢行は状態を変えずに読み飛ばします。
pub(crate) fn scan_choice_cells(
    cells: &[SourceCell],
    classifier: &RowClassifier,
    correct_color: &ArgbColor,
    records: &mut Vec<QuestionRecord>,
) {
    let mut state = ScanState::Idle;

    for cell in cells {
        if cell.text.is_empty() {
            continue;
        }

        match classifier.classify(&cell.text) {
            RowLabel::QuestionStart => {
                // 直前の問題を確定（flush-on-boundary）
                if let ScanState::Building(draft) = std::mem::replace(&mut state, ScanState::Idle)
                {
                    records.push(draft.finish());
                }
                state = ScanState::Building(QuestionDraft::new(cell.text.clone()));
            }
            RowLabel::Option { key, body } => {
                if let ScanState::Building(draft) = &mut state {
                    draft.set_option(key, body);
                    if cell.font_color.as_ref() == Some(correct_color) {
                        draft.mark_correct(key);
                    }
                }
                // Idle時の選択肢行は帰属先がないため無視する
            }
            RowLabel::Other => {}
        }
    }

    // 最終フラッシュ（末尾の問題には後続の問題開始行がない）
    if let ScanState::Building(draft) = state {
        records.push(draft.finish());
    }
}

/// 判断シートの第1列セルを走査し、完結したレコードを`records`へ追記
///
/// 問題開始行に一致した行が即座に独立した判断問題になります。答えは
/// 行の内容ではなくシートに対応付けられた固定トークンです。
pub(crate) fn scan_judgment_cells(
    cells: &[SourceCell],
    classifier: &RowClassifier,
    answer_token: &str,
    records: &mut Vec<QuestionRecord>,
) {
    for cell in cells {
        if cell.text.is_empty() {
            continue;
        }

        if classifier.classify(&cell.text) == RowLabel::QuestionStart {
            records.push(QuestionRecord::true_false(
                cell.text.clone(),
                answer_token.to_string(),
            ));
        }
    }
}

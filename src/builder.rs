//! Builder Module
//!
//! Fluent Builder APIを提供し、`Extractor`インスタンスを段階的に構築する。

use std::io::{Read, Seek, Write};
use std::path::Path;

use tracing::debug;

use crate::api::QuestionRecord;
use crate::error::QuizBankError;
use crate::output::BankWriter;
use crate::parser::WorkbookParser;
use crate::scanner::{scan_choice_cells, scan_judgment_cells, RowClassifier};
use crate::security::SecurityConfig;
use crate::types::ArgbColor;

/// 選択肢シートのデフォルト名
pub(crate) const DEFAULT_CHOICE_SHEET: &str = "选择题";

/// 判断シートのデフォルト構成（シート名 -> 答えトークン、処理順）
pub(crate) const DEFAULT_JUDGMENT_SHEETS: [(&str, &str); 2] =
    [("判断题对", "对"), ("判断题错", "错")];

/// 出力シートのデフォルト名
pub(crate) const DEFAULT_BANK_SHEET: &str = "题库";

/// 正解を示すフォント色のデフォルト値（赤）
pub(crate) const DEFAULT_CORRECT_COLOR: &str = "FFFF0000";

/// 選択肢シートの走査行数のデフォルト上限
pub(crate) const DEFAULT_CHOICE_ROW_LIMIT: u32 = 100;

/// 判断シートの走査行数のデフォルト上限
pub(crate) const DEFAULT_JUDGMENT_ROW_LIMIT: u32 = 20;

/// 抽出処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct ExtractorConfig {
    /// 選択肢シート名（Noneで選択肢シートの走査を無効化）
    pub choice_sheet: Option<String>,

    /// 判断シートの構成（シート名, 答えトークン）。この順に処理される
    pub judgment_sheets: Vec<(String, String)>,

    /// 出力シート名
    pub bank_sheet: String,

    /// 正解を示すフォント色（ARGB、8桁の16進数）
    pub correct_answer_color: String,

    /// 選択肢シートの走査行数上限
    pub scan_row_limit_choice: u32,

    /// 判断シートの走査行数上限
    pub scan_row_limit_judgment: u32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            choice_sheet: Some(DEFAULT_CHOICE_SHEET.to_string()),
            judgment_sheets: DEFAULT_JUDGMENT_SHEETS
                .iter()
                .map(|(name, answer)| (name.to_string(), answer.to_string()))
                .collect(),
            bank_sheet: DEFAULT_BANK_SHEET.to_string(),
            correct_answer_color: DEFAULT_CORRECT_COLOR.to_string(),
            scan_row_limit_choice: DEFAULT_CHOICE_ROW_LIMIT,
            scan_row_limit_judgment: DEFAULT_JUDGMENT_ROW_LIMIT,
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// `Extractor`インスタンスを段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみを
/// オーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use quizbank::ExtractorBuilder;
///
/// # fn main() -> Result<(), quizbank::QuizBankError> {
/// let extractor = ExtractorBuilder::new()
///     .with_choice_row_limit(200)
///     .with_correct_answer_color("FFFF0000")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ExtractorBuilder {
    /// 内部設定（構築中）
    config: ExtractorConfig,
}

impl Default for ExtractorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractorBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - 選択肢シート: `选择题`（先頭100行を走査）
    /// - 判断シート: `判断题对` -> `对`、`判断题错` -> `错`（各先頭20行を走査）
    /// - 正解色: `FFFF0000`（赤）
    /// - 出力シート: `题库`
    pub fn new() -> Self {
        Self {
            config: ExtractorConfig::default(),
        }
    }

    /// 選択肢シート名を指定する
    pub fn with_choice_sheet(mut self, name: impl Into<String>) -> Self {
        self.config.choice_sheet = Some(name.into());
        self
    }

    /// 選択肢シートの走査を無効化する
    ///
    /// 判断シートのみを処理したい場合に使用します。
    pub fn without_choice_sheet(mut self) -> Self {
        self.config.choice_sheet = None;
        self
    }

    /// 判断シートの構成を指定する
    ///
    /// # 引数
    ///
    /// * `sheets` - (シート名, 答えトークン) のリスト。リスト順に処理され、
    ///   出力順もこの順になります
    pub fn with_judgment_sheets(mut self, sheets: Vec<(String, String)>) -> Self {
        self.config.judgment_sheets = sheets;
        self
    }

    /// 出力シート名を指定する
    pub fn with_bank_sheet(mut self, name: impl Into<String>) -> Self {
        self.config.bank_sheet = name.into();
        self
    }

    /// 正解を示すフォント色を指定する
    ///
    /// # 引数
    ///
    /// * `color` - 8桁の16進数ARGB（例: `"FFFF0000"`）。大文字小文字は
    ///   区別されません
    pub fn with_correct_answer_color(mut self, color: impl Into<String>) -> Self {
        self.config.correct_answer_color = color.into();
        self
    }

    /// 選択肢シートの走査行数上限を指定する
    ///
    /// 上限より後ろの行は走査されません（内容が残っている場合は警告ログが
    /// 出力されます）。
    pub fn with_choice_row_limit(mut self, limit: u32) -> Self {
        self.config.scan_row_limit_choice = limit;
        self
    }

    /// 判断シートの走査行数上限を指定する
    pub fn with_judgment_row_limit(mut self, limit: u32) -> Self {
        self.config.scan_row_limit_judgment = limit;
        self
    }

    /// 設定を検証し、`Extractor`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `QuizBankError::Config(String)`: 設定の検証に失敗した場合
    ///   * 走査行数の上限が0
    ///   * 正解色が8桁の16進数でない
    ///   * シート名が空、または判断シート名が重複している
    ///   * 出力シート名がExcelの制約（31文字以内、禁止文字なし）に反する
    pub fn build(self) -> Result<Extractor, QuizBankError> {
        // 1. 走査行数の検証
        if self.config.scan_row_limit_choice == 0 {
            return Err(QuizBankError::Config(
                "scan_row_limit_choice must be greater than 0".to_string(),
            ));
        }
        if self.config.scan_row_limit_judgment == 0 {
            return Err(QuizBankError::Config(
                "scan_row_limit_judgment must be greater than 0".to_string(),
            ));
        }

        // 2. 正解色の検証と正規化
        let correct_color = ArgbColor::parse(&self.config.correct_answer_color)
            .map_err(QuizBankError::Config)?;

        // 3. シート名の検証
        if let Some(name) = &self.config.choice_sheet {
            if name.is_empty() {
                return Err(QuizBankError::Config(
                    "Choice sheet name must not be empty".to_string(),
                ));
            }
        }
        for (i, (name, _)) in self.config.judgment_sheets.iter().enumerate() {
            if name.is_empty() {
                return Err(QuizBankError::Config(
                    "Judgment sheet name must not be empty".to_string(),
                ));
            }
            if self.config.judgment_sheets[..i]
                .iter()
                .any(|(seen, _)| seen == name)
            {
                return Err(QuizBankError::Config(format!(
                    "Duplicate judgment sheet name: '{}'",
                    name
                )));
            }
        }
        validate_bank_sheet_name(&self.config.bank_sheet)?;

        // 4. 行分類器の構築
        let classifier = RowClassifier::new()?;

        Ok(Extractor {
            config: self.config,
            correct_color,
            classifier,
        })
    }
}

/// 出力シート名の検証（Excelのシート名制約）
fn validate_bank_sheet_name(name: &str) -> Result<(), QuizBankError> {
    if name.is_empty() {
        return Err(QuizBankError::Config(
            "Bank sheet name must not be empty".to_string(),
        ));
    }
    if name.chars().count() > 31 {
        return Err(QuizBankError::Config(format!(
            "Bank sheet name exceeds 31 characters: '{}'",
            name
        )));
    }
    if name.chars().any(|c| matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\')) {
        return Err(QuizBankError::Config(format!(
            "Bank sheet name contains a forbidden character: '{}'",
            name
        )));
    }
    Ok(())
}

/// 抽出処理のファサード
///
/// 入力ワークブックから問題レコードを抽出し、問題バンクワークブックとして
/// 書き出すためのメインエントリーポイントです。処理は完全に逐次的で、
/// シート間・行間に並行性はありません。
///
/// # 使用例
///
/// ```rust,no_run
/// use quizbank::ExtractorBuilder;
/// use std::fs::File;
///
/// # fn main() -> Result<(), quizbank::QuizBankError> {
/// let extractor = ExtractorBuilder::new().build()?;
/// let input = File::open("低压.xlsx")?;
/// let output = File::create("低压_converted.xlsx")?;
/// extractor.convert(input, output)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Extractor {
    /// 抽出設定
    config: ExtractorConfig,

    /// 正規化済みの正解色
    correct_color: ArgbColor,

    /// 行分類器
    classifier: RowClassifier,
}

impl Extractor {
    /// 入力ワークブックから問題レコードを抽出する
    ///
    /// # 処理順序
    ///
    /// 1. 選択肢シート（設定されていて存在する場合）
    /// 2. 判断シート（設定リスト順）
    ///
    /// 存在しないシートは黙ってスキップされます。同じ入力に対して何度
    /// 実行しても同じレコード列が得られます（決定的）。
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<QuestionRecord>)` - 出力順に並んだ問題レコード
    /// * `Err(QuizBankError)` - 入力の読み込み・解析に失敗した場合
    pub fn extract<R: Read + Seek>(
        &self,
        mut input: R,
    ) -> Result<Vec<QuestionRecord>, QuizBankError> {
        // 入力全体をメモリに読み込む（セル値とスタイルXMLの2系統で使用）
        let security_config = SecurityConfig::default();
        let mut buffer = Vec::new();
        let bytes_read = input.read_to_end(&mut buffer)?;

        if bytes_read as u64 > security_config.max_input_file_size {
            return Err(QuizBankError::SecurityViolation(format!(
                "Input file size exceeds maximum: {} bytes (max: {} bytes)",
                bytes_read, security_config.max_input_file_size
            )));
        }

        let mut parser = WorkbookParser::open(buffer)?;
        let mut records = Vec::new();

        // 1. 選択肢シート
        if let Some(sheet_name) = &self.config.choice_sheet {
            if parser.has_sheet(sheet_name) {
                let cells =
                    parser.first_column(sheet_name, self.config.scan_row_limit_choice)?;
                let before = records.len();
                scan_choice_cells(&cells, &self.classifier, &self.correct_color, &mut records);
                debug!(
                    sheet = %sheet_name,
                    records = records.len() - before,
                    "choice sheet scanned"
                );
            } else {
                debug!(sheet = %sheet_name, "choice sheet not present, skipped");
            }
        }

        // 2. 判断シート（設定順）
        for (sheet_name, answer_token) in &self.config.judgment_sheets {
            if !parser.has_sheet(sheet_name) {
                debug!(sheet = %sheet_name, "judgment sheet not present, skipped");
                continue;
            }
            let cells = parser.first_column(sheet_name, self.config.scan_row_limit_judgment)?;
            let before = records.len();
            scan_judgment_cells(&cells, &self.classifier, answer_token, &mut records);
            debug!(
                sheet = %sheet_name,
                records = records.len() - before,
                "judgment sheet scanned"
            );
        }

        Ok(records)
    }

    /// 入力ワークブックを問題バンクワークブックのバイト列へ変換する
    ///
    /// 出力はメモリ上で完結してから返されます。
    pub fn convert_to_buffer<R: Read + Seek>(&self, input: R) -> Result<Vec<u8>, QuizBankError> {
        let records = self.extract(input)?;
        BankWriter::new(&self.config.bank_sheet).render(&records)
    }

    /// 入力ワークブックを変換し、問題バンクワークブックを書き出す
    ///
    /// # 引数
    ///
    /// * `input` - 入力XLSXのリーダー（Read + Seekトレイトを実装）
    /// * `output` - 出力先のライター（Writeトレイトを実装）
    ///
    /// 出力バイト列が完成してから書き込みが始まるため、抽出段階のエラーで
    /// 部分的な出力が書かれることはありません。
    pub fn convert<R: Read + Seek, W: Write>(
        &self,
        input: R,
        mut output: W,
    ) -> Result<(), QuizBankError> {
        let buffer = self.convert_to_buffer(input)?;
        output.write_all(&buffer)?;
        output.flush()?;
        Ok(())
    }

    /// ファイルパス指定の変換
    ///
    /// 入力の読み込みと抽出がすべて成功してから出力ファイルを作成します。
    /// 致命的エラー時に書きかけの出力ファイルが残らないのはこのためです。
    pub fn convert_path(
        &self,
        input_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
    ) -> Result<(), QuizBankError> {
        let input = std::fs::File::open(input_path)?;
        let buffer = self.convert_to_buffer(input)?;
        std::fs::write(output_path, buffer)?;
        Ok(())
    }
}

//! Workbook Parser Module
//!
//! calamineのラッパーとして、走査対象シートの第1列セルを抽出します。
//! セル値はcalamineから、フォント色は`FontColorSidecar`から取得します。

use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets, Xlsx};
use std::io::{Cursor, Read, Seek};
use tracing::warn;

use crate::error::QuizBankError;
use crate::parser::FontColorSidecar;
use crate::types::{ArgbColor, SourceCell};

/// ワークブックパーサー
///
/// 同一の入力バイト列からcalamineワークブック（セル値）とフォント色
/// サイドカー（スタイルXML）の両方を構築します。
pub(crate) struct WorkbookParser<R: Read + Seek> {
    /// calamineのワークブック（XLSX形式のみサポート）
    workbook: Xlsx<R>,
    /// フォント色サイドカー
    colors: FontColorSidecar,
}

impl WorkbookParser<Cursor<Vec<u8>>> {
    /// メモリ上のXLSXバイト列からワークブックを開く
    ///
    /// # 引数
    ///
    /// * `buffer` - XLSXファイルの内容
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - ワークブックとサイドカーの構築に成功した場合
    /// * `Err(QuizBankError)` - 解析エラーが発生した場合、またはXLSX形式でない場合
    pub fn open(buffer: Vec<u8>) -> Result<Self, QuizBankError> {
        let sheets =
            open_workbook_auto_from_rs(Cursor::new(buffer.clone())).map_err(QuizBankError::Parse)?;
        let workbook = match sheets {
            Sheets::Xlsx(workbook) => workbook,
            _ => {
                return Err(QuizBankError::Config(
                    "Only XLSX format is supported".to_string(),
                ))
            }
        };

        let colors = FontColorSidecar::new(Cursor::new(buffer))?;

        Ok(WorkbookParser { workbook, colors })
    }
}

impl<R: Read + Seek> WorkbookParser<R> {
    /// シートが存在するかを判定
    ///
    /// 走査対象シートの欠落はエラーではなくスキップ扱いのため、
    /// 呼び出し側はこのメソッドで事前に確認します。
    pub fn has_sheet(&self, sheet_name: &str) -> bool {
        self.workbook
            .sheet_names()
            .iter()
            .any(|name| name == sheet_name)
    }

    /// シートの第1列を先頭から`row_limit`行読み取る
    ///
    /// # 引数
    ///
    /// * `sheet_name` - 読み取るシート名（存在することが前提）
    /// * `row_limit` - 走査する行数の上限
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<SourceCell>)` - トリム済みテキストとフォント色のペアの列。
    ///   空セルは空文字列として含まれる（行位置を保つため）
    /// * `Err(QuizBankError)` - シートの読み取りに失敗した場合
    pub fn first_column(
        &mut self,
        sheet_name: &str,
        row_limit: u32,
    ) -> Result<Vec<SourceCell>, QuizBankError> {
        let range = self
            .workbook
            .worksheet_range(sheet_name)
            .map_err(|e| QuizBankError::Parse(e.into()))?;

        let mut cells = Vec::with_capacity(row_limit as usize);
        for row in 0..row_limit {
            let text = range
                .get_value((row, 0))
                .map(cell_text)
                .unwrap_or_default();
            let font_color = self.font_color(sheet_name, row, 0);
            cells.push(SourceCell { text, font_color });
        }

        // 走査上限より後ろに内容が残っている場合は警告する（切り捨てルール）
        if let Some((end_row, _)) = range.end() {
            if end_row >= row_limit {
                let truncated = (row_limit..=end_row).any(|row| {
                    range
                        .get_value((row, 0))
                        .map(|value| !cell_text(value).is_empty())
                        .unwrap_or(false)
                });
                if truncated {
                    warn!(
                        sheet = %sheet_name,
                        row_limit,
                        "first-column content beyond the scan bound is ignored"
                    );
                }
            }
        }

        Ok(cells)
    }

    /// セルのフォント色を取得（サイドカーへの委譲）
    fn font_color(&self, sheet_name: &str, row: u32, col: u32) -> Option<ArgbColor> {
        self.colors.font_color(sheet_name, row, col).cloned()
    }
}

/// セル値をトリム済みテキストへ変換
///
/// 数値セルは整数ならば小数点なしの表記になります。日付・エラー・空セルは
/// 空文字列として扱われ、行分類の対象になりません。
fn cell_text(value: &Data) -> String {
    match value {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.is_finite() && f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

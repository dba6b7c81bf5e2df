//! Output Module
//!
//! 問題レコード列を問題バンクワークブック（XLSX）として書き出すモジュール。
//! ワークブックはメモリ上で完結してから保存されるため、途中でエラーが
//! 発生しても書きかけのファイルは生成されません。

use rust_xlsxwriter::Workbook;

use crate::api::QuestionRecord;
use crate::error::QuizBankError;

/// 出力シートのヘッダー行（8列固定）
pub(crate) const BANK_HEADER: [&str; 8] = [
    "类型", "题干", "选项A", "选项B", "选项C", "选项D", "答案", "解析",
];

/// 問題バンクライター
///
/// 1シート構成の出力ワークブックを構築します。1行目はヘッダー、
/// 2行目以降は出力順どおりの問題レコードです。
pub(crate) struct BankWriter {
    sheet_name: String,
}

impl BankWriter {
    pub fn new(sheet_name: &str) -> Self {
        Self {
            sheet_name: sheet_name.to_string(),
        }
    }

    /// レコード列をXLSXバイト列として書き出す
    ///
    /// # 引数
    ///
    /// * `records` - 出力順に並んだ問題レコード
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<u8>)` - 完成したワークブックのバイト列
    /// * `Err(QuizBankError)` - ワークブックの構築・保存に失敗した場合
    pub fn render(&self, records: &[QuestionRecord]) -> Result<Vec<u8>, QuizBankError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.sheet_name)?;

        // ヘッダー行
        for (col, title) in BANK_HEADER.iter().enumerate() {
            worksheet.write_string(0, col as u16, *title)?;
        }

        // データ行（1レコード = 1行）
        for (i, record) in records.iter().enumerate() {
            let row = (i + 1) as u32;
            worksheet.write_string(row, 0, record.kind.label())?;
            worksheet.write_string(row, 1, record.prompt.as_str())?;
            for (j, option) in record.options.iter().enumerate() {
                worksheet.write_string(row, (2 + j) as u16, option.as_str())?;
            }
            worksheet.write_string(row, 6, record.answer.as_str())?;
            worksheet.write_string(row, 7, record.explanation.as_str())?;
        }

        Ok(workbook.save_to_buffer()?)
    }
}

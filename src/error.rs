//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// quizbankクレート全体で使用するエラー型
///
/// 入力ワークブックの読み込み、スタイルXMLの解析、問題バンクの書き出しの
/// 各段階で発生するエラーを統一的に扱います。
///
/// 行単位の不整合（パターンに一致しない行、問題ブロック外の選択肢行）は
/// エラーではなく、抽出処理の中で黙って読み飛ばされます。
///
/// # 使用例
///
/// ```rust,no_run
/// use quizbank::QuizBankError;
/// use std::fs::File;
///
/// fn open_source(path: &str) -> Result<(), QuizBankError> {
///     let _file = File::open(path)?;  // Ioエラーが自動的に変換される
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum QuizBankError {
    /// I/O操作中に発生したエラー
    ///
    /// 入力ファイルの読み込み失敗、出力の書き込み失敗など。
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 入力ワークブックの解析中に発生したエラー
    ///
    /// calamineクレートがExcelファイルを解析する際に発生したエラーです。
    /// ファイル形式が不正、または破損したファイルが原因となります。
    /// このエラーは致命的で、実行全体が中断されます（部分出力は生成されません）。
    #[error("Failed to parse Excel file: {0}")]
    Parse(#[from] calamine::Error),

    /// UTF-8文字列の変換エラー
    ///
    /// スタイルXMLの属性値をUTF-8文字列へ変換できなかった場合に発生します。
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// ZIPアーカイブの解析エラー
    ///
    /// XLSXファイル（ZIPアーカイブ）の解析中に発生したエラーです。
    #[error("ZIP archive error: {0}")]
    Zip(String),

    /// スタイル/ワークブックXMLの構造エラー
    #[error("XML parse error: {0}")]
    Xml(String),

    /// 数値の解析エラー
    ///
    /// XML属性の文字列から数値への変換に失敗した場合に発生します。
    #[error("Number parse error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    /// 設定の検証に失敗したエラー
    ///
    /// `ExtractorBuilder::build()`時に設定を検証し、無効な設定が検出された
    /// 場合に発生します。走査行数の上限が0、正解色が8桁の16進数でない、
    /// 判断シート名が重複している場合などです。
    #[error("Configuration error: {0}")]
    Config(String),

    /// 問題バンクの書き出し中に発生したエラー
    ///
    /// rust_xlsxwriterが出力ワークブックを構築・保存する際のエラーです。
    /// 出力はメモリ上で完結してから保存されるため、このエラーが発生しても
    /// 書きかけの出力ファイルは残りません。
    #[error("Failed to write question bank: {0}")]
    Bank(#[from] rust_xlsxwriter::XlsxError),

    /// セキュリティ制限に違反したエラー
    ///
    /// 入力ファイルサイズの上限、ZIPアーカイブ内のファイル数上限、
    /// パストラバーサル検出などの制限に違反した場合に発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}

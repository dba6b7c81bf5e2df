//! Parser Module
//!
//! 入力ワークブックの解析を担当するモジュール。セル値はcalamine、
//! フォント色はZIP + XML直接解析のサイドカーで取得します。

mod styles;
mod workbook;

pub(crate) use styles::FontColorSidecar;
pub(crate) use workbook::WorkbookParser;

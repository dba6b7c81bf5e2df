//! Public API Types
//!
//! 公開APIで使用する問題レコード型を定義するモジュール。

/// 問題の種別
///
/// 抽出された問題が選択式か判断式（正誤問題）かを表します。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionKind {
    /// 選択問題（A〜Dの選択肢を持つ）
    ///
    /// 選択肢シートから抽出されたすべての問題がこの種別になります。
    /// 正解はセルのフォント色で示され、複数の選択肢が正解として
    /// マークされている場合もこの種別のままです。
    SingleChoice,

    /// 判断問題（正誤の二択）
    ///
    /// 判断シートから抽出された問題です。答えは問題文からではなく、
    /// どのシートから読み取られたかで決まります。
    TrueFalse,
}

impl QuestionKind {
    /// 出力ワークブックの「类型」列に書き込まれるラベル
    ///
    /// # 戻り値
    ///
    /// * `"单选"` - 選択問題の場合
    /// * `"判断"` - 判断問題の場合
    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::SingleChoice => "单选",
            QuestionKind::TrueFalse => "判断",
        }
    }
}

/// 選択肢のキー（A〜D）
///
/// 選択肢行の先頭文字に対応します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    A,
    B,
    C,
    D,
}

impl OptionKey {
    /// すべてのキーを定義順（A, B, C, D）で並べた配列
    pub const ALL: [OptionKey; 4] = [OptionKey::A, OptionKey::B, OptionKey::C, OptionKey::D];

    /// 先頭文字からキーを解決
    ///
    /// # 戻り値
    ///
    /// * `Some(OptionKey)` - `'A'`〜`'D'`の場合
    /// * `None` - それ以外の文字の場合
    pub(crate) fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(OptionKey::A),
            'B' => Some(OptionKey::B),
            'C' => Some(OptionKey::C),
            'D' => Some(OptionKey::D),
            _ => None,
        }
    }

    /// `QuestionRecord::options`配列内のインデックス（0始まり）
    pub fn index(&self) -> usize {
        match self {
            OptionKey::A => 0,
            OptionKey::B => 1,
            OptionKey::C => 2,
            OptionKey::D => 3,
        }
    }

    /// キーの文字表現（`'A'`〜`'D'`）
    ///
    /// 正解欄への追記にはこの文字が使用されます。
    pub fn letter(&self) -> char {
        match self {
            OptionKey::A => 'A',
            OptionKey::B => 'B',
            OptionKey::C => 'C',
            OptionKey::D => 'D',
        }
    }
}

/// 正規化された問題レコード
///
/// 抽出処理の唯一の出力エンティティです。出力ワークブックの1データ行に
/// 対応します。
///
/// # フィールドの意味
///
/// * `prompt` - 問題行の生テキスト（先頭の番号マーカーを含む）
/// * `options` - 選択肢A〜Dの本文。判断問題ではすべて空文字列
/// * `answer` - 選択問題では正解としてマークされた選択肢文字の連結
///   （検出順、重複排除なし。例: `"A"`、`"AC"`）。判断問題ではシートに
///   対応付けられた固定の答えトークン
/// * `explanation` - 常に空文字列（出力列として予約）
///
/// レコードは一度出力された後は変更されません。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    /// 問題の種別
    pub kind: QuestionKind,

    /// 問題行の生テキスト
    pub prompt: String,

    /// 選択肢A〜Dの本文
    pub options: [String; 4],

    /// 答え（選択肢文字の連結、または固定トークン）
    pub answer: String,

    /// 解説（現状は常に空）
    pub explanation: String,
}

impl QuestionRecord {
    /// 判断問題レコードを生成
    ///
    /// 判断シートでは行ごとの蓄積はなく、問題行を検出した時点で
    /// 完結したレコードが生成されます。
    pub(crate) fn true_false(prompt: String, answer: String) -> Self {
        Self {
            kind: QuestionKind::TrueFalse,
            prompt,
            options: Default::default(),
            answer,
            explanation: String::new(),
        }
    }

    /// 指定キーの選択肢本文を取得
    pub fn option(&self, key: OptionKey) -> &str {
        &self.options[key.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(QuestionKind::SingleChoice.label(), "单选");
        assert_eq!(QuestionKind::TrueFalse.label(), "判断");
    }

    #[test]
    fn test_option_key_from_char() {
        assert_eq!(OptionKey::from_char('A'), Some(OptionKey::A));
        assert_eq!(OptionKey::from_char('D'), Some(OptionKey::D));
        assert_eq!(OptionKey::from_char('E'), None);
        assert_eq!(OptionKey::from_char('a'), None);
    }

    #[test]
    fn test_option_key_round_trip() {
        for key in OptionKey::ALL {
            assert_eq!(OptionKey::from_char(key.letter()), Some(key));
        }
    }

    #[test]
    fn test_true_false_record_has_empty_options() {
        let record = QuestionRecord::true_false("5、地球是圆的。".to_string(), "对".to_string());
        assert_eq!(record.kind, QuestionKind::TrueFalse);
        assert!(record.options.iter().all(|o| o.is_empty()));
        assert_eq!(record.answer, "对");
        assert!(record.explanation.is_empty());
    }

    #[test]
    fn test_option_accessor() {
        let mut record = QuestionRecord::true_false("1、".to_string(), "对".to_string());
        record.options[OptionKey::C.index()] = "Green".to_string();
        assert_eq!(record.option(OptionKey::C), "Green");
        assert_eq!(record.option(OptionKey::A), "");
    }
}

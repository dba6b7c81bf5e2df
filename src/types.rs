//! Types Module
//!
//! クレート内部で使用する共通データ型を定義するモジュール。

/// 正規化済みのARGBフォント色（8桁の16進数、大文字）
///
/// XLSXの`xl/styles.xml`に記録されるフォント色は`"FFFF0000"`のような
/// 8桁のARGB表記です。比較を単純にするため、生成時に大文字へ正規化します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ArgbColor(String);

impl ArgbColor {
    /// ARGB文字列を検証して正規化
    ///
    /// # 戻り値
    ///
    /// * `Ok(ArgbColor)` - ちょうど8桁の16進数の場合（大文字に正規化）
    /// * `Err(String)` - それ以外の場合
    pub fn parse(value: &str) -> Result<Self, String> {
        if value.len() != 8 || !value.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!(
                "Invalid ARGB color '{}': expected exactly 8 hex digits (e.g. FFFF0000)",
                value
            ));
        }
        Ok(Self(value.to_ascii_uppercase()))
    }

    /// 正規化済みのARGB文字列
    #[allow(dead_code)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 走査対象シートの第1列から読み取った1セル分の入力
///
/// 抽出アルゴリズムはこの型の列だけを消費するため、実際のワークブック
/// バックエンドなしでテストできます。`font_color`は選択肢セルの正解判定に
/// のみ使用されます。
#[derive(Debug, Clone)]
pub(crate) struct SourceCell {
    /// トリム済みのセルテキスト（空セルは空文字列）
    pub text: String,

    /// セルのフォント色（明示的なRGB指定がある場合のみ）
    pub font_color: Option<ArgbColor>,
}

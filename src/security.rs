//! Security Module
//!
//! ZIP bomb攻撃やパストラバーサル攻撃への対策を提供するモジュール。

/// セキュリティ設定
///
/// 入力ワークブック処理時の制限を定義します。
#[derive(Debug, Clone)]
pub(crate) struct SecurityConfig {
    /// ZIPアーカイブ内の最大ファイル数
    /// デフォルト: 10000
    pub max_file_count: usize,
    /// 入力ファイルの最大サイズ（バイト）
    /// デフォルト: 256MB (268_435_456 bytes)
    pub max_input_file_size: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_file_count: 10_000,
            max_input_file_size: 268_435_456, // 256MB
        }
    }
}

/// ファイルパスの検証
///
/// パストラバーサル攻撃を防ぐため、ZIPアーカイブ内のファイルパスを検証します。
///
/// # 戻り値
///
/// * `Ok(())` - パスが安全な場合
/// * `Err(String)` - パスが危険な場合（`..`や絶対パスを含む）
pub(crate) fn validate_zip_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("Empty path is not allowed".to_string());
    }

    if path.starts_with('/') || path.starts_with("C:\\") || path.starts_with("c:\\") {
        return Err(format!("Absolute path is not allowed: {}", path));
    }

    if path.contains("..") {
        return Err(format!("Path traversal detected: {}", path));
    }

    if path.contains('\\') {
        return Err(format!("Backslash in path is not allowed: {}", path));
    }

    Ok(())
}

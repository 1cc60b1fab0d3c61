//! API設定の定数定義

/// デフォルトの待ち受けアドレス
pub const DEFAULT_LISTEN_ADDR: &str = "localhost";

/// デフォルトの待ち受けポート
pub const DEFAULT_PORT: u16 = 8000;

/// デフォルトの辞書プリセット名
///
/// UniDic (CWJ) をデフォルトとして使用。
/// 現代日本語書き言葉コーパスに基づく辞書。
pub const DEFAULT_PRESET_DICT: &str = "unidic-cwj";

/// モデルロードの制限時間（秒）
///
/// 初回は辞書のダウンロードを含むため長めに取る。
pub const DEFAULT_LOAD_TIMEOUT_SECS: u64 = 300;

/// 一回の解析の制限時間（秒）
pub const DEFAULT_ANALYSIS_TIMEOUT_SECS: u64 = 30;

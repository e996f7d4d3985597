//! serve サブコマンド
//!
//! ゲートウェイサーバーを起動します。

use clap::Args;

/// serve サブコマンドの引数
///
/// 省略時は `FINQUERY_HOST` / `FINQUERY_PORT`（旧: `PORT`）の値を使う。
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Listen port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Bind address
    #[arg(short = 'H', long)]
    pub host: Option<String>,
}

#![cfg(feature = "usb")]

//! 共通: 実機テスト用ヘルパー
//!
//! `--features usb` でコンパイルされる実機テスト用。トイパッドが
//! 接続されていない環境（CI 等）では `Ok(None)` を返す。

use ldportal::{Error, Portal, Result};

/// トイパッドを開いて wake 済みの `Portal` を返す。
///
/// - Ok(Some(portal)) : デバイスが見つかり起動に成功
/// - Ok(None) : デバイスが見つからない（CI 等では許容）
/// - Err(e) : その他の致命的なエラー
pub fn open_portal() -> Result<Option<Portal>> {
    let _ = env_logger::builder().is_test(true).try_init();
    match Portal::open() {
        Ok(portal) => Ok(Some(portal)),
        Err(Error::DeviceNotFound) => Ok(None),
        Err(e) => Err(e),
    }
}

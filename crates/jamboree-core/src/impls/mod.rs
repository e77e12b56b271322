//! Impls - ports のプロセス内実装（開発用・テスト用・CLI 用）
//!
//! # 含まれる実装
//! - **InMemoryFlagStore** / **JsonFileFlagStore**: flag store
//! - **TracingNotifier** / **RecordingNotifier**: ユーザー通知
//! - **RecordingRollHost**: host の roll dialog の代役

pub mod inmem_flags;
pub mod json_file_flags;
pub mod notifiers;
pub mod roll_host;

pub use self::inmem_flags::InMemoryFlagStore;
pub use self::json_file_flags::JsonFileFlagStore;
pub use self::notifiers::{NoticeLevel, RecordingNotifier, TracingNotifier};
pub use self::roll_host::RecordingRollHost;

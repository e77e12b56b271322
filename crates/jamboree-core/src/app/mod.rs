//! App - アプリケーション層
//!
//! ports と tracker を組み合わせて、呼び出し側が使う表面を提供します。
//!
//! # 主要コンポーネント
//! - **TrackerBuilder**: config 検証と ports のワイヤリング
//! - **SkillCheckService**: roll を開いて結果を await する
//! - **GcLoop**: 古い pending roll の定期掃除
//! - **TrackerRuntime**: tracker + GcLoop の起動と停止

pub mod builder;
pub mod check_service;
pub mod gc_loop;
pub mod runtime;

// 主要な型を再エクスポート
pub use self::builder::TrackerBuilder;
pub use self::check_service::{SkillCheckService, TrackedRoll};
pub use self::gc_loop::GcLoop;
pub use self::runtime::TrackerRuntime;

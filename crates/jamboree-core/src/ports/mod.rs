//! Ports - 抽象化レイヤー
//!
//! host（仮想テーブルトップ）への境界を trait で定義します。
//! 実装は `impls`（プロセス内）と `systems`（ルールセットごと）にあります。
//!
//! # 設計原則
//! - tracker は host の API を直接触らない
//! - 時刻と ID はテストで差し替え可能

pub mod clock;
pub mod flag_store;
pub mod id_generator;
pub mod notifier;
pub mod roll_host;
pub mod skill_provider;

pub use self::clock::{Clock, ManualClock, SystemClock};
pub use self::flag_store::FlagStore;
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::notifier::Notifier;
pub use self::roll_host::{CheckHandle, RollHost};
pub use self::skill_provider::{CheckResult, NO_SKILL, SkillProvider, is_no_skill};

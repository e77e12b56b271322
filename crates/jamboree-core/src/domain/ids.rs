//! ドメイン識別子（型付き ID）
//!
//! ULID ベースの ID を Phantom type で型付けしています。
//!
//! ## ULID の特性
//! - **時刻でソート可能**: 生成順序 = queue 順序
//! - **プロセス内で一意**: timestamp + 80bit の乱数
//!
//! ## Phantom Type パターン
//! `Id<T>` で共通実装を持ちつつ、`T` はコンパイル時のマーカーとしてだけ使う。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use ulid::Ulid;

/// IdMarker は各 ID 型のマーカー trait
///
/// Display / FromStr で使うプレフィックス（"roll-" など）を提供します。
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// ジェネリック ID 型
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

/// `<prefix><ulid>` 形式でない文字列を parse したときのエラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed id: {0}")]
pub struct ParseIdError(pub String);

impl<T: IdMarker> FromStr for Id<T> {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .strip_prefix(T::prefix())
            .ok_or_else(|| ParseIdError(s.to_string()))?;
        let ulid = Ulid::from_string(raw).map_err(|_| ParseIdError(s.to_string()))?;
        Ok(Self::from_ulid(ulid))
    }
}

// ========================================
// マーカー型の定義
// ========================================

/// Tracked roll のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Roll {}

impl IdMarker for Roll {
    fn prefix() -> &'static str {
        "roll-"
    }
}

/// 追跡中の skill roll 1 件の correlation key
pub type RollId = Id<Roll>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roll_id_displays_with_prefix() {
        let ulid = Ulid::new();
        let id = RollId::from_ulid(ulid);

        assert_eq!(id.as_ulid(), ulid);
        assert_eq!(id.to_string(), format!("roll-{ulid}"));
    }

    #[test]
    fn roll_id_parses_its_own_display() {
        let id = RollId::from_ulid(Ulid::new());
        let parsed: RollId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn roll_id_rejects_foreign_prefix() {
        let ulid = Ulid::new();
        let err = format!("task-{ulid}").parse::<RollId>().unwrap_err();
        assert!(err.to_string().contains("task-"));
    }

    #[test]
    fn ulid_ids_are_sortable() {
        let id1 = RollId::from_ulid(Ulid::new());
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = RollId::from_ulid(Ulid::new());

        assert!(id1 < id2);
    }

    #[test]
    fn phantom_data_does_not_consume_memory() {
        use std::mem::size_of;
        assert_eq!(size_of::<RollId>(), size_of::<Ulid>());
    }
}

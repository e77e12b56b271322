//! Systems - one `SkillProvider` per supported ruleset.
//!
//! | system id         | skill lives at                         | check            |
//! |-------------------|----------------------------------------|------------------|
//! | `dragonbane`      | `items[type=skill].system.value`       | d20 roll-under   |
//! | `dnd5e`           | `system.skills.<key>.total` / `.mod`   | d20 + mod vs DC  |
//! | `pf2e`            | `system.skills.<key>.totalModifier`    | d20 + mod vs DC  |
//! | `forbidden-lands` | `system.skill.<key>.value`             | d6 pool, sixes   |
//! | anything else     | skills / abilities / attributes        | d20 + value vs DC|

pub mod dnd5e;
pub mod dragonbane;
pub mod forbidden_lands;
pub mod generic;
pub mod pf2e;
pub mod registry;

pub use self::dnd5e::Dnd5eProvider;
pub use self::dragonbane::DragonbaneProvider;
pub use self::forbidden_lands::ForbiddenLandsProvider;
pub use self::generic::GenericProvider;
pub use self::pf2e::Pf2eProvider;
pub use self::registry::{RegistryError, SystemRegistry, SystemRegistryBuilder};

use serde_json::Value;

/// DC used by d20 systems when the activity doesn't name one.
pub const DEFAULT_DC: i64 = 15;

/// Integer out of a JSON number, accepting whole floats.
pub(crate) fn as_int(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
}

/// `value[key]` where `value` is an object, without panicking on other shapes.
pub(crate) fn field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.as_object()?.get(key)
}

/// First integer found under any of `keys`.
pub(crate) fn first_int(value: &Value, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|k| field(value, k).and_then(as_int))
}

/// Integer to a non-negative speed.
pub(crate) fn as_speed(n: i64) -> Option<u32> {
    u32::try_from(n).ok().filter(|s| *s > 0)
}

//! Correlator - chat message → typed roll report
//!
//! `markup` is the fragile text-format boundary; `classify` only ever sees
//! what `markup` extracted.

pub mod classify;
pub mod markup;

pub use self::classify::classify;
pub use self::markup::{RollMarkup, looks_like_roll, parse_roll_markup};

//! Notifier port - user-visible toast messages
//!
//! Fire-and-forget: the host shows it or it doesn't, nobody waits.

pub trait Notifier: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
}

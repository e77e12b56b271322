//! SystemRegistry - system id -> SkillProvider
//!
//! # Fail-fast
//! - `expect_systems()` declares the system ids that must be present
//! - `build()` checks that every expected id was registered
//! - missing ids fail at startup; unknown ids at runtime get the generic provider

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::{
    Dnd5eProvider, DragonbaneProvider, ForbiddenLandsProvider, GenericProvider, Pf2eProvider,
};
use crate::config::MovementDefaults;
use crate::ports::SkillProvider;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Provider for system '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("Missing systems: {0:?}. These systems were expected but not registered.")]
    MissingSystems(Vec<String>),
}

/// Resolved providers, keyed by host system id.
pub struct SystemRegistry {
    providers: HashMap<String, Arc<dyn SkillProvider>>,
    fallback: Arc<dyn SkillProvider>,
}

impl SystemRegistry {
    pub fn builder(movement: MovementDefaults) -> SystemRegistryBuilder {
        SystemRegistryBuilder::new(movement)
    }

    /// All built-in rulesets.
    pub fn with_defaults(movement: MovementDefaults) -> Self {
        let mut builder = SystemRegistryBuilder::new(movement);
        for provider in builtin_providers(movement) {
            // ids of the built-ins are distinct
            let _ = builder.insert(provider);
        }
        builder.finish()
    }

    pub fn get(&self, system_id: &str) -> Option<Arc<dyn SkillProvider>> {
        self.providers.get(system_id).cloned()
    }

    /// Provider for `system_id`, or the generic one.
    pub fn provider_for(&self, system_id: &str) -> Arc<dyn SkillProvider> {
        match self.get(system_id) {
            Some(provider) => provider,
            None => {
                debug!(system_id, "no dedicated provider, using generic");
                self.fallback.clone()
            }
        }
    }

    pub fn registered_systems(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.providers.keys().cloned().collect();
        ids.sort();
        ids
    }
}

fn builtin_providers(movement: MovementDefaults) -> Vec<Arc<dyn SkillProvider>> {
    vec![
        Arc::new(DragonbaneProvider::new(movement)),
        Arc::new(Dnd5eProvider::new()),
        Arc::new(Pf2eProvider::new()),
        Arc::new(ForbiddenLandsProvider::new(movement)),
    ]
}

/// # Example
/// ```ignore
/// let registry = SystemRegistry::builder(movement)
///     .register(Arc::new(DragonbaneProvider::new(movement)))?
///     .expect_systems(&["dragonbane"])
///     .build()?;
/// ```
pub struct SystemRegistryBuilder {
    providers: HashMap<String, Arc<dyn SkillProvider>>,
    expected: Option<Vec<String>>,
    movement: MovementDefaults,
}

impl SystemRegistryBuilder {
    pub fn new(movement: MovementDefaults) -> Self {
        Self {
            providers: HashMap::new(),
            expected: None,
            movement,
        }
    }

    fn insert(&mut self, provider: Arc<dyn SkillProvider>) -> Result<(), RegistryError> {
        let id = provider.system_id().to_string();
        if self.providers.contains_key(&id) {
            return Err(RegistryError::AlreadyRegistered(id));
        }
        self.providers.insert(id, provider);
        Ok(())
    }

    pub fn register(mut self, provider: Arc<dyn SkillProvider>) -> Result<Self, RegistryError> {
        self.insert(provider)?;
        Ok(self)
    }

    pub fn expect_systems(mut self, system_ids: &[&str]) -> Self {
        self.expected = Some(system_ids.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn build(self) -> Result<SystemRegistry, RegistryError> {
        if let Some(expected) = &self.expected {
            let missing: Vec<String> = expected
                .iter()
                .filter(|id| !self.providers.contains_key(*id))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(RegistryError::MissingSystems(missing));
            }
        }
        Ok(self.finish())
    }

    fn finish(self) -> SystemRegistry {
        SystemRegistry {
            providers: self.providers,
            fallback: Arc::new(GenericProvider::new(self.movement)),
        }
    }
}

use super::api::{CommandAccess, CommandPlugin};
use crate::platform::CommandDeclaration;
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A command handler together with the access captured at load time
#[derive(Clone)]
pub struct CommandEntry {
    plugin: Arc<dyn CommandPlugin>,
    access: CommandAccess,
}

impl CommandEntry {
    pub fn plugin(&self) -> &Arc<dyn CommandPlugin> {
        &self.plugin
    }

    pub fn access(&self) -> &CommandAccess {
        &self.access
    }
}

/// Append-only builder used during the load phase
#[derive(Default)]
pub struct CommandTableBuilder {
    entries: HashMap<String, CommandEntry>,
    declarations: Vec<CommandDeclaration>,
}

impl CommandTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin under its declared name
    ///
    /// The declaration is validated, restricted commands are published
    /// with `default_permission = false`, and a second plugin claiming an
    /// existing name is rejected.
    pub fn insert(&mut self, plugin: Arc<dyn CommandPlugin>) -> Result<()> {
        let mut declaration = plugin.declaration();
        declaration.validate().map_err(Error::Load)?;

        let name = declaration.name.clone();
        if self.entries.contains_key(&name) {
            return Err(Error::DuplicateCommand { name });
        }

        let access = plugin.access();
        if access.is_restricted() {
            declaration.default_permission = false;
        }

        debug!(command = name.as_str(), restricted = access.is_restricted(), "Command registered");
        self.entries.insert(name, CommandEntry { plugin, access });
        self.declarations.push(declaration);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// End the load phase
    pub fn freeze(self) -> CommandTable {
        CommandTable {
            entries: self.entries,
            declarations: self.declarations,
        }
    }
}

/// Immutable name-keyed command table shared by the synchronizer and the dispatcher
pub struct CommandTable {
    entries: HashMap<String, CommandEntry>,
    declarations: Vec<CommandDeclaration>,
}

impl CommandTable {
    pub fn builder() -> CommandTableBuilder {
        CommandTableBuilder::new()
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Declarations in registration order
    pub fn declarations(&self) -> &[CommandDeclaration] {
        &self.declarations
    }

    /// Command names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.declarations.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn statistics(&self) -> TableStatistics {
        let restricted = self
            .entries
            .values()
            .filter(|entry| entry.access.is_restricted())
            .count();

        TableStatistics {
            total: self.entries.len(),
            restricted,
            unrestricted: self.entries.len() - restricted,
        }
    }
}

/// Statistics about loaded commands
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TableStatistics {
    pub total: usize,
    pub restricted: usize,
    pub unrestricted: usize,
}

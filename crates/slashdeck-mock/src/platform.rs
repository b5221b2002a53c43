use async_trait::async_trait;
use slashdeck::platform::{
    CommandDeclaration, GuildId, PermissionGrant, PlatformClient, PlatformError, RegisteredCommand,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Platform operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformOp {
    Push,
    Fetch,
    SetPermissions,
}

/// One call received by the mock, in arrival order
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformCall {
    Push {
        guild: GuildId,
        declarations: Vec<CommandDeclaration>,
    },
    Fetch {
        guild: GuildId,
    },
    SetPermissions {
        guild: GuildId,
        grants: Vec<PermissionGrant>,
    },
}

impl PlatformCall {
    pub fn guild(&self) -> &str {
        match self {
            PlatformCall::Push { guild, .. }
            | PlatformCall::Fetch { guild }
            | PlatformCall::SetPermissions { guild, .. } => guild,
        }
    }

    pub fn op(&self) -> PlatformOp {
        match self {
            PlatformCall::Push { .. } => PlatformOp::Push,
            PlatformCall::Fetch { .. } => PlatformOp::Fetch,
            PlatformCall::SetPermissions { .. } => PlatformOp::SetPermissions,
        }
    }
}

#[derive(Default)]
struct State {
    next_id: u64,
    commands: HashMap<GuildId, Vec<RegisteredCommand>>,
    lingering: HashMap<GuildId, Vec<RegisteredCommand>>,
    foreign: HashMap<GuildId, Vec<RegisteredCommand>>,
    permissions: HashMap<GuildId, Vec<PermissionGrant>>,
    calls: Vec<PlatformCall>,
    failures: HashSet<(GuildId, PlatformOp)>,
}

impl State {
    fn allocate_id(&mut self) -> String {
        self.next_id += 1;
        format!("{}", 1000 + self.next_id)
    }

    fn check(&self, guild: &GuildId, op: PlatformOp) -> Result<(), PlatformError> {
        if self.failures.contains(&(guild.clone(), op)) {
            return Err(PlatformError::Api {
                status: 500,
                message: format!("injected {:?} failure", op),
            });
        }
        Ok(())
    }
}

/// In-memory guild command registry with bulk-overwrite semantics
///
/// Pushing a declaration whose name is already registered keeps that
/// command's id, as the real platform does.
pub struct MockPlatform {
    application_id: String,
    state: Mutex<State>,
}

impl MockPlatform {
    pub fn new(application_id: &str) -> Self {
        Self {
            application_id: application_id.to_string(),
            state: Mutex::new(State::default()),
        }
    }

    /// A command owned by another application, returned on every fetch
    pub fn with_foreign_command(self, guild: &str, name: &str, application_id: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let id = state.allocate_id();
            state
                .foreign
                .entry(guild.to_string())
                .or_default()
                .push(RegisteredCommand {
                    id,
                    application_id: application_id.to_string(),
                    name: name.to_string(),
                    guild_id: Some(guild.to_string()),
                    description: String::new(),
                });
        }
        self
    }

    /// A command of this application that survives pushes, simulating drift
    pub fn with_lingering_command(self, guild: &str, name: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let id = state.allocate_id();
            let application_id = self.application_id.clone();
            state
                .lingering
                .entry(guild.to_string())
                .or_default()
                .push(RegisteredCommand {
                    id,
                    application_id,
                    name: name.to_string(),
                    guild_id: Some(guild.to_string()),
                    description: String::new(),
                });
        }
        self
    }

    /// Make one operation fail for one guild until [`MockPlatform::heal`]
    pub fn fail_on(&self, guild: &str, op: PlatformOp) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert((guild.to_string(), op));
    }

    pub fn heal(&self, guild: &str, op: PlatformOp) {
        self.state
            .lock()
            .unwrap()
            .failures
            .remove(&(guild.to_string(), op));
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn calls_for(&self, guild: &str) -> Vec<PlatformCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.guild() == guild)
            .collect()
    }

    /// This application's commands registered in the guild
    pub fn registered(&self, guild: &str) -> Vec<RegisteredCommand> {
        self.state
            .lock()
            .unwrap()
            .commands
            .get(guild)
            .cloned()
            .unwrap_or_default()
    }

    /// Permission state last pushed for the guild
    pub fn permissions(&self, guild: &str) -> Vec<PermissionGrant> {
        self.state
            .lock()
            .unwrap()
            .permissions
            .get(guild)
            .cloned()
            .unwrap_or_default()
    }

    /// Platform id of a registered command, including lingering and foreign ones
    pub fn id_of(&self, guild: &str, name: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        [&state.commands, &state.lingering, &state.foreign]
            .iter()
            .filter_map(|map| map.get(guild))
            .flatten()
            .find(|cmd| cmd.name == name)
            .map(|cmd| cmd.id.clone())
    }
}

#[async_trait]
impl PlatformClient for MockPlatform {
    fn application_id(&self) -> &str {
        &self.application_id
    }

    async fn push_declarations(
        &self,
        guild: &GuildId,
        declarations: &[CommandDeclaration],
    ) -> Result<Vec<RegisteredCommand>, PlatformError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(PlatformCall::Push {
            guild: guild.clone(),
            declarations: declarations.to_vec(),
        });
        state.check(guild, PlatformOp::Push)?;

        let previous = state.commands.remove(guild).unwrap_or_default();
        let mut next = Vec::with_capacity(declarations.len());
        for decl in declarations {
            let id = match previous.iter().find(|cmd| cmd.name == decl.name) {
                Some(existing) => existing.id.clone(),
                None => state.allocate_id(),
            };
            next.push(RegisteredCommand {
                id,
                application_id: self.application_id.clone(),
                name: decl.name.clone(),
                guild_id: Some(guild.clone()),
                description: decl.description.clone(),
            });
        }

        state.commands.insert(guild.clone(), next.clone());
        Ok(next)
    }

    async fn fetch_registered_commands(
        &self,
        guild: &GuildId,
    ) -> Result<Vec<RegisteredCommand>, PlatformError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(PlatformCall::Fetch {
            guild: guild.clone(),
        });
        state.check(guild, PlatformOp::Fetch)?;

        let mut fetched = Vec::new();
        for map in [&state.commands, &state.lingering, &state.foreign] {
            if let Some(cmds) = map.get(guild) {
                fetched.extend(cmds.iter().cloned());
            }
        }
        Ok(fetched)
    }

    async fn set_permissions(
        &self,
        guild: &GuildId,
        grants: &[PermissionGrant],
    ) -> Result<(), PlatformError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(PlatformCall::SetPermissions {
            guild: guild.clone(),
            grants: grants.to_vec(),
        });
        state.check(guild, PlatformOp::SetPermissions)?;

        state.permissions.insert(guild.clone(), grants.to_vec());
        Ok(())
    }
}

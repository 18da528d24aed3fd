//! In-memory directory used by the integration tests.
//!
//! A `MockServer` holds groups and call counters shared across invocations;
//! each invocation gets its own `MockDirectory` handle, as a real caller gets
//! its own connection.

#![allow(dead_code)]

use async_trait::async_trait;
use ldap_membership::connection::{Credentials, Endpoint};
use ldap_membership::protocol::{Entry, ProtocolError, ProtocolResult, ResultCode};
use ldap_membership::{ConnectionParameters, Directory, ProtocolVersion};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const ADMIN_DN: &str = "uid=admin,ou=system";
pub const ADMIN_PASSWORD: &str = "secret";
pub const USER_DN: &str = "CN=Test User,ou=users,dc=wimpi,dc=net";
pub const GROUP_DN: &str = "cn=admin,ou=roles,dc=wimpi,dc=net";
pub const MISSING_GROUP_DN: &str = "CN=Admins,DC=Example,DC=Com";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn params() -> ConnectionParameters {
    ConnectionParameters::builder("127.0.0.1")
        .port(10389)
        .credentials(ADMIN_DN, ADMIN_PASSWORD)
        .build()
}

pub fn tls_params() -> ConnectionParameters {
    ConnectionParameters::builder("127.0.0.1")
        .port(10389)
        .tls(true)
        .credentials(ADMIN_DN, ADMIN_PASSWORD)
        .build()
}

/// Calls made against the server, across all handles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Calls {
    pub connect: usize,
    pub start_tls: usize,
    pub stop_tls: usize,
    pub bind: usize,
    pub read: usize,
    pub modify_add: usize,
    pub disconnect: usize,
}

/// Step at which the server injects a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Connect,
    StartTls,
    StopTls,
    Bind,
    Read,
    ModifyAdd,
    Disconnect,
}

#[derive(Default)]
struct ServerState {
    /// group DN -> member values (None = no member attribute)
    groups: HashMap<String, Option<Vec<String>>>,
    calls: Calls,
    failures: HashMap<Step, ProtocolError>,
    hang_reads: bool,
    hang_modifies: bool,
    /// member added by "another writer" right after the next read
    concurrent_add: Option<String>,
    endpoints: Vec<Endpoint>,
    credentials: Vec<Credentials>,
}

#[derive(Clone, Default)]
pub struct MockServer {
    state: Arc<Mutex<ServerState>>,
}

impl MockServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group with a `member` attribute holding `members`
    pub fn with_group<I, S>(self, dn: &str, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lock()
            .groups
            .insert(dn.to_string(), Some(members.into_iter().map(Into::into).collect()));
        self
    }

    /// Group with no `member` attribute at all
    pub fn with_empty_group(self, dn: &str) -> Self {
        self.lock().groups.insert(dn.to_string(), None);
        self
    }

    pub fn fail_at(self, step: Step, code: ResultCode, message: &str) -> Self {
        self.lock()
            .failures
            .insert(step, ProtocolError::new(code, message));
        self
    }

    pub fn hang_reads(self) -> Self {
        self.lock().hang_reads = true;
        self
    }

    pub fn hang_modifies(self) -> Self {
        self.lock().hang_modifies = true;
        self
    }

    pub fn add_concurrently(self, member: &str) -> Self {
        self.lock().concurrent_add = Some(member.to_string());
        self
    }

    pub fn directory(&self) -> MockDirectory {
        MockDirectory {
            state: self.state.clone(),
            connected: false,
        }
    }

    pub fn calls(&self) -> Calls {
        self.lock().calls
    }

    pub fn members(&self, dn: &str) -> Option<Vec<String>> {
        self.lock().groups.get(dn).cloned().flatten()
    }

    pub fn endpoints(&self) -> Vec<Endpoint> {
        self.lock().endpoints.clone()
    }

    pub fn credentials(&self) -> Vec<Credentials> {
        self.lock().credentials.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ServerState> {
        self.state.lock().expect("mock server poisoned")
    }
}

pub struct MockDirectory {
    state: Arc<Mutex<ServerState>>,
    connected: bool,
}

impl MockDirectory {
    fn lock(&self) -> std::sync::MutexGuard<'_, ServerState> {
        self.state.lock().expect("mock server poisoned")
    }

    fn failure(&self, step: Step) -> ProtocolResult<()> {
        match self.lock().failures.get(&step) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Directory for MockDirectory {
    async fn connect(&mut self, endpoint: &Endpoint) -> ProtocolResult<()> {
        {
            let mut state = self.lock();
            state.calls.connect += 1;
            state.endpoints.push(endpoint.clone());
        }
        self.failure(Step::Connect)?;
        self.connected = true;
        Ok(())
    }

    async fn start_tls(&mut self) -> ProtocolResult<()> {
        self.lock().calls.start_tls += 1;
        self.failure(Step::StartTls)
    }

    async fn stop_tls(&mut self) -> ProtocolResult<()> {
        self.lock().calls.stop_tls += 1;
        self.failure(Step::StopTls)
    }

    async fn bind(
        &mut self,
        credentials: &Credentials,
        _version: ProtocolVersion,
    ) -> ProtocolResult<()> {
        {
            let mut state = self.lock();
            state.calls.bind += 1;
            state.credentials.push(credentials.clone());
        }
        self.failure(Step::Bind)
    }

    async fn read(&mut self, dn: &str, _attributes: &[&str]) -> ProtocolResult<Entry> {
        let hang = {
            let mut state = self.lock();
            state.calls.read += 1;
            state.hang_reads
        };
        if hang {
            std::future::pending::<()>().await;
        }
        self.failure(Step::Read)?;

        let mut state = self.lock();
        let members = state
            .groups
            .get(dn)
            .cloned()
            .ok_or_else(|| ProtocolError::new(ResultCode::NoSuchObject, ""))?;

        let mut entry = Entry::new(dn);
        if let Some(members) = members {
            entry = entry.with_attribute("member", members);
        }

        if let Some(member) = state.concurrent_add.take() {
            if let Some(group) = state.groups.get_mut(dn) {
                group.get_or_insert_with(Vec::new).push(member);
            }
        }

        Ok(entry)
    }

    async fn modify_add(&mut self, dn: &str, attribute: &str, value: &str) -> ProtocolResult<()> {
        let hang = {
            let mut state = self.lock();
            state.calls.modify_add += 1;
            state.hang_modifies
        };
        if hang {
            std::future::pending::<()>().await;
        }
        self.failure(Step::ModifyAdd)?;
        assert_eq!(attribute, "member");

        let mut state = self.lock();
        let group = state
            .groups
            .get_mut(dn)
            .ok_or_else(|| ProtocolError::new(ResultCode::NoSuchObject, ""))?;
        let members = group.get_or_insert_with(Vec::new);

        // DN values match the way a directory server compares them
        if members.iter().any(|m| m.eq_ignore_ascii_case(value)) {
            return Err(ProtocolError::new(ResultCode::AttributeOrValueExists, ""));
        }
        members.push(value.to_string());
        Ok(())
    }

    async fn disconnect(&mut self) -> ProtocolResult<()> {
        self.lock().calls.disconnect += 1;
        self.connected = false;
        self.failure(Step::Disconnect)
    }
}

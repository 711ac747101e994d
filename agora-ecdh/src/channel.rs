use crate::knowledge::{Knowledge, KnowledgeStore};

use anyhow::anyhow;
use log::{debug, info};
use serde::Serialize;

use std::io::{self, Write};

/// Name of the passive listener every channel starts with.
pub const EAVESDROPPER: &str = "Trudy";

const RULE_WIDTH: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(usize);

#[derive(Clone, Debug, Serialize)]
pub struct Agent {
    name: String,
    knowledge: KnowledgeStore,
}

impl Agent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            knowledge: KnowledgeStore::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn knowledge(&self) -> &KnowledgeStore {
        &self.knowledge
    }

    pub fn learn(&mut self, tag: impl Into<String>, value: impl Into<Knowledge>) {
        self.knowledge.insert(tag, value);
    }
}

/// Fan-out channel where every broadcast reaches every listener,
/// the eavesdropper included.
///
/// Listeners are owned by the channel and addressed through the
/// [`ListenerId`] handed out on registration. Delivery is synchronous and
/// follows registration order, with the eavesdropper always first.
#[derive(Clone, Debug)]
pub struct UnsecureChannel {
    listeners: Vec<Agent>,
}

impl Default for UnsecureChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl UnsecureChannel {
    pub fn new() -> Self {
        Self::with_eavesdropper(EAVESDROPPER)
    }

    pub fn with_eavesdropper(name: impl Into<String>) -> Self {
        Self {
            listeners: vec![Agent::new(name)],
        }
    }

    pub fn register(&mut self, name: impl Into<String>) -> ListenerId {
        self.listeners.push(Agent::new(name));
        ListenerId(self.listeners.len() - 1)
    }

    pub fn broadcast(&mut self, tag: &str, value: impl Into<Knowledge>) {
        let value = value.into();
        info!(
            "broadcast {} = {} to {} listeners",
            tag,
            value,
            self.listeners.len()
        );
        for listener in self.listeners.iter_mut() {
            listener.learn(tag, value.clone());
        }
    }

    /// Records knowledge with a single listener only.
    pub fn note(
        &mut self,
        id: ListenerId,
        tag: &str,
        value: impl Into<Knowledge>,
    ) -> Result<(), anyhow::Error> {
        let agent = self
            .listeners
            .get_mut(id.0)
            .ok_or_else(|| anyhow!("no such listener registered"))?;
        debug!("{} privately learns {}", agent.name, tag);
        agent.learn(tag, value);
        Ok(())
    }

    pub fn agent(&self, id: ListenerId) -> Option<&Agent> {
        self.listeners.get(id.0)
    }

    pub fn eavesdropper(&self) -> &Agent {
        &self.listeners[0]
    }

    pub fn listeners(&self) -> &[Agent] {
        &self.listeners
    }

    pub fn snapshot(&self) -> Vec<(&str, &KnowledgeStore)> {
        self.listeners
            .iter()
            .map(|agent| (agent.name(), agent.knowledge()))
            .collect()
    }

    pub fn dump<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let rule = "-".repeat(RULE_WIDTH);
        writeln!(out, "{}", rule)?;
        for (name, knowledge) in self.snapshot() {
            writeln!(out, "{:10} {}", format!("{}:", name), knowledge)?;
        }
        writeln!(out, "{}", rule)
    }
}

//! Agent naming and per-agent bookkeeping.

use crate::env::{EnvInfo, Observation};
use std::collections::HashMap;

/// Fixed mapping between agent names `player_{i}` and player ids.
#[derive(Clone, Debug)]
pub(crate) struct Roster {
    names: Vec<String>,
    ids: HashMap<String, usize>,
}

impl Roster {
    pub fn new(num_players: usize) -> Self {
        let names: Vec<String> = (0..num_players).map(|id| format!("player_{id}")).collect();
        let ids = names
            .iter()
            .enumerate()
            .map(|(id, name)| (name.clone(), id))
            .collect();
        Self { names, ids }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn name(&self, id: usize) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn id(&self, name: &str) -> Option<usize> {
        self.ids.get(name).copied()
    }
}

/// Everything the engine tracks for one live agent.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct AgentState {
    /// Reward from the most recent transition
    pub reward: f64,
    /// Reward accumulated since this agent last acted
    pub cumulative_reward: f64,
    pub terminated: bool,
    pub truncated: bool,
    /// Holds the action mask
    pub info: EnvInfo,
    /// `None` until the first observation refresh
    pub observation: Option<Observation>,
}

impl AgentState {
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }

    pub fn legal_action_count(&self) -> i64 {
        self.info.action_mask().iter().map(|&m| i64::from(m)).sum()
    }
}

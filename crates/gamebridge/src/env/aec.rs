//! Agent-environment-cycle (turn-taking) multi-agent contract.
//!
//! Exactly one agent, `agent_selection`, is expected to act at a time. The
//! controller peeks at that agent with `last()`, then calls `step()` with its
//! action. Finished agents stay on the roster until the controller steps them
//! once more with `None`, which drains them.

use super::{EnvInfo, Observation};
use crate::oracle::{ActionId, GameParameters};
use crate::spaces::DynSpace;
use crate::Result;
use std::sync::Arc;

/// What the selected agent sees before acting.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentStep {
    pub agent: String,
    pub observation: Option<Observation>,
    /// Reward accumulated since this agent last acted
    pub reward: f64,
    pub terminated: bool,
    pub truncated: bool,
    pub info: EnvInfo,
}

impl AgentStep {
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Turn-taking multi-agent environment.
pub trait AecEnv: Send {
    /// Every agent that may ever take part, fixed at construction
    fn possible_agents(&self) -> &[String];

    /// Live agents in order; shrinks as finished agents are drained
    fn agents(&self) -> &[String];

    fn num_agents(&self) -> usize {
        self.agents().len()
    }

    /// The agent expected to act next; `None` once the roster is empty
    fn agent_selection(&self) -> Option<&str>;

    fn reset(&mut self, seed: Option<u64>, options: Option<&GameParameters>) -> Result<()>;

    /// Advance the selected agent. `None` is the placeholder action for
    /// draining an agent that has already terminated or truncated.
    fn step(&mut self, action: Option<ActionId>) -> Result<()>;

    fn observe(&self, agent: &str) -> Option<&Observation>;

    fn reward(&self, agent: &str) -> Option<f64>;

    fn cumulative_reward(&self, agent: &str) -> Option<f64>;

    fn termination(&self, agent: &str) -> Option<bool>;

    fn truncation(&self, agent: &str) -> Option<bool>;

    fn info(&self, agent: &str) -> Option<&EnvInfo>;

    fn observation_space(&self, agent: &str) -> Result<Arc<DynSpace>>;

    fn action_space(&self, agent: &str) -> Result<Arc<DynSpace>>;

    /// Observation, cumulative reward, flags and info of the selected agent
    fn last(&self) -> Option<AgentStep> {
        let agent = self.agent_selection()?;
        Some(AgentStep {
            agent: agent.to_string(),
            observation: self.observe(agent).cloned(),
            reward: self.cumulative_reward(agent).unwrap_or(0.0),
            terminated: self.termination(agent).unwrap_or(false),
            truncated: self.truncation(agent).unwrap_or(false),
            info: self.info(agent).cloned().unwrap_or_default(),
        })
    }

    fn render(&self) -> Option<String> {
        None
    }

    fn close(&mut self) {}
}

/// Bounded iteration over agent selections.
///
/// ```rust,ignore
/// let mut cycle = AgentCycle::new(10_000);
/// while let Some(agent) = cycle.next(&env) {
///     let step = env.last().unwrap();
///     env.step(policy(&agent, &step))?;
/// }
/// ```
#[derive(Clone, Debug)]
pub struct AgentCycle {
    remaining: usize,
}

impl AgentCycle {
    pub fn new(max_iter: usize) -> Self {
        Self {
            remaining: max_iter,
        }
    }

    /// The next agent to act, or `None` when the roster is empty or the
    /// iteration cap is spent
    pub fn next<E: AecEnv + ?Sized>(&mut self, env: &E) -> Option<String> {
        if self.remaining == 0 || env.agents().is_empty() {
            return None;
        }
        let agent = env.agent_selection()?;
        self.remaining -= 1;
        Some(agent.to_string())
    }
}

impl Default for AgentCycle {
    fn default() -> Self {
        Self::new(usize::MAX)
    }
}

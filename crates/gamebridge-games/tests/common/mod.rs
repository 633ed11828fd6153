#![allow(dead_code)]

use gamebridge::prelude::*;
use gamebridge::oracle::ActionId;
use rand::rngs::StdRng;

/// Build an environment for a registered game from a JSON option object.
pub fn env_for(name: &str, options: &str) -> GameCompatibility {
    let registry = gamebridge_games::registry();
    let game_config: GameParameters = serde_json::from_str(options).unwrap();
    GameCompatibility::builder()
        .game_name(name)
        .game_config(game_config)
        .registry(&registry)
        .build()
        .unwrap()
}

/// The action a uniformly random masked policy takes for the selected agent:
/// `None` for a finished agent, otherwise a legal action.
pub fn random_action(env: &GameCompatibility, rng: &mut StdRng) -> Option<ActionId> {
    let step = env.last().unwrap();
    if step.done() {
        return None;
    }
    let space = env.action_space(&step.agent).unwrap();
    let action = space.sample_masked(rng, step.info.action_mask());
    assert!(action.is_some(), "{} has no legal action", step.agent);
    action
}

/// Everything an observer can see about one agent.
#[derive(Debug, PartialEq)]
pub struct AgentView {
    pub observation: Option<Observation>,
    pub reward: Option<f64>,
    pub cumulative_reward: Option<f64>,
    pub terminated: Option<bool>,
    pub truncated: Option<bool>,
    pub mask: Vec<i8>,
}

#[derive(Debug, PartialEq)]
pub struct Snapshot {
    pub selection: Option<String>,
    pub agents: Vec<String>,
    pub game_length: usize,
    pub views: Vec<AgentView>,
}

pub fn snapshot(env: &GameCompatibility) -> Snapshot {
    let views = env
        .possible_agents()
        .iter()
        .map(|agent| AgentView {
            observation: env.observe(agent).cloned(),
            reward: env.reward(agent),
            cumulative_reward: env.cumulative_reward(agent),
            terminated: env.termination(agent),
            truncated: env.truncation(agent),
            mask: env
                .info(agent)
                .map(|info| info.action_mask().to_vec())
                .unwrap_or_default(),
        })
        .collect();
    Snapshot {
        selection: env.agent_selection().map(str::to_string),
        agents: env.agents().to_vec(),
        game_length: env.game_length(),
        views,
    }
}

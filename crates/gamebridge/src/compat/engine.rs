//! Turn-management state machine over an extensive-form game oracle.

use super::agents::{AgentState, Roster};
use super::config::CompatConfig;
use super::observation::ObservationSource;
use crate::env::{AecEnv, EnvInfo, Observation};
use crate::oracle::{ActionId, Game, GameParameters, GameRegistry, GameState, OracleError};
use crate::spaces::{action_space_for, observation_space_for, DynSpace};
use crate::{BridgeError, Result};
use ndarray::Array1;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, warn};

#[derive(Default)]
struct SpaceCache {
    observation: BTreeMap<String, Arc<DynSpace>>,
    action: BTreeMap<String, Arc<DynSpace>>,
}

/// Presents an extensive-form game through the turn-taking `AecEnv` contract.
///
/// Chance nodes are sampled automatically with the episode's seeded
/// generator. At simultaneous nodes each live agent is selected in turn and
/// its action buffered; the oracle only transitions once every live agent
/// has supplied one. When the episode ends every agent is flagged together
/// and each is drained from `agents` by one more `step(None)`.
pub struct GameCompatibility {
    game: Arc<dyn Game>,
    config: CompatConfig,
    roster: Roster,
    observation_source: ObservationSource,
    spaces: RefCell<SpaceCache>,

    state: Option<Box<dyn GameState>>,
    rng: StdRng,
    game_length: usize,
    agents: Vec<String>,
    records: BTreeMap<usize, AgentState>,
    selection: Option<usize>,
    simultaneous_actions: BTreeMap<usize, Option<ActionId>>,
}

impl GameCompatibility {
    pub fn builder<'a>() -> GameCompatibilityBuilder<'a> {
        GameCompatibilityBuilder::default()
    }

    /// Wrap an already loaded game. `config.game_name` must be unset.
    pub fn new(game: Arc<dyn Game>, config: CompatConfig) -> Result<Self> {
        if config.game_name.is_some() {
            return Err(BridgeError::AmbiguousSource);
        }
        config.validate_render_mode()?;
        let observation_source = ObservationSource::for_game(game.as_ref())?;
        action_space_for(game.as_ref())?;

        let roster = Roster::new(game.num_players());
        Ok(Self {
            game,
            config,
            roster,
            observation_source,
            spaces: RefCell::new(SpaceCache::default()),
            state: None,
            rng: StdRng::from_entropy(),
            game_length: 0,
            agents: Vec::new(),
            records: BTreeMap::new(),
            selection: None,
            simultaneous_actions: BTreeMap::new(),
        })
    }

    pub fn game(&self) -> &Arc<dyn Game> {
        &self.game
    }

    pub fn config(&self) -> &CompatConfig {
        &self.config
    }

    /// Oracle transitions so far this episode, chance outcomes included.
    /// Starts at 1 on reset.
    pub fn game_length(&self) -> usize {
        self.game_length
    }

    /// The current oracle state, `None` before the first reset or after close
    pub fn game_state(&self) -> Option<&dyn GameState> {
        self.state.as_deref()
    }

    fn state_ref(&self) -> Result<&dyn GameState> {
        self.state.as_deref().ok_or(BridgeError::NoAgentSelected)
    }

    fn state_mut(&mut self) -> Result<&mut dyn GameState> {
        match self.state.as_deref_mut() {
            Some(state) => Ok(state),
            None => Err(BridgeError::NoAgentSelected),
        }
    }

    fn agent_id(&self, agent: &str) -> Result<usize> {
        self.roster
            .id(agent)
            .ok_or_else(|| BridgeError::UnknownAgent(agent.to_string()))
    }

    fn record(&self, agent: &str) -> Option<&AgentState> {
        self.records.get(&self.roster.id(agent)?)
    }

    fn live_ids(&self) -> Vec<usize> {
        self.agents
            .iter()
            .filter_map(|name| self.roster.id(name))
            .collect()
    }

    fn action_count(&self, agent: &str) -> Result<usize> {
        let space = self.action_space(agent)?;
        match space.as_discrete() {
            Some(discrete) => Ok(discrete.n),
            None => Err(BridgeError::ProtocolViolation(format!(
                "action space of {agent} is not discrete"
            ))),
        }
    }

    /// Apply a player transition, retrying a rejected action once when the
    /// config asks for it.
    fn apply<F>(&mut self, transition: F) -> Result<()>
    where
        F: Fn(&mut dyn GameState) -> std::result::Result<(), OracleError>,
    {
        let retry = self.config.retry_rejected_actions;
        let state = self.state_mut()?;
        match transition(&mut *state) {
            Err(err @ OracleError::InvalidAction { .. }) if retry => {
                warn!(%err, "Oracle rejected an action, retrying once");
                transition(state)?;
            }
            result => result?,
        }
        self.game_length += 1;
        Ok(())
    }

    fn execute_action_node(&mut self, agent: usize, action: Option<ActionId>) -> Result<()> {
        let name = self.roster.name(agent).unwrap_or_default().to_string();

        if self.state_ref()?.is_simultaneous_node() {
            self.simultaneous_actions.insert(agent, action);
            if let Some(record) = self.records.get_mut(&agent) {
                record.cumulative_reward = 0.0;
            }
            self.fill_placeholders();

            let live = self.live_ids();
            if live
                .iter()
                .all(|id| self.simultaneous_actions.contains_key(id))
            {
                let mut joint = vec![None; self.game.num_players()];
                for id in live {
                    if let Some(slot) = joint.get_mut(id) {
                        *slot = self.simultaneous_actions.get(&id).copied().flatten();
                    }
                }
                self.apply(|state| state.apply_actions(&joint))?;
                self.simultaneous_actions.clear();
            }
            return Ok(());
        }

        let action = action.ok_or(BridgeError::MissingAction(name))?;
        if let Some(record) = self.records.get_mut(&agent) {
            record.cumulative_reward = 0.0;
        }
        self.apply(|state| state.apply_action(action))
    }

    /// Buffer the no-action placeholder for live agents without a legal action.
    fn fill_placeholders(&mut self) {
        for id in self.live_ids() {
            let stuck = self
                .records
                .get(&id)
                .is_some_and(|record| record.legal_action_count() == 0);
            if stuck {
                self.simultaneous_actions.entry(id).or_insert(None);
            }
        }
    }

    fn execute_chance_nodes(&mut self) -> Result<()> {
        loop {
            let outcomes = {
                let state = self.state_ref()?;
                if !state.is_chance_node() {
                    return Ok(());
                }
                state.chance_outcomes()
            };

            let weights = WeightedIndex::new(outcomes.iter().map(|&(_, p)| p)).map_err(|e| {
                error!(error = %e, "Chance node has no usable distribution");
                BridgeError::ProtocolViolation(format!("invalid chance distribution: {e}"))
            })?;
            let (outcome, probability) = outcomes[weights.sample(&mut self.rng)];
            debug!(outcome, probability, "Sampled chance outcome");

            self.game_length += 1;
            self.state_mut()?.apply_action(outcome)?;
        }
    }

    fn update_action_masks(&mut self) -> Result<()> {
        let mut masks = Vec::with_capacity(self.agents.len());
        {
            let state = self.state_ref()?;
            for name in &self.agents {
                let id = self.agent_id(name)?;
                let mut mask = Array1::<i8>::zeros(self.action_count(name)?);
                match state.legal_actions(id) {
                    Ok(actions) => {
                        for action in actions {
                            let slot = mask.get_mut(action).ok_or_else(|| {
                                BridgeError::ProtocolViolation(format!(
                                    "legal action {action} of {name} is outside the action space"
                                ))
                            })?;
                            *slot = 1;
                        }
                    }
                    Err(err) => {
                        debug!(agent = %name, %err, "Legality check failed, no legal actions");
                    }
                }
                masks.push((id, mask));
            }
        }

        for (id, mask) in masks {
            if let Some(record) = self.records.get_mut(&id) {
                record.info = EnvInfo::with_action_mask(mask);
            }
        }
        Ok(())
    }

    fn update_observations(&mut self) -> Result<()> {
        let state = self.state_ref()?;
        if state.is_terminal() {
            return Ok(());
        }

        let mut fresh = Vec::with_capacity(self.agents.len());
        for id in self.live_ids() {
            fresh.push((id, self.observation_source.observe(state, id)?));
        }
        for (id, observation) in fresh {
            if let Some(record) = self.records.get_mut(&id) {
                record.observation = Some(observation);
            }
        }
        Ok(())
    }

    fn update_rewards(&mut self) -> Result<()> {
        let latest = self.state_ref()?.rewards();
        for id in self.live_ids() {
            let reward = latest.get(id).copied().unwrap_or(0.0);
            if let Some(record) = self.records.get_mut(&id) {
                record.reward = reward;
                record.cumulative_reward += reward;
            }
        }
        Ok(())
    }

    fn update_termination_truncation(&mut self) -> Result<()> {
        let game_over = {
            let state = self.state_ref()?;
            state.is_terminal() || state.current_player().is_game_over()
        };
        let truncate = self.game_length > self.game.max_game_length();

        for record in self.records.values_mut() {
            record.terminated |= game_over;
            record.truncated |= truncate;
        }
        self.terminate_if_stuck();
        Ok(())
    }

    /// Terminate every live agent when none of them has a legal action left.
    fn terminate_if_stuck(&mut self) {
        if self.records.is_empty() {
            return;
        }
        let legal: i64 = self
            .records
            .values()
            .map(AgentState::legal_action_count)
            .sum();
        if legal > 0 {
            return;
        }
        if self.records.values().any(|record| !record.terminated) {
            warn!(
                game = self.game.name(),
                "No live agent has a legal action, terminating"
            );
        }
        for record in self.records.values_mut() {
            record.terminated = true;
        }
    }

    fn choose_next_agent(&mut self) -> Result<()> {
        let Some(first) = self.agents.first() else {
            self.selection = None;
            return Ok(());
        };

        if self.records.values().any(AgentState::done) {
            self.selection = self.roster.id(first);
            return Ok(());
        }

        let (chance, simultaneous, player) = {
            let state = self.state_ref()?;
            (
                state.is_chance_node(),
                state.is_simultaneous_node(),
                state.current_player(),
            )
        };

        if chance {
            error!("Asked to select an agent on an undrained chance node");
            return Err(BridgeError::ProtocolViolation(
                "agent selection reached a chance node".into(),
            ));
        }

        if simultaneous {
            self.fill_placeholders();
            let next = self
                .live_ids()
                .into_iter()
                .find(|id| !self.simultaneous_actions.contains_key(id));
            return match next {
                Some(id) => {
                    self.selection = Some(id);
                    Ok(())
                }
                None => {
                    error!("Simultaneous node with every action already buffered");
                    Err(BridgeError::ProtocolViolation(
                        "no agent left to act at a simultaneous node".into(),
                    ))
                }
            };
        }

        match player.id().filter(|id| self.records.contains_key(id)) {
            Some(id) => {
                self.selection = Some(id);
                Ok(())
            }
            None => {
                error!(%player, "Oracle names no live agent to act");
                Err(BridgeError::ProtocolViolation(format!(
                    "cannot select an agent when the current player is {player}"
                )))
            }
        }
    }

    /// Drop a finished agent from the roster together with its bookkeeping.
    fn drain(&mut self, agent: usize) {
        if let Some(name) = self.roster.name(agent) {
            debug!(agent = name, "Removing finished agent");
            self.agents.retain(|a| a != name);
        }
        self.records.remove(&agent);
        self.simultaneous_actions.remove(&agent);
    }
}

impl AecEnv for GameCompatibility {
    fn possible_agents(&self) -> &[String] {
        self.roster.names()
    }

    fn agents(&self) -> &[String] {
        &self.agents
    }

    fn agent_selection(&self) -> Option<&str> {
        self.roster.name(self.selection?)
    }

    fn reset(&mut self, seed: Option<u64>, options: Option<&GameParameters>) -> Result<()> {
        self.rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        if options.is_some_and(|options| !options.is_empty()) {
            debug!("Reset options are not used by this environment");
        }
        debug!(game = self.game.name(), ?seed, "Resetting episode");

        self.agents = self.roster.names().to_vec();
        self.records = (0..self.agents.len())
            .map(|id| (id, AgentState::default()))
            .collect();
        self.simultaneous_actions.clear();
        self.selection = None;
        self.game_length = 1;
        self.state = Some(self.game.new_initial_state());

        self.execute_chance_nodes()?;
        self.update_action_masks()?;
        self.update_observations()?;
        self.choose_next_agent()
    }

    fn step(&mut self, action: Option<ActionId>) -> Result<()> {
        let agent = self.selection.ok_or(BridgeError::NoAgentSelected)?;

        if self.records.get(&agent).is_some_and(AgentState::done) {
            self.drain(agent);
            // The drained agent may have held the last legal actions
            self.terminate_if_stuck();
        } else {
            let length = self.game_length;
            self.execute_action_node(agent, action)?;
            self.execute_chance_nodes()?;
            self.update_action_masks()?;
            self.update_observations()?;
            // Rewards only change when the oracle transitioned
            if self.game_length > length {
                self.update_rewards()?;
            }
            self.update_termination_truncation()?;
        }
        self.choose_next_agent()
    }

    fn observe(&self, agent: &str) -> Option<&Observation> {
        self.record(agent)?.observation.as_ref()
    }

    fn reward(&self, agent: &str) -> Option<f64> {
        self.record(agent).map(|r| r.reward)
    }

    fn cumulative_reward(&self, agent: &str) -> Option<f64> {
        self.record(agent).map(|r| r.cumulative_reward)
    }

    fn termination(&self, agent: &str) -> Option<bool> {
        self.record(agent).map(|r| r.terminated)
    }

    fn truncation(&self, agent: &str) -> Option<bool> {
        self.record(agent).map(|r| r.truncated)
    }

    fn info(&self, agent: &str) -> Option<&EnvInfo> {
        self.record(agent).map(|r| &r.info)
    }

    fn observation_space(&self, agent: &str) -> Result<Arc<DynSpace>> {
        self.agent_id(agent)?;
        if let Some(space) = self.spaces.borrow().observation.get(agent) {
            return Ok(Arc::clone(space));
        }
        let space = Arc::new(observation_space_for(self.game.as_ref())?);
        self.spaces
            .borrow_mut()
            .observation
            .insert(agent.to_string(), Arc::clone(&space));
        Ok(space)
    }

    fn action_space(&self, agent: &str) -> Result<Arc<DynSpace>> {
        self.agent_id(agent)?;
        if let Some(space) = self.spaces.borrow().action.get(agent) {
            return Ok(Arc::clone(space));
        }
        let space = Arc::new(action_space_for(self.game.as_ref())?);
        self.spaces
            .borrow_mut()
            .action
            .insert(agent.to_string(), Arc::clone(&space));
        Ok(space)
    }

    fn render(&self) -> Option<String> {
        match self.config.render_mode.as_deref() {
            Some("ansi") => self.state.as_ref().map(|state| state.to_string()),
            _ => None,
        }
    }

    fn close(&mut self) {
        self.state = None;
        self.agents.clear();
        self.records.clear();
        self.simultaneous_actions.clear();
        self.selection = None;
    }
}

/// Builds a `GameCompatibility` from exactly one game source: a loaded game,
/// or a game name resolved through a registry.
#[derive(Default)]
pub struct GameCompatibilityBuilder<'a> {
    game: Option<Arc<dyn Game>>,
    config: CompatConfig,
    registry: Option<&'a GameRegistry>,
}

impl<'a> GameCompatibilityBuilder<'a> {
    pub fn game(mut self, game: Arc<dyn Game>) -> Self {
        self.game = Some(game);
        self
    }

    pub fn game_name(mut self, name: impl Into<String>) -> Self {
        self.config.game_name = Some(name.into());
        self
    }

    pub fn game_config(mut self, params: GameParameters) -> Self {
        self.config.game_config = params;
        self
    }

    pub fn render_mode(mut self, mode: impl Into<String>) -> Self {
        self.config.render_mode = Some(mode.into());
        self
    }

    pub fn retry_rejected_actions(mut self, retry: bool) -> Self {
        self.config.retry_rejected_actions = retry;
        self
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: CompatConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(mut self, registry: &'a GameRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn build(self) -> Result<GameCompatibility> {
        let Self {
            game,
            mut config,
            registry,
        } = self;

        let game = match (game, config.game_name.take()) {
            (Some(_), Some(_)) => return Err(BridgeError::AmbiguousSource),
            (Some(_), None) if !config.game_config.is_empty() => {
                return Err(BridgeError::AmbiguousSource)
            }
            (None, None) => return Err(BridgeError::MissingSource),
            (Some(game), None) => game,
            (None, Some(name)) => {
                let registry = registry.ok_or_else(|| BridgeError::UnknownGame(name.clone()))?;
                registry.load(&name, &config.game_config)?
            }
        };

        GameCompatibility::new(game, config)
    }
}

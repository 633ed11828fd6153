//! Scripted episodes through the turn-management engine.

mod common;

use common::env_for;
use gamebridge::prelude::*;
use gamebridge_games::{Catch, KuhnPoker, TicTacToe};
use std::sync::Arc;

const ROCK: usize = 0;
const PAPER: usize = 1;
const PASS: usize = 0;
const STOP: usize = 1;

#[test]
fn test_tic_tac_toe_win() {
    let mut env = GameCompatibility::builder()
        .game(Arc::new(TicTacToe::new()))
        .render_mode("ansi")
        .build()
        .unwrap();
    env.reset(Some(1), None).unwrap();

    assert_eq!(env.possible_agents(), ["player_0", "player_1"]);
    assert_eq!(env.agent_selection(), Some("player_0"));
    let board = env.observe("player_0").unwrap().as_array().unwrap();
    assert_eq!(board.shape(), &[3, 3, 3]);

    // x takes the top row while o plays the middle row
    let moves = [0, 3, 1, 4, 2];
    let expected = ["player_0", "player_1", "player_0", "player_1", "player_0"];
    for (action, agent) in moves.into_iter().zip(expected) {
        assert_eq!(env.agent_selection(), Some(agent));
        env.step(Some(action)).unwrap();
    }

    assert_eq!(env.render().unwrap(), "xxx\noo.\n...");
    for agent in ["player_0", "player_1"] {
        assert_eq!(env.termination(agent), Some(true));
        assert_eq!(env.truncation(agent), Some(false));
    }
    assert_eq!(env.reward("player_0"), Some(1.0));
    assert_eq!(env.reward("player_1"), Some(-1.0));
    assert_eq!(env.cumulative_reward("player_0"), Some(1.0));
    assert_eq!(env.cumulative_reward("player_1"), Some(-1.0));

    let last = env.last().unwrap();
    assert_eq!(last.agent, "player_0");
    assert!(last.terminated);
    assert_eq!(last.reward, 1.0);

    env.step(None).unwrap();
    assert_eq!(env.agents(), ["player_1"]);
    assert_eq!(env.agent_selection(), Some("player_1"));
    env.step(None).unwrap();
    assert!(env.agents().is_empty());
    assert_eq!(env.agent_selection(), None);
    assert!(matches!(env.step(None), Err(BridgeError::NoAgentSelected)));
}

#[test]
fn test_longest_tic_tac_toe_draw_also_truncates() {
    let mut env = env_for("tic_tac_toe", "{}");
    env.reset(Some(0), None).unwrap();
    //  x o x
    //  x o o
    //  o x x
    for action in [0, 1, 2, 4, 3, 5, 7, 6, 8] {
        env.step(Some(action)).unwrap();
    }
    assert_eq!(env.game_length(), 10);
    assert_eq!(env.termination("player_0"), Some(true));
    assert_eq!(env.truncation("player_0"), Some(true));
    assert_eq!(env.reward("player_0"), Some(0.0));
}

#[test]
fn test_kuhn_deal_happens_before_first_selection() {
    let mut env = GameCompatibility::builder()
        .game(Arc::new(KuhnPoker::new(2)))
        .build()
        .unwrap();
    env.reset(Some(9), None).unwrap();

    let state = env.game_state().unwrap();
    assert!(!state.is_chance_node());
    assert_eq!(env.game_length(), 3);
    assert_eq!(env.agent_selection(), Some("player_0"));

    let card = |agent: &str| {
        let tensor = env.observe(agent).unwrap().as_array().unwrap();
        assert_eq!(tensor.len(), 11);
        (0..3).find(|&c| tensor[[2 + c]] == 1.0).unwrap()
    };
    assert_ne!(card("player_0"), card("player_1"));

    env.step(Some(PASS)).unwrap();
    assert_eq!(env.agent_selection(), Some("player_1"));
    env.step(Some(PASS)).unwrap();
    assert_eq!(env.termination("player_0"), Some(true));
    let total = env.reward("player_0").unwrap() + env.reward("player_1").unwrap();
    assert_eq!(total, 0.0);
    assert_eq!(env.reward("player_0").unwrap().abs(), 1.0);
}

#[test]
fn test_tensor_observation_spaces_are_float32() {
    for (name, shape) in [("tic_tac_toe", vec![3, 3, 3]), ("kuhn_poker", vec![11])] {
        let env = env_for(name, "{}");
        let space = env.observation_space("player_0").unwrap();
        match &*space {
            DynSpace::Box(space) => {
                assert_eq!(space.dtype, DType::Float32, "{name}");
                assert_eq!(space.shape(), shape.as_slice(), "{name}");
            }
            other => panic!("{name}: expected a box space, got {other:?}"),
        }
    }
}

#[test]
fn test_kuhn_deal_is_seeded() {
    let deal = |seed| {
        let mut env = env_for("kuhn_poker", r#"{"players": 3}"#);
        env.reset(Some(seed), None).unwrap();
        env.game_state().unwrap().to_string()
    };
    assert_eq!(deal(4), deal(4));
    let deals: std::collections::BTreeSet<String> = (0..20).map(deal).collect();
    assert!(deals.len() > 1);
}

#[test]
fn test_draining_leaves_the_oracle_alone() {
    let mut env = env_for("kuhn_poker", "{}");
    env.reset(Some(2), None).unwrap();
    env.step(Some(PASS)).unwrap();
    env.step(Some(PASS)).unwrap();

    let state = env.game_state().unwrap().to_string();
    let length = env.game_length();
    let rewards = (env.reward("player_1"), env.cumulative_reward("player_1"));

    assert_eq!(env.agent_selection(), Some("player_0"));
    env.step(None).unwrap();

    assert_eq!(env.game_state().unwrap().to_string(), state);
    assert_eq!(env.game_length(), length);
    assert_eq!(env.agents(), ["player_1"]);
    assert_eq!(env.termination("player_0"), None);
    assert_eq!(
        (env.reward("player_1"), env.cumulative_reward("player_1")),
        rewards
    );
}

#[test]
fn test_live_agent_needs_an_action() {
    let mut env = env_for("kuhn_poker", "{}");
    env.reset(Some(0), None).unwrap();
    let err = env.step(None).unwrap_err();
    assert!(matches!(err, BridgeError::MissingAction(agent) if agent == "player_0"));
}

#[test]
fn test_simultaneous_round_applies_once_everyone_acted() {
    let mut env = env_for("rock_paper_scissors", r#"{"players": 3, "rounds": 2}"#);
    env.reset(Some(0), None).unwrap();
    let initial = env.game_state().unwrap().to_string();
    assert_eq!(initial, "round 0/2");

    for (agent, action) in [("player_0", ROCK), ("player_1", PAPER)] {
        assert_eq!(env.agent_selection(), Some(agent));
        env.step(Some(action)).unwrap();
        assert_eq!(env.game_state().unwrap().to_string(), initial);
        assert_eq!(env.game_length(), 1);
    }
    assert_eq!(env.agent_selection(), Some("player_2"));
    env.step(Some(ROCK)).unwrap();

    assert_eq!(
        env.game_state().unwrap().to_string(),
        "round 1/2 last rock paper rock"
    );
    assert_eq!(env.game_length(), 2);
    assert_eq!(env.agent_selection(), Some("player_0"));
    assert_eq!(env.reward("player_0"), Some(-1.0));
    assert_eq!(env.reward("player_1"), Some(2.0));
    assert_eq!(env.reward("player_2"), Some(-1.0));
}

#[test]
fn test_acting_clears_only_own_cumulative_reward() {
    let mut env = env_for("rock_paper_scissors", r#"{"players": 3, "rounds": 2}"#);
    env.reset(Some(0), None).unwrap();
    for action in [ROCK, PAPER, ROCK] {
        env.step(Some(action)).unwrap();
    }
    assert_eq!(env.cumulative_reward("player_1"), Some(2.0));

    env.step(Some(PAPER)).unwrap();
    assert_eq!(env.cumulative_reward("player_0"), Some(0.0));
    assert_eq!(env.cumulative_reward("player_1"), Some(2.0));
    assert_eq!(env.cumulative_reward("player_2"), Some(-1.0));
    // Buffering an action is not a transition
    assert_eq!(env.reward("player_0"), Some(-1.0));

    env.step(Some(PAPER)).unwrap();
    env.step(Some(ROCK)).unwrap();
    assert_eq!(env.cumulative_reward("player_0"), Some(1.0));
    assert_eq!(env.cumulative_reward("player_1"), Some(1.0));
    assert_eq!(env.cumulative_reward("player_2"), Some(-2.0));
    assert_eq!(env.termination("player_2"), Some(true));
}

#[test]
fn test_pig_always_stopping_hits_the_horizon() {
    let mut env = env_for("pig", r#"{"horizon": 5}"#);
    env.reset(Some(8), None).unwrap();
    for step in 1..=5 {
        assert_eq!(env.truncation("player_0"), Some(false));
        env.step(Some(STOP)).unwrap();
        assert_eq!(env.game_length(), 1 + step);
    }
    assert_eq!(env.truncation("player_0"), Some(true));
    assert_eq!(env.truncation("player_1"), Some(true));
    assert_eq!(env.termination("player_0"), Some(false));
}

#[test]
fn test_pig_roll_resolves_before_the_next_selection() {
    let mut env = env_for("pig", "{}");
    env.reset(Some(12), None).unwrap();
    env.step(Some(0)).unwrap();
    assert!(!env.game_state().unwrap().is_chance_node());
    // The roll and its die face both count
    assert_eq!(env.game_length(), 3);
    let text = env.observe("player_0").unwrap().as_text().unwrap();
    assert!(text.starts_with("scores 0 0"));
}

#[test]
fn test_config_from_json() {
    let config: CompatConfig = serde_json::from_str(
        r#"{
            "game_name": "rock_paper_scissors",
            "game_config": {"players": 4, "rounds": 3},
            "render_mode": "ansi"
        }"#,
    )
    .unwrap();
    let registry = gamebridge_games::registry();
    let mut env = GameCompatibility::builder()
        .config(config)
        .registry(&registry)
        .build()
        .unwrap();
    assert_eq!(env.possible_agents().len(), 4);
    env.reset(Some(0), None).unwrap();
    assert_eq!(env.render().unwrap(), "round 0/3");
    assert_eq!(env.game().max_game_length(), 3);
}

#[test]
fn test_bad_game_options_surface_from_the_loader() {
    let registry = gamebridge_games::registry();
    let mut options = GameParameters::new();
    options.insert("players".into(), 1i64.into());
    let result = GameCompatibility::builder()
        .game_name("kuhn_poker")
        .game_config(options)
        .registry(&registry)
        .build();
    assert!(matches!(result, Err(BridgeError::InvalidParameter { .. })));

    let result = GameCompatibility::builder()
        .game_name("chess")
        .registry(&registry)
        .build();
    assert!(matches!(result, Err(BridgeError::UnknownGame(name)) if name == "chess"));
}

#[test]
fn test_catch_through_dm_env_compatibility() {
    let env = DmEnvCompatibility::new(Catch::default()).unwrap();
    assert_eq!(env.observation_space().shape(), vec![10, 5]);
    assert_eq!(env.action_space().as_discrete().unwrap().n, 3);

    let mut env = gamebridge::env::EpisodeStats::new(env);
    let (observation, _) = env.reset(Some(4)).unwrap();
    assert!(env.observation_space().contains(&observation));

    let stay = Observation::Discrete(1);
    let mut steps = 0;
    let result = loop {
        let result = env.step(&stay).unwrap();
        steps += 1;
        if result.done() {
            break result;
        }
    };
    assert_eq!(steps, 9);
    assert!(result.terminated);
    assert!(!result.truncated);
    assert_eq!(result.reward.abs(), 1.0);
    assert_eq!(result.info.episode_length, Some(9));
    assert_eq!(result.info.episode_return, Some(result.reward));
}

#[test]
fn test_catch_time_limit_is_a_truncation() {
    let mut env = DmEnvCompatibility::new(Catch::default().with_time_limit(4)).unwrap();
    env.reset(Some(0)).unwrap();
    let mut last = None;
    for _ in 0..4 {
        last = Some(env.step(&Observation::Discrete(0)).unwrap());
    }
    let last = last.unwrap();
    assert!(last.truncated);
    assert!(!last.terminated);
}


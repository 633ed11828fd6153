//! gamebridge CLI
//!
//! Plays the built-in games through the turn-taking compatibility engine
//! with a random legal-action policy.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use tracing_subscriber::EnvFilter;

use gamebridge::oracle::ActionId;
use gamebridge::prelude::*;
use gamebridge_games::Catch;

/// Cap on agent selections in one episode
const MAX_CYCLES: usize = 100_000;

#[derive(Parser)]
#[command(name = "bridge")]
#[command(version, about = "gamebridge - turn-based games through a uniform env API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available games and environments
    List,

    /// Play one episode with a random policy, printing every move
    Play {
        /// Registered game name
        game: String,

        /// Seed for chance outcomes and the policy
        #[arg(long)]
        seed: Option<u64>,

        /// Game options as a JSON object, e.g. '{"players": 3}'
        #[arg(long)]
        config: Option<String>,
    },

    /// Evaluate a random policy over several episodes
    Eval {
        /// Registered game name
        game: String,

        /// Number of episodes
        #[arg(long, default_value = "10")]
        episodes: usize,

        #[arg(long, default_value = "0")]
        seed: u64,

        /// Game options as a JSON object
        #[arg(long)]
        config: Option<String>,
    },

    /// Run the single-agent Catch environment through the dm_env wrapper
    Catch {
        /// Number of episodes
        #[arg(long, default_value = "10")]
        episodes: usize,

        #[arg(long, default_value = "0")]
        seed: u64,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List => list_games()?,
        Commands::Play { game, seed, config } => play(&game, seed, config.as_deref())?,
        Commands::Eval {
            game,
            episodes,
            seed,
            config,
        } => eval(&game, episodes, seed, config.as_deref())?,
        Commands::Catch { episodes, seed } => catch(episodes, seed)?,
    }

    Ok(())
}

fn make_env(game: &str, config: Option<&str>, render: bool) -> Result<GameCompatibility> {
    let registry = gamebridge_games::registry();
    let options: GameParameters = match config {
        Some(json) => serde_json::from_str(json)
            .with_context(|| format!("game options must be a JSON object, got {json}"))?,
        None => GameParameters::new(),
    };

    let mut builder = GameCompatibility::builder()
        .game_name(game)
        .game_config(options)
        .registry(&registry);
    if render {
        builder = builder.render_mode("ansi");
    }
    Ok(builder.build()?)
}

/// The random policy: a uniformly chosen legal action, or the placeholder
/// for an agent that is already done.
fn choose(env: &GameCompatibility, step: &AgentStep, rng: &mut StdRng) -> Result<Option<ActionId>> {
    if step.done() {
        return Ok(None);
    }
    let space = env.action_space(&step.agent)?;
    match space.sample_masked(rng, step.info.action_mask()) {
        Some(action) => Ok(Some(action)),
        None => bail!("{} has no legal action", step.agent),
    }
}

/// Play one episode; returns each agent's total reward and the game length.
fn run_episode(
    env: &mut GameCompatibility,
    seed: Option<u64>,
    rng: &mut StdRng,
    verbose: bool,
) -> Result<(BTreeMap<String, f64>, usize)> {
    env.reset(seed, None)?;
    let mut returns: BTreeMap<String, f64> = BTreeMap::new();
    let mut cycle = AgentCycle::new(MAX_CYCLES);

    if verbose {
        if let Some(frame) = env.render() {
            println!("{frame}\n");
        }
    }

    while let Some(agent) = cycle.next(&*env) {
        let Some(step) = env.last() else { break };
        *returns.entry(agent.clone()).or_default() += step.reward;

        let action = choose(env, &step, rng)?;
        let length = env.game_length();
        env.step(action)?;

        if verbose {
            if let Some(action) = action {
                println!("{agent} plays {action}");
            }
            if env.game_length() > length {
                if let Some(frame) = env.render() {
                    println!("{frame}\n");
                }
            }
        }
    }

    if !env.agents().is_empty() {
        bail!("episode did not finish within {MAX_CYCLES} agent selections");
    }
    Ok((returns, env.game_length()))
}

fn list_games() -> Result<()> {
    let registry = gamebridge_games::registry();
    println!("Available games:");
    println!();
    for name in registry.names() {
        let game = registry.load(name, &GameParameters::new())?;
        println!(
            "  {:<20} {} ({} players by default)",
            name,
            game.game_type().long_name,
            game.num_players()
        );
    }
    println!();
    println!("Single-agent environments:");
    println!();
    println!("  {:<20} Catch (dm_env protocol)", "catch");
    Ok(())
}

fn play(game: &str, seed: Option<u64>, config: Option<&str>) -> Result<()> {
    let mut env = make_env(game, config, true)?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    tracing::info!(game, ?seed, "Playing one episode (random policy)");

    let (returns, length) = run_episode(&mut env, seed, &mut rng, true)?;

    println!("Game over at game length {length}");
    for (agent, total) in &returns {
        println!("  {agent}: {total}");
    }
    env.close();
    Ok(())
}

fn eval(game: &str, episodes: usize, seed: u64, config: Option<&str>) -> Result<()> {
    if episodes == 0 {
        bail!("--episodes must be at least 1");
    }
    let mut env = make_env(game, config, false)?;
    let mut rng = StdRng::seed_from_u64(seed);
    tracing::info!(game, episodes, seed, "Starting evaluation (random policy)");

    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    let mut total_length = 0;
    for episode in 0..episodes {
        let episode_seed = rng.gen();
        let (returns, length) = run_episode(&mut env, Some(episode_seed), &mut rng, false)?;
        tracing::debug!(episode, length, ?returns, "Episode finished");
        for (agent, value) in returns {
            *totals.entry(agent).or_default() += value;
        }
        total_length += length;
    }

    println!("Episodes: {episodes}");
    println!("Mean game length: {:.2}", total_length as f64 / episodes as f64);
    println!("Mean return per agent:");
    for (agent, total) in &totals {
        println!("  {agent}: {:.3}", total / episodes as f64);
    }
    tracing::info!("Evaluation complete");
    env.close();
    Ok(())
}

fn catch(episodes: usize, seed: u64) -> Result<()> {
    if episodes == 0 {
        bail!("--episodes must be at least 1");
    }
    let env = DmEnvCompatibility::new(Catch::default())?;
    let mut env = gamebridge::env::EpisodeStats::new(env);
    let mut rng = StdRng::seed_from_u64(seed);
    let action_space = env.action_space();
    tracing::info!(episodes, seed, "Running catch (random policy)");

    let mut caught = 0;
    let mut total_return = 0.0;
    for episode in 0..episodes {
        env.reset(Some(seed + episode as u64))?;
        loop {
            let action = action_space.sample(&mut rng);
            let result = env.step(&action)?;
            if result.done() {
                let ret = result.info.episode_return.unwrap_or(result.reward);
                if ret > 0.0 {
                    caught += 1;
                }
                total_return += ret;
                break;
            }
        }
    }

    println!("Episodes: {episodes}");
    println!("Caught: {caught}");
    println!("Mean return: {:.3}", total_return / episodes as f64);
    Ok(())
}

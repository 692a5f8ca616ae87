//! # Episode Runner
//!
//! Builds the task configuration from the command line, wraps the stacking
//! environment in a [`TimeLimit`], and drives it with the scripted
//! [`PickAndPlace`] controller.

use anyhow::{Context, Result};
use physics::{KinematicConfig, KinematicScene, Vec3};
use rl::stack::{StackEnv, TaskConfig};
use rl::{Env, Info, TimeLimit};
use serde::Serialize;
use stackbench::script::PickAndPlace;

use crate::Args;

#[derive(Serialize)]
struct StepRecord {
    episode: u32,
    step: u32,
    reward: f32,
    terminated: bool,
    truncated: bool,
    #[serde(flatten)]
    info: Info,
    ee: [f32; 3],
}

#[derive(Serialize, Default)]
struct Summary {
    episodes: u32,
    successes: u32,
    out_of_time: u32,
    total_reward: f32,
}

fn load_config(args: &Args) -> Result<TaskConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            TaskConfig::from_json(&json)?
        }
        None => TaskConfig { random_block_position: false, ..TaskConfig::default() },
    };
    if let Some(n) = args.num_blocks {
        config.num_blocks = n;
    }
    if let Some(reward_type) = args.reward_type {
        config.reward_type = reward_type;
    }
    if args.random_placement {
        config.random_block_position = true;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.validate()?;
    Ok(config)
}

fn ee_of(agent_pos: &[f32]) -> Vec3 {
    match agent_pos {
        [x, y, z, ..] => Vec3::new(*x, *y, *z),
        _ => Vec3::ZERO,
    }
}

/// Run `args.episodes` scripted episodes and print their records.
///
/// # Errors
///
/// Returns configuration, I/O and environment errors.
pub fn run(args: &Args) -> Result<()> {
    let config = load_config(args)?;
    let scene_config = KinematicConfig {
        num_blocks: config.num_blocks,
        block_half_height: config.block_half_height,
        ..KinematicConfig::default()
    };
    let action_scale = scene_config.action_scale;
    let half_height = config.block_half_height;
    let max_steps = config.max_episode_steps;
    let env = StackEnv::new(KinematicScene::new(scene_config), config)?;
    let mut env = TimeLimit::new(env, max_steps);

    tracing::info!("Running {} episode(s) of at most {} steps...", args.episodes, max_steps);
    let mut summary = Summary::default();
    for episode in 0..args.episodes {
        let seed = if episode == 0 { args.seed } else { None };
        let (obs, _) = env.reset(seed)?;
        let positions = env.inner().positions();
        let mut controller = match positions.as_slice() {
            [place, pick, ..] => PickAndPlace::new(*pick, *place, half_height, action_scale),
            _ => PickAndPlace::idle(action_scale),
        };

        let mut ee = ee_of(obs.agent_pos());
        for step in 1..=max_steps {
            let result = env.step(&controller.act(ee))?;
            ee = ee_of(result.observation.agent_pos());
            summary.total_reward += result.reward;
            if !args.quiet {
                let record = StepRecord {
                    episode,
                    step,
                    reward: result.reward,
                    terminated: result.terminated,
                    truncated: result.truncated,
                    info: result.info,
                    ee: ee.to_array(),
                };
                println!("{}", serde_json::to_string(&record)?);
            }
            if result.done() {
                if result.info.succeed == Some(true) && result.terminated {
                    summary.successes += 1;
                } else if result.truncated {
                    summary.out_of_time += 1;
                }
                tracing::info!("Episode {} finished after {} steps.", episode, step);
                break;
            }
        }
        summary.episodes += 1;
    }

    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}

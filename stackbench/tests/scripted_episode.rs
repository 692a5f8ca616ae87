use physics::{KinematicConfig, KinematicScene, Vec3};
use rl::stack::{RewardType, StackEnv, TaskConfig};
use rl::{Env, Step, TimeLimit};
use stackbench::script::PickAndPlace;

fn ee_of(agent_pos: &[f32]) -> Vec3 {
    Vec3::new(agent_pos[0], agent_pos[1], agent_pos[2])
}

/// Runs one scripted episode and returns the last step and its index.
fn run_episode(num_blocks: usize, reward_type: RewardType) -> (u32, Step<rl::stack::Observation>) {
    let scene_config = KinematicConfig { num_blocks, ..KinematicConfig::default() };
    let scale = scene_config.action_scale;
    let config = TaskConfig {
        num_blocks,
        reward_type,
        random_block_position: false,
        ..TaskConfig::default()
    };
    let limit = config.max_episode_steps;
    let h = config.block_half_height;
    let env = StackEnv::new(KinematicScene::new(scene_config), config).unwrap();
    let mut env = TimeLimit::new(env, limit);

    let (obs, _) = env.reset(Some(0)).unwrap();
    let positions = env.inner().positions();
    let mut controller = PickAndPlace::new(positions[1], positions[0], h, scale);
    let mut ee = ee_of(obs.agent_pos());
    for i in 1..=limit {
        let step = env.step(&controller.act(ee)).unwrap();
        ee = ee_of(step.observation.agent_pos());
        if step.done() {
            return (i, step);
        }
    }
    unreachable!("time limit always ends the episode");
}

#[test]
fn sparse_pick_and_place_earns_unit_reward() {
    for n in [2, 3] {
        let (steps, last) = run_episode(n, RewardType::Sparse);
        assert!(last.terminated, "n={n}");
        assert!(!last.truncated);
        assert!((last.reward - 1.0).abs() < f32::EPSILON);
        assert_eq!(last.info.succeed, Some(true));
        assert!(steps < 50, "took {steps} steps");
    }
}

#[test]
fn dense_episode_ends_once_stacked_while_held() {
    let (_, last) = run_episode(2, RewardType::Dense);
    assert!(last.terminated);
    assert_eq!(last.info.succeed, Some(true));
    // held stack: full lift plus the reduced stacking bonus
    assert!((last.reward - 0.65).abs() < 1e-3, "reward={}", last.reward);
}

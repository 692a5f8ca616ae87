use physics::{KinematicConfig, KinematicScene, PhysicsState, Robot, Vec3, GRIPPER_JOINT};

const H: f32 = 0.02;

#[test]
fn reset_restores_canonical_layout() {
    let mut scene = KinematicScene::new(KinematicConfig { num_blocks: 4, ..KinematicConfig::default() });
    let joint = scene.joint("block3").unwrap();
    let before = scene.joint_position(joint);

    scene.set_joint_position(joint, Vec3::new(0.1, 0.1, 0.4));
    scene.apply_action(&[1.0, 1.0, 1.0, 1.0]).unwrap();
    PhysicsState::reset(&mut scene);
    scene.reset_robot();

    assert_eq!(scene.joint_position(joint), before);
    assert!((before.z - H).abs() < f32::EPSILON);
    assert_eq!(scene.end_effector(), scene.config.home);
    assert!(scene.joint_scalar(scene.joint(GRIPPER_JOINT).unwrap()).abs() < f32::EPSILON);
}

#[test]
fn robot_state_has_declared_dimension() {
    let mut scene = KinematicScene::default();
    assert_eq!(scene.robot_state().len(), scene.state_dim());

    scene.apply_action(&[0.0, 0.0, -1.0, 1.0]).unwrap();
    let state = scene.robot_state();
    assert!((state[2] - (0.3 - 0.025)).abs() < 1e-6);
    assert!((state[5] + 0.25).abs() < 1e-5, "vz={}", state[5]);
    assert!((state[6] - 0.8).abs() < f32::EPSILON);
}

#[test]
fn grasped_block_follows_end_effector() {
    let mut scene = KinematicScene::default();
    let joint = scene.joint("block1").unwrap();
    let start = scene.joint_position(joint);

    scene.set_end_effector(start);
    scene.apply_action(&[0.0, 0.0, 0.0, 1.0]).unwrap();
    for _ in 0..4 {
        scene.apply_action(&[0.0, 0.0, 1.0, 1.0]).unwrap();
    }
    let lifted = scene.joint_position(joint);
    assert!((lifted.z - (start.z + 0.1)).abs() < 1e-6);

    scene.apply_action(&[0.0, 0.0, 0.0, 0.0]).unwrap();
    let dropped = scene.joint_position(joint);
    assert!((dropped.z - H).abs() < f32::EPSILON, "no support under the block");
}

#[test]
fn closing_far_from_blocks_grasps_nothing() {
    let mut scene = KinematicScene::default();
    scene.apply_action(&[0.0, 0.0, 0.0, 1.0]).unwrap();
    assert_eq!(scene.held_block(), None);
}

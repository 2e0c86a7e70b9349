use ndarray::array;

use super::fixtures::{counting_agent, CountingEnv, RecordingStore};
use crate::activations::Activation;
use crate::algorithms::{SacBuilder, SoftActorCritic};
use crate::config::TrainingConfig;
use crate::error::SacError;
use crate::network::{FeedForward, Network};
use crate::optimizer::OptimizerConfig;
use crate::types::DenseState;

#[test]
fn test_step_limit_bounds_endless_episode() {
    let mut agent = counting_agent(TrainingConfig::default().with_step_limit(7).with_exploration_steps(100));
    let episode_return = agent.episode().unwrap();

    assert_eq!(episode_return, 7.0);
    assert_eq!(agent.total_steps(), 7);
    assert_eq!(agent.replay().stored.len(), 7);
}

#[test]
fn test_terminal_state_ends_episode() {
    let mut agent = counting_agent(TrainingConfig::default().with_step_limit(0).with_exploration_steps(100));
    agent.environment_mut().terminal_at = Some(3.0);

    let episode_return = agent.episode().unwrap();

    assert_eq!(episode_return, 3.0);
    let terminals = agent.replay().stored.iter().map(|t| t.terminal).collect::<Vec<_>>();
    assert_eq!(terminals, vec![false, false, true]);
}

#[test]
fn test_transitions_record_state_before_and_after_step() {
    let mut agent = counting_agent(
        TrainingConfig::default()
            .with_step_limit(5)
            .with_exploration_steps(100)
            .with_discount(0.9),
    );
    agent.episode().unwrap();

    let stored = &agent.replay().stored;
    let actions = &agent.environment().actions_seen;
    assert_eq!(stored.len(), 5);
    for (i, transition) in stored.iter().enumerate() {
        assert_eq!(transition.state, DenseState::from_vec(vec![i as f32]));
        assert_eq!(transition.next_state, DenseState::from_vec(vec![i as f32 + 1.0]));
        assert_eq!(&transition.action, &actions[i]);
        assert_eq!(transition.reward, 1.0);
        assert_eq!(transition.discount, 0.9);
    }
    assert_eq!(agent.state(), Some(&DenseState::from_vec(vec![5.0])));
}

#[test]
fn test_no_learning_before_exploration_threshold() {
    let mut agent = counting_agent(TrainingConfig::default().with_step_limit(10).with_exploration_steps(5));
    agent.episode().unwrap();

    // Steps 5..=10 each trigger exactly one update.
    assert_eq!(agent.updates(), 6);
    assert_eq!(agent.replay().samples, 6);

    agent.episode().unwrap();
    assert_eq!(agent.total_steps(), 20);
    assert_eq!(agent.updates(), 16);
}

#[test]
fn test_threshold_spans_episodes() {
    let mut agent = counting_agent(TrainingConfig::default().with_step_limit(4).with_exploration_steps(6));
    agent.episode().unwrap();
    assert_eq!(agent.updates(), 0);

    agent.episode().unwrap();
    assert_eq!(agent.total_steps(), 8);
    assert_eq!(agent.updates(), 3);
}

#[test]
fn test_deterministic_mode_never_learns() {
    let mut agent = counting_agent(TrainingConfig::default().with_step_limit(10).with_exploration_steps(0));
    agent.set_deterministic(true);
    let policy = agent.policy().parameters().clone();

    agent.episode().unwrap();

    assert_eq!(agent.updates(), 0);
    assert_eq!(agent.replay().samples, 0);
    assert_eq!(agent.replay().stored.len(), 10);
    assert_eq!(agent.policy().parameters(), &policy);
}

#[test]
fn test_deterministic_actions_repeat() {
    let mut agent = counting_agent(TrainingConfig::default());
    agent.set_deterministic(true);
    agent.set_state(DenseState::from_vec(vec![2.0]));

    agent.select_action().unwrap();
    let first = agent.action().clone();
    agent.select_action().unwrap();

    assert_eq!(agent.action(), &first);
    let raw = agent.policy().predict(array![[2.0]].view()).unwrap();
    assert_eq!(first.values[0], raw[[0, 0]]);
}

#[test]
fn test_exploration_noise_is_clipped_uniform() {
    let mut agent = counting_agent(TrainingConfig::default().with_exploration_noise(0.1, 0.25));
    agent.set_state(DenseState::from_vec(vec![1.0]));
    let raw = agent.policy().predict(array![[1.0]].view()).unwrap()[[0, 0]];

    for _ in 0..50 {
        agent.select_action().unwrap();
        let noise = agent.action().values[0] - raw;
        assert!((-1e-6..=0.1 + 1e-6).contains(&noise), "noise {} out of range", noise);
    }

    let mut clipped = counting_agent(TrainingConfig::default().with_exploration_noise(1.0, 0.05));
    clipped.set_state(DenseState::from_vec(vec![1.0]));
    let raw = clipped.policy().predict(array![[1.0]].view()).unwrap()[[0, 0]];
    for _ in 0..50 {
        clipped.select_action().unwrap();
        assert!(clipped.action().values[0] - raw <= 0.05 + 1e-6);
    }
}

#[test]
fn test_builder_requires_every_part() {
    let result = SacBuilder::<CountingEnv, FeedForward, FeedForward, OptimizerConfig, RecordingStore>::new(
        TrainingConfig::default(),
    )
    .environment(CountingEnv::new())
    .build();

    assert!(matches!(result, Err(SacError::InvalidParameter { ref name, .. }) if name == "critic"));
}

#[test]
fn test_builder_builds_agent() {
    let agent = SacBuilder::new(TrainingConfig::default())
        .critic(FeedForward::new(&[2, 8, 1], &[Activation::Relu, Activation::Linear]).unwrap())
        .policy(FeedForward::new(&[1, 8, 1], &[Activation::Relu, Activation::Tanh]).unwrap())
        .replay(RecordingStore::new(2))
        .critic_optimizer(OptimizerConfig::Sgd)
        .policy_optimizer(OptimizerConfig::Sgd)
        .environment(CountingEnv::new())
        .build()
        .unwrap();

    assert_eq!(agent.total_steps(), 0);
    assert!(!agent.deterministic());
}

#[test]
fn test_policy_width_must_match_environment() {
    let result = SoftActorCritic::new(
        TrainingConfig::default(),
        FeedForward::new(&[3, 8, 1], &[Activation::Relu, Activation::Linear]).unwrap(),
        FeedForward::new(&[1, 8, 2], &[Activation::Relu, Activation::Tanh]).unwrap(),
        RecordingStore::new(2),
        OptimizerConfig::adam(),
        OptimizerConfig::adam(),
        CountingEnv::new(),
    );
    assert!(matches!(result, Err(SacError::DimensionMismatch { .. })));
}

#[test]
fn test_critic_width_mismatch_surfaces_on_update() {
    let mut agent = SoftActorCritic::new(
        TrainingConfig::default().with_step_limit(3).with_exploration_steps(1),
        FeedForward::new(&[3, 8, 1], &[Activation::Relu, Activation::Linear]).unwrap(),
        FeedForward::new(&[1, 8, 1], &[Activation::Relu, Activation::Tanh]).unwrap(),
        RecordingStore::new(2),
        OptimizerConfig::adam(),
        OptimizerConfig::adam(),
        CountingEnv::new(),
    )
    .unwrap();

    assert!(matches!(agent.episode(), Err(SacError::DimensionMismatch { .. })));
}

#[test]
fn test_invalid_config_rejected_at_construction() {
    let result = SoftActorCritic::new(
        TrainingConfig::default().with_target_network_sync_interval(0),
        FeedForward::new(&[2, 8, 1], &[Activation::Relu, Activation::Linear]).unwrap(),
        FeedForward::new(&[1, 8, 1], &[Activation::Relu, Activation::Tanh]).unwrap(),
        RecordingStore::new(2),
        OptimizerConfig::adam(),
        OptimizerConfig::adam(),
        CountingEnv::new(),
    );
    assert!(matches!(result, Err(SacError::InvalidParameter { .. })));
}

#[test]
fn test_infinite_noise_scale_rejected_at_construction() {
    let result = SoftActorCritic::new(
        TrainingConfig::default().with_exploration_noise(f32::INFINITY, 0.25),
        FeedForward::new(&[2, 8, 1], &[Activation::Relu, Activation::Linear]).unwrap(),
        FeedForward::new(&[1, 8, 1], &[Activation::Relu, Activation::Tanh]).unwrap(),
        RecordingStore::new(2),
        OptimizerConfig::adam(),
        OptimizerConfig::adam(),
        CountingEnv::new(),
    );
    assert!(matches!(
        result,
        Err(SacError::InvalidParameter { ref name, .. }) if name == "exploration_noise_scale"
    ));
}

#[test]
fn test_environment_failure_keeps_current_state() {
    let mut agent = counting_agent(TrainingConfig::default().with_step_limit(10).with_exploration_steps(100));
    agent.environment_mut().fail_at = Some(2.0);

    let result = agent.episode();

    assert!(matches!(result, Err(SacError::Environment(_))));
    assert_eq!(agent.state(), Some(&DenseState::from_vec(vec![2.0])));
    assert_eq!(agent.total_steps(), 2);
    assert_eq!(agent.replay().stored.len(), 2);
}

use ndarray::{s, Array1, Array2, ArrayView1, Axis, Zip};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, trace};

use crate::config::{GradientAggregation, PolicyGradientSeed, TrainingConfig};
use crate::environment::Environment;
use crate::error::{Result, SacError};
use crate::loss::{Loss, MeanSquaredError};
use crate::network::{CriticInput, Network};
use crate::optimizer::{Optimizer, Updater};
use crate::replay_buffer::{TransitionBatch, TransitionStore};
use crate::types::{ContinuousAction, State, Transition};

/// Soft Actor-Critic training loop for continuous action spaces.
///
/// The agent owns a deterministic policy, two independently parameterised
/// learning critics, a slowly tracking target copy of each critic, one updater
/// per trained network, the transition store and the environment.
///
/// Every environment step stores exactly one transition. Once the lifetime step
/// counter reaches `exploration_steps`, each non-deterministic step also runs one
/// learning update: both critics regress onto the clipped double-Q target built
/// from the *target* critics, then the policy ascends the value of whichever
/// learning critic is lower for each sampled state. Targets move only through
/// [`SoftActorCritic::soft_update`], which runs whenever the lifetime step counter
/// is a multiple of `target_network_sync_interval`.
///
/// # Example
///
/// ```rust,no_run
/// use sacrl::activations::Activation;
/// use sacrl::algorithms::SoftActorCritic;
/// use sacrl::config::TrainingConfig;
/// use sacrl::environment::{Pendulum, PendulumState};
/// use sacrl::network::FeedForward;
/// use sacrl::optimizer::OptimizerConfig;
/// use sacrl::replay_buffer::ReplayBuffer;
///
/// let critic = FeedForward::new(&[4, 64, 64, 1], &[Activation::Relu, Activation::Relu, Activation::Linear]).unwrap();
/// let policy = FeedForward::new(&[3, 64, 64, 1], &[Activation::Relu, Activation::Relu, Activation::Tanh]).unwrap();
///
/// let mut agent = SoftActorCritic::new(
///     TrainingConfig::default(),
///     critic,
///     policy,
///     ReplayBuffer::<PendulumState>::new(10_000, 32).unwrap(),
///     OptimizerConfig::adam(),
///     OptimizerConfig::adam(),
///     Pendulum::new(),
/// )
/// .unwrap();
///
/// for _ in 0..10 {
///     let episode_return = agent.episode().unwrap();
///     println!("return {episode_return}");
/// }
/// ```
pub struct SoftActorCritic<E, Q, P, O, R>
where
    E: Environment,
    Q: Network,
    P: Network,
    O: Optimizer,
    R: TransitionStore<E::State>,
{
    config: TrainingConfig,
    learning_q1: Q,
    learning_q2: Q,
    target_q1: Q,
    target_q2: Q,
    policy: P,
    replay: R,
    q1_updater: O::Updater,
    q2_updater: O::Updater,
    policy_updater: O::Updater,
    environment: E,
    loss: MeanSquaredError,
    state: Option<E::State>,
    action: ContinuousAction,
    total_steps: usize,
    updates: usize,
    deterministic: bool,
    rng: StdRng,
}

impl<E, Q, P, O, R> SoftActorCritic<E, Q, P, O, R>
where
    E: Environment,
    Q: Network,
    P: Network,
    O: Optimizer,
    R: TransitionStore<E::State>,
{
    /// Create an agent.
    ///
    /// Empty parameter blocks are initialised, the second critic is a clone of
    /// `critic` with freshly reset parameters, and each target starts as a copy
    /// of its learning critic. `critic_optimizer` is bound twice so the critics
    /// keep separate updater state.
    pub fn new(
        config: TrainingConfig,
        mut critic: Q,
        mut policy: P,
        replay: R,
        critic_optimizer: O,
        policy_optimizer: O,
        environment: E,
    ) -> Result<Self> {
        config.validate()?;

        if critic.parameters().is_empty() {
            critic.reset_parameters();
        }
        let mut learning_q2 = critic.clone();
        learning_q2.reset_parameters();
        if policy.parameters().is_empty() {
            policy.reset_parameters();
        }

        let action_dim = environment.action_dim();
        if policy.output_size() != action_dim {
            return Err(SacError::dimension_mismatch(
                format!("policy output of width {}", action_dim),
                format!("policy output of width {}", policy.output_size()),
            ));
        }
        if critic.output_size() != 1 {
            return Err(SacError::dimension_mismatch(
                "critic output of width 1".to_string(),
                format!("critic output of width {}", critic.output_size()),
            ));
        }
        if critic.input_size() <= action_dim {
            return Err(SacError::dimension_mismatch(
                format!("critic input wider than {} action features", action_dim),
                format!("critic input of width {}", critic.input_size()),
            ));
        }

        let q1_updater = critic_optimizer.bind(critic.parameters());
        let q2_updater = critic_optimizer.bind(learning_q2.parameters());
        let policy_updater = policy_optimizer.bind(policy.parameters());

        let target_q1 = critic.clone();
        let target_q2 = learning_q2.clone();

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        info!(
            critic_parameters = critic.parameters().len(),
            policy_parameters = policy.parameters().len(),
            action_dim,
            "created soft actor-critic agent"
        );

        Ok(SoftActorCritic {
            config,
            learning_q1: critic,
            learning_q2,
            target_q1,
            target_q2,
            policy,
            replay,
            q1_updater,
            q2_updater,
            policy_updater,
            environment,
            loss: MeanSquaredError,
            state: None,
            action: ContinuousAction::zeros(action_dim),
            total_steps: 0,
            updates: 0,
            deterministic: false,
            rng,
        })
    }

    /// Run one episode to completion and return its undiscounted return.
    pub fn episode(&mut self) -> Result<f32> {
        self.state = Some(self.environment.initial_sample()?);

        let mut steps = 0usize;
        let mut total_return = 0.0f32;

        while let Some(state) = self.state.as_ref() {
            if self.environment.is_terminal(state) || self.config.step_limit_reached(steps) {
                break;
            }
            self.select_action()?;

            let current = self.state.as_ref().ok_or_else(Self::missing_state)?;
            let (next_state, reward) = self.environment.sample(current, &self.action)?;

            total_return += reward;
            steps += 1;
            self.total_steps += 1;

            let terminal = self.environment.is_terminal(&next_state);
            let state = self.state.replace(next_state.clone()).ok_or_else(Self::missing_state)?;
            self.replay.store(Transition {
                state,
                action: self.action.clone(),
                reward,
                next_state,
                terminal,
                discount: self.config.discount,
            })?;

            if self.deterministic || self.total_steps < self.config.exploration_steps {
                continue;
            }
            self.update()?;
        }

        debug!(
            steps,
            total_steps = self.total_steps,
            episode_return = total_return,
            "episode finished"
        );
        Ok(total_return)
    }

    /// Set the current action from the current state through the policy.
    ///
    /// Outside deterministic mode, uniform noise from `[0, exploration_noise_scale]`
    /// is clamped to `±exploration_noise_clip` and added to every component.
    pub fn select_action(&mut self) -> Result<()> {
        let state = self.state.as_ref().ok_or_else(Self::missing_state)?;
        let encoded = state.encode().insert_axis(Axis(0));
        let output = self.policy.predict(encoded.view())?;

        let mut action = output.row(0).to_owned();
        if action.len() != self.action.len() {
            return Err(SacError::dimension_mismatch(
                format!("{} action components", self.action.len()),
                format!("{} action components", action.len()),
            ));
        }

        if !self.deterministic {
            let clip = self.config.exploration_noise_clip;
            let noise = Array1::random_using(
                action.len(),
                Uniform::new_inclusive(0.0, self.config.exploration_noise_scale),
                &mut self.rng,
            )
            .mapv(|n: f32| n.clamp(-clip, clip));
            action += &noise;
        }

        self.action = ContinuousAction::new(action);
        Ok(())
    }

    /// Run one learning update from a freshly sampled minibatch.
    pub fn update(&mut self) -> Result<()> {
        let batch = self.replay.sample()?;

        let (q1_loss, q2_loss) = self.update_critics(&batch)?;
        let policy_value = self.update_policy(&batch)?;
        self.updates += 1;

        trace!(
            update = self.updates,
            batch = batch.len(),
            q1_loss,
            q2_loss,
            policy_value,
            "learning update"
        );

        if self.total_steps % self.config.target_network_sync_interval == 0 {
            self.soft_update(self.config.soft_update_rate);
            debug!(total_steps = self.total_steps, rho = self.config.soft_update_rate, "synchronised target critics");
        }
        Ok(())
    }

    /// Move each target critic towards its learning critic:
    /// `target = (1 - rho) * target + rho * learning`.
    pub fn soft_update(&mut self, rho: f32) {
        blend(self.target_q1.parameters_mut(), self.learning_q1.parameters(), rho);
        blend(self.target_q2.parameters_mut(), self.learning_q2.parameters(), rho);
    }

    /// Regress both learning critics onto the shared clipped double-Q target.
    /// Returns the two regression losses.
    fn update_critics(&mut self, batch: &TransitionBatch) -> Result<(f32, f32)> {
        let next_actions = self.policy.predict(batch.next_states.view())?;
        let target_input = CriticInput::join(next_actions.view(), batch.next_states.view())?;
        let target_q1 = self.target_q1.predict(target_input.view())?;
        let target_q2 = self.target_q2.predict(target_input.view())?;

        let targets = bootstrap_targets(
            batch.rewards.view(),
            batch.terminals.view(),
            target_q1.column(0),
            target_q2.column(0),
            self.config.discount,
        )?
        .insert_axis(Axis(1));

        let learning_input = CriticInput::join(batch.actions.view(), batch.states.view())?;
        let q1 = self.learning_q1.forward(learning_input.view())?;
        let q2 = self.learning_q2.forward(learning_input.view())?;

        let q1_loss = self.loss.compute_batch(q1.view(), targets.view());
        let q2_loss = self.loss.compute_batch(q2.view(), targets.view());
        let q1_error = self.loss.gradient_batch(q1.view(), targets.view());
        let q2_error = self.loss.gradient_batch(q2.view(), targets.view());

        let step_size = self.config.step_size;
        let gradient_q1 = self.learning_q1.backward(learning_input.view(), q1_error.view())?;
        self.q1_updater
            .update(self.learning_q1.parameters_mut(), step_size, gradient_q1.parameters.view())?;
        let gradient_q2 = self.learning_q2.backward(learning_input.view(), q2_error.view())?;
        self.q2_updater
            .update(self.learning_q2.parameters_mut(), step_size, gradient_q2.parameters.view())?;

        Ok((q1_loss, q2_loss))
    }

    /// Deterministic policy gradient through the lower of the two learning
    /// critics for each sampled state, seeded per `policy_gradient_seed`.
    /// Returns the mean critic value of the policy's actions before the step.
    fn update_policy(&mut self, batch: &TransitionBatch) -> Result<f32> {
        let states = &batch.states;
        let batch_size = states.nrows();

        let pi = self.policy.predict(states.view())?;
        let q_input = CriticInput::join(pi.view(), states.view())?;
        let q1 = self.learning_q1.predict(q_input.view())?;
        let q2 = self.learning_q2.predict(q_input.view())?;

        let mut gradient = Array1::<f32>::zeros(self.policy.parameters().len());
        let mut value = 0.0f32;

        for i in 0..batch_size {
            let single_state = states.slice(s![i..i + 1, ..]);
            let single_pi = self.policy.forward(single_state)?;
            let input = CriticInput::join(single_pi.view(), single_state)?;

            let critic = if q1[[i, 0]] < q2[[i, 0]] {
                &mut self.learning_q1
            } else {
                &mut self.learning_q2
            };
            let q = critic.forward(input.view())?;
            value += q[[0, 0]];

            let seed = match self.config.policy_gradient_seed {
                PolicyGradientSeed::NegatedValue => q.mapv(|v| -v),
                PolicyGradientSeed::NegativeOne => Array2::from_elem(q.dim(), -1.0f32),
            };
            let critic_gradient = critic.backward(input.view(), seed.view())?;

            let action_gradient = input.action_gradient(critic_gradient.input.view())?;
            let policy_gradient = self.policy.backward(single_state, action_gradient.view())?;
            gradient += &policy_gradient.parameters;
        }

        if self.config.gradient_aggregation == GradientAggregation::Mean && batch_size > 0 {
            gradient /= batch_size as f32;
        }

        self.policy_updater
            .update(self.policy.parameters_mut(), self.config.step_size, gradient.view())?;

        Ok(value / batch_size.max(1) as f32)
    }

    fn missing_state() -> SacError {
        SacError::invalid_parameter("state", "no current state; call episode() or set_state() first")
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Lifetime environment steps, never reset between episodes.
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Number of learning updates run so far.
    pub fn updates(&self) -> usize {
        self.updates
    }

    pub fn deterministic(&self) -> bool {
        self.deterministic
    }

    /// Evaluation mode: no exploration noise and no learning.
    pub fn set_deterministic(&mut self, deterministic: bool) {
        self.deterministic = deterministic;
    }

    pub fn state(&self) -> Option<&E::State> {
        self.state.as_ref()
    }

    pub fn set_state(&mut self, state: E::State) {
        self.state = Some(state);
    }

    pub fn action(&self) -> &ContinuousAction {
        &self.action
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn learning_q1(&self) -> &Q {
        &self.learning_q1
    }

    pub fn learning_q2(&self) -> &Q {
        &self.learning_q2
    }

    pub fn target_q1(&self) -> &Q {
        &self.target_q1
    }

    pub fn target_q2(&self) -> &Q {
        &self.target_q2
    }

    pub fn replay(&self) -> &R {
        &self.replay
    }

    pub fn environment(&self) -> &E {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut E {
        &mut self.environment
    }
}

/// Clipped double-Q regression target:
/// `reward + discount * (1 - terminal) * min(q1, q2)` per sample.
pub fn bootstrap_targets(
    rewards: ArrayView1<f32>,
    terminals: ArrayView1<bool>,
    q1: ArrayView1<f32>,
    q2: ArrayView1<f32>,
    discount: f32,
) -> Result<Array1<f32>> {
    let n = rewards.len();
    if terminals.len() != n || q1.len() != n || q2.len() != n {
        return Err(SacError::dimension_mismatch(
            format!("{} rewards, terminals and values", n),
            format!("{} terminals, {} / {} values", terminals.len(), q1.len(), q2.len()),
        ));
    }

    Ok(Zip::from(&rewards)
        .and(&terminals)
        .and(&q1)
        .and(&q2)
        .map_collect(|&reward, &terminal, &a, &b| {
            let live = if terminal { 0.0 } else { 1.0 };
            reward + discount * live * a.min(b)
        }))
}

fn blend(target: &mut Array1<f32>, source: &Array1<f32>, rho: f32) {
    target.zip_mut_with(source, |t, &s| *t = (1.0 - rho) * *t + rho * s);
}

/// Builder for [`SoftActorCritic`]
pub struct SacBuilder<E, Q, P, O, R> {
    config: TrainingConfig,
    critic: Option<Q>,
    policy: Option<P>,
    replay: Option<R>,
    critic_optimizer: Option<O>,
    policy_optimizer: Option<O>,
    environment: Option<E>,
}

impl<E, Q, P, O, R> SacBuilder<E, Q, P, O, R>
where
    E: Environment,
    Q: Network,
    P: Network,
    O: Optimizer,
    R: TransitionStore<E::State>,
{
    pub fn new(config: TrainingConfig) -> Self {
        SacBuilder {
            config,
            critic: None,
            policy: None,
            replay: None,
            critic_optimizer: None,
            policy_optimizer: None,
            environment: None,
        }
    }

    pub fn critic(mut self, critic: Q) -> Self {
        self.critic = Some(critic);
        self
    }

    pub fn policy(mut self, policy: P) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn replay(mut self, replay: R) -> Self {
        self.replay = Some(replay);
        self
    }

    pub fn critic_optimizer(mut self, optimizer: O) -> Self {
        self.critic_optimizer = Some(optimizer);
        self
    }

    pub fn policy_optimizer(mut self, optimizer: O) -> Self {
        self.policy_optimizer = Some(optimizer);
        self
    }

    pub fn environment(mut self, environment: E) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn build(self) -> Result<SoftActorCritic<E, Q, P, O, R>> {
        fn required<T>(value: Option<T>, name: &str) -> Result<T> {
            value.ok_or_else(|| SacError::InvalidParameter {
                name: name.to_string(),
                reason: format!("{} not specified", name),
            })
        }

        SoftActorCritic::new(
            self.config,
            required(self.critic, "critic")?,
            required(self.policy, "policy")?,
            required(self.replay, "replay")?,
            required(self.critic_optimizer, "critic_optimizer")?,
            required(self.policy_optimizer, "policy_optimizer")?,
            required(self.environment, "environment")?,
        )
    }
}

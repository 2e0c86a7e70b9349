use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

use crate::error::{Result, SacError};
use crate::types::{State, Transition};

/// A minibatch of encoded transitions, one sample per row.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionBatch {
    pub states: Array2<f32>,
    pub actions: Array2<f32>,
    pub rewards: Array1<f32>,
    pub next_states: Array2<f32>,
    pub terminals: Array1<bool>,
}

impl TransitionBatch {
    /// Encode and stack a set of transitions.
    pub fn from_transitions<S: State>(transitions: &[&Transition<S>]) -> Result<Self> {
        let first = transitions
            .first()
            .ok_or_else(|| SacError::EmptyBuffer("no transitions to batch".to_string()))?;
        let state_width = first.state.encode().len();
        let action_width = first.action.len();
        let rows = transitions.len();

        let mut batch = TransitionBatch {
            states: Array2::zeros((rows, state_width)),
            actions: Array2::zeros((rows, action_width)),
            rewards: Array1::zeros(rows),
            next_states: Array2::zeros((rows, state_width)),
            terminals: Array1::from_elem(rows, false),
        };

        for (i, transition) in transitions.iter().enumerate() {
            let state = transition.state.encode();
            let next_state = transition.next_state.encode();
            if state.len() != state_width || next_state.len() != state_width {
                return Err(SacError::dimension_mismatch(
                    format!("{} state features", state_width),
                    format!("{} / {} state features", state.len(), next_state.len()),
                ));
            }
            if transition.action.len() != action_width {
                return Err(SacError::dimension_mismatch(
                    format!("{} action components", action_width),
                    format!("{} action components", transition.action.len()),
                ));
            }
            batch.states.row_mut(i).assign(&state);
            batch.actions.row_mut(i).assign(&transition.action.values);
            batch.rewards[i] = transition.reward;
            batch.next_states.row_mut(i).assign(&next_state);
            batch.terminals[i] = transition.terminal;
        }

        Ok(batch)
    }

    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }
}

/// Experience storage consumed by the agent.
pub trait TransitionStore<S: State> {
    /// Take ownership of one transition.
    fn store(&mut self, transition: Transition<S>) -> Result<()>;

    /// Draw a minibatch. The batch size is a property of the store.
    fn sample(&mut self) -> Result<TransitionBatch>;
}

/// Bounded FIFO buffer with uniform sampling (with replacement).
#[derive(Clone, Debug)]
pub struct ReplayBuffer<S: State> {
    buffer: VecDeque<Transition<S>>,
    capacity: usize,
    batch_size: usize,
    rng: StdRng,
}

impl<S: State> ReplayBuffer<S> {
    pub fn new(capacity: usize, batch_size: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(SacError::invalid_parameter("capacity", "Capacity must be greater than 0"));
        }
        if batch_size == 0 {
            return Err(SacError::invalid_parameter("batch_size", "Batch size must be greater than 0"));
        }
        Ok(ReplayBuffer {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
            batch_size,
            rng: StdRng::from_entropy(),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Stored transitions, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Transition<S>> {
        self.buffer.iter()
    }
}

impl<S: State> TransitionStore<S> for ReplayBuffer<S> {
    fn store(&mut self, transition: Transition<S>) -> Result<()> {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(transition);
        Ok(())
    }

    fn sample(&mut self) -> Result<TransitionBatch> {
        if self.buffer.is_empty() {
            return Err(SacError::EmptyBuffer(format!(
                "cannot sample {} transitions from an empty buffer",
                self.batch_size
            )));
        }
        let len = self.buffer.len();
        let picks = (0..self.batch_size)
            .map(|_| &self.buffer[self.rng.gen_range(0..len)])
            .collect::<Vec<_>>();
        TransitionBatch::from_transitions(&picks)
    }
}

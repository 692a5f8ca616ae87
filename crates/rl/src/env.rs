use serde::Serialize;

/// Auxiliary per-step diagnostics.
///
/// Empty after a reset; `succeed` carries the raw task-success flag after a step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Info {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub succeed: Option<bool>,
}

impl Info {
    #[must_use]
    pub const fn step(succeed: bool) -> Self {
        Self { succeed: Some(succeed) }
    }
}

/// Result of a single [`Env::step`].
#[derive(Clone, Debug)]
pub struct Step<O> {
    pub observation: O,
    pub reward: f32,
    pub terminated: bool,
    pub truncated: bool,
    pub info: Info,
}

impl<O> Step<O> {
    /// Whether the episode is over for either reason.
    #[must_use]
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Reinforcement learning environment trait.
///
/// Inspired by classic frameworks like OpenAI Gym, this trait defines the core
/// interface an environment must provide. Each call to [`step`] advances the
/// simulation by one action and returns the new observation, a reward signal,
/// and whether the episode has terminated or been truncated.
///
/// [`step`]: Env::step
pub trait Env {
    type Obs;
    type Action: ?Sized;
    type Error;

    /// Reset the environment to its starting state and return the initial
    /// observation. Re-seeds internal randomness when `seed` is given.
    ///
    /// # Errors
    ///
    /// Implementation specific.
    fn reset(&mut self, seed: Option<u64>) -> Result<(Self::Obs, Info), Self::Error>;

    /// Advance the environment by one action.
    ///
    /// # Errors
    ///
    /// Implementation specific.
    fn step(&mut self, action: &Self::Action) -> Result<Step<Self::Obs>, Self::Error>;
}

/// Truncates episodes after a fixed number of steps.
///
/// A step that is already terminal is never marked truncated, even when it
/// is the last allowed step.
pub struct TimeLimit<E> {
    env: E,
    max_steps: u32,
    elapsed: u32,
}

impl<E: Env> TimeLimit<E> {
    #[must_use]
    pub fn new(env: E, max_steps: u32) -> Self {
        Self { env, max_steps, elapsed: 0 }
    }

    #[must_use]
    pub fn inner(&self) -> &E {
        &self.env
    }

    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.env
    }

    #[must_use]
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    #[must_use]
    pub fn into_inner(self) -> E {
        self.env
    }
}

impl<E: Env> Env for TimeLimit<E> {
    type Obs = E::Obs;
    type Action = E::Action;
    type Error = E::Error;

    fn reset(&mut self, seed: Option<u64>) -> Result<(Self::Obs, Info), Self::Error> {
        self.elapsed = 0;
        self.env.reset(seed)
    }

    fn step(&mut self, action: &Self::Action) -> Result<Step<Self::Obs>, Self::Error> {
        let mut step = self.env.step(action)?;
        self.elapsed = self.elapsed.saturating_add(1);
        if self.elapsed >= self.max_steps && !step.terminated {
            step.truncated = true;
        }
        Ok(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts steps; terminates when the action equals the target.
    struct Counter {
        target: i32,
    }

    impl Env for Counter {
        type Obs = ();
        type Action = i32;
        type Error = std::convert::Infallible;

        fn reset(&mut self, _seed: Option<u64>) -> Result<((), Info), Self::Error> {
            Ok(((), Info::default()))
        }

        fn step(&mut self, action: &i32) -> Result<Step<()>, Self::Error> {
            Ok(Step {
                observation: (),
                reward: 0.0,
                terminated: *action == self.target,
                truncated: false,
                info: Info::step(false),
            })
        }
    }

    #[test]
    fn time_limit_truncates_on_last_step() {
        let mut env = TimeLimit::new(Counter { target: 7 }, 3);
        env.reset(None).unwrap();
        assert!(!env.step(&0).unwrap().truncated);
        assert!(!env.step(&0).unwrap().truncated);
        let last = env.step(&0).unwrap();
        assert!(last.truncated);
        assert!(last.done());

        env.reset(None).unwrap();
        assert_eq!(env.elapsed(), 0);
    }

    #[test]
    fn termination_wins_over_truncation() {
        let mut env = TimeLimit::new(Counter { target: 7 }, 1);
        env.reset(None).unwrap();
        let step = env.step(&7).unwrap();
        assert!(step.terminated);
        assert!(!step.truncated);
    }

    #[test]
    fn elapsed_counter_saturates() {
        let mut env = TimeLimit { env: Counter { target: 7 }, max_steps: u32::MAX, elapsed: u32::MAX };
        let step = env.step(&0).unwrap();
        assert_eq!(env.elapsed(), u32::MAX);
        assert!(step.truncated);
    }

    #[test]
    fn reset_info_serializes_empty() {
        assert_eq!(serde_json::to_string(&Info::default()).unwrap(), "{}");
        assert_eq!(serde_json::to_string(&Info::step(true)).unwrap(), r#"{"succeed":true}"#);
    }
}

/// Explicit release of GPU resources. Runs on every teardown path: drop of
/// the owning slot, backend switch, re-initialization after an error.
pub trait Teardown {
    fn teardown(&mut self);
}

/// Externally visible lifecycle of the slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RuntimeStatus {
    Uninitialized,
    Initializing,
    Ready,
    Error,
    Destroyed,
}

enum State<R> {
    Uninitialized,
    Initializing,
    Ready(R),
    Error(String),
    Destroyed,
}

/// Holder for an asynchronously created render runtime.
///
/// Device acquisition suspends, and the owning view can go away while it is
/// in flight. The in-flight work is not interrupted; instead each
/// initialization attempt gets a generation, and [`install`] discards (and
/// tears down) any result whose generation is stale or that arrives after
/// the slot was destroyed.
///
/// [`install`]: RuntimeSlot::install
pub struct RuntimeSlot<R: Teardown> {
    state: State<R>,
    generation: u64,
}

impl<R: Teardown> RuntimeSlot<R> {
    pub fn new() -> Self {
        Self {
            state: State::Uninitialized,
            generation: 0,
        }
    }

    pub fn status(&self) -> RuntimeStatus {
        match self.state {
            State::Uninitialized => RuntimeStatus::Uninitialized,
            State::Initializing => RuntimeStatus::Initializing,
            State::Ready(_) => RuntimeStatus::Ready,
            State::Error(_) => RuntimeStatus::Error,
            State::Destroyed => RuntimeStatus::Destroyed,
        }
    }

    /// Human-readable cause when initialization failed.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            State::Error(cause) => Some(cause),
            _ => None,
        }
    }

    pub fn runtime_mut(&mut self) -> Option<&mut R> {
        match &mut self.state {
            State::Ready(runtime) => Some(runtime),
            _ => None,
        }
    }

    /// Starts a new initialization attempt and returns its generation token.
    ///
    /// Any current runtime is torn down first (re-init after error or for a
    /// fresh mount). A destroyed slot stays destroyed.
    pub fn begin_initializing(&mut self) -> u64 {
        if matches!(self.state, State::Destroyed) {
            return self.generation;
        }

        self.teardown_current();
        self.state = State::Initializing;
        self.generation += 1;
        self.generation
    }

    /// Installs the outcome of an initialization attempt.
    ///
    /// A result carrying a stale generation, or arriving after the slot was
    /// destroyed or retired, is released immediately instead of installed.
    /// Returns `true` when the result was installed.
    pub fn install(&mut self, generation: u64, result: Result<R, String>) -> bool {
        let stale = generation != self.generation || !matches!(self.state, State::Initializing);

        match result {
            Ok(mut runtime) if stale => {
                log::debug!("discarding render runtime from a superseded initialization");
                runtime.teardown();
                false
            }
            Err(_) if stale => false,
            Ok(runtime) => {
                self.state = State::Ready(runtime);
                true
            }
            Err(cause) => {
                log::error!("render runtime initialization failed: {cause}");
                self.state = State::Error(cause);
                true
            }
        }
    }

    /// Records a runtime failure observed after `Ready` (device loss, OOM).
    ///
    /// The runtime is torn down; the slot stays in `Error` until the user
    /// re-selects the backend — there is no automatic retry.
    pub fn fail(&mut self, cause: String) {
        if matches!(self.state, State::Destroyed) {
            return;
        }
        log::error!("render runtime failed: {cause}");
        self.teardown_current();
        self.state = State::Error(cause);
        self.generation += 1;
    }

    /// Tears down the current runtime and returns to `Uninitialized`,
    /// invalidating any in-flight initialization. Used when the GPU backend
    /// is unmounted but may be selected again later.
    pub fn retire(&mut self) {
        if matches!(self.state, State::Destroyed) {
            return;
        }
        self.teardown_current();
        self.state = State::Uninitialized;
        self.generation += 1;
    }

    /// Terminal teardown; reachable from any state.
    pub fn destroy(&mut self) {
        self.teardown_current();
        self.state = State::Destroyed;
        self.generation += 1;
    }

    fn teardown_current(&mut self) {
        if let State::Ready(runtime) = &mut self.state {
            runtime.teardown();
        }
    }
}

impl<R: Teardown> Default for RuntimeSlot<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Teardown> Drop for RuntimeSlot<R> {
    fn drop(&mut self) {
        self.teardown_current();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct FakeRuntime {
        releases: Rc<Cell<u32>>,
    }

    impl Teardown for FakeRuntime {
        fn teardown(&mut self) {
            self.releases.set(self.releases.get() + 1);
        }
    }

    fn fake() -> (FakeRuntime, Rc<Cell<u32>>) {
        let releases = Rc::new(Cell::new(0));
        (
            FakeRuntime {
                releases: releases.clone(),
            },
            releases,
        )
    }

    #[test]
    fn install_matching_generation_reaches_ready() {
        let mut slot = RuntimeSlot::new();
        let generation = slot.begin_initializing();
        let (runtime, releases) = fake();

        assert!(slot.install(generation, Ok(runtime)));
        assert_eq!(slot.status(), RuntimeStatus::Ready);
        assert_eq!(releases.get(), 0);
    }

    #[test]
    fn stale_generation_result_is_released_not_installed() {
        let mut slot = RuntimeSlot::new();
        let first = slot.begin_initializing();
        let second = slot.begin_initializing();
        let (stale_runtime, stale_releases) = fake();

        assert!(!slot.install(first, Ok(stale_runtime)));
        assert_eq!(stale_releases.get(), 1);
        assert_eq!(slot.status(), RuntimeStatus::Initializing);

        let (runtime, _) = fake();
        assert!(slot.install(second, Ok(runtime)));
        assert_eq!(slot.status(), RuntimeStatus::Ready);
    }

    #[test]
    fn result_arriving_after_destroy_is_released() {
        let mut slot = RuntimeSlot::new();
        let generation = slot.begin_initializing();
        slot.destroy();

        let (runtime, releases) = fake();
        assert!(!slot.install(generation, Ok(runtime)));
        assert_eq!(releases.get(), 1);
        assert_eq!(slot.status(), RuntimeStatus::Destroyed);
    }

    #[test]
    fn retire_tears_down_the_ready_runtime() {
        let mut slot = RuntimeSlot::new();
        let generation = slot.begin_initializing();
        let (runtime, releases) = fake();
        slot.install(generation, Ok(runtime));

        slot.retire();
        assert_eq!(releases.get(), 1);
        assert_eq!(slot.status(), RuntimeStatus::Uninitialized);
    }

    #[test]
    fn late_failure_tears_down_and_blocks_stale_results() {
        let mut slot = RuntimeSlot::new();
        let generation = slot.begin_initializing();
        let (runtime, releases) = fake();
        slot.install(generation, Ok(runtime));

        slot.fail("device lost".to_string());
        assert_eq!(releases.get(), 1);
        assert_eq!(slot.status(), RuntimeStatus::Error);
        assert_eq!(slot.error(), Some("device lost"));

        // A result from before the failure no longer installs.
        let (late, late_releases) = fake();
        assert!(!slot.install(generation, Ok(late)));
        assert_eq!(late_releases.get(), 1);
    }

    #[test]
    fn failure_is_recorded_with_its_cause() {
        let mut slot = RuntimeSlot::<FakeRuntime>::new();
        let generation = slot.begin_initializing();

        assert!(slot.install(generation, Err("no adapter".into())));
        assert_eq!(slot.status(), RuntimeStatus::Error);
        assert_eq!(slot.error(), Some("no adapter"));
    }

    #[test]
    fn reinit_after_error_is_allowed() {
        let mut slot = RuntimeSlot::new();
        let generation = slot.begin_initializing();
        slot.install(generation, Err("no adapter".to_string()));

        let generation = slot.begin_initializing();
        let (runtime, _) = fake();
        assert!(slot.install(generation, Ok(runtime)));
        assert_eq!(slot.status(), RuntimeStatus::Ready);
    }

    #[test]
    fn destroyed_slot_refuses_reinitialization() {
        let mut slot = RuntimeSlot::<FakeRuntime>::new();
        slot.destroy();

        let generation = slot.begin_initializing();
        assert_eq!(slot.status(), RuntimeStatus::Destroyed);

        let (runtime, releases) = fake();
        assert!(!slot.install(generation, Ok(runtime)));
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn ready_runtime_is_torn_down_when_reinitializing() {
        let mut slot = RuntimeSlot::new();
        let generation = slot.begin_initializing();
        let (runtime, releases) = fake();
        slot.install(generation, Ok(runtime));

        slot.begin_initializing();
        assert_eq!(releases.get(), 1);
        assert_eq!(slot.status(), RuntimeStatus::Initializing);
    }
}

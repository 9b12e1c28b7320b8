/// Minimal finite-state-machine container.
///
/// `S` is the state type (an enum whose variants may carry per-state data).
/// The machine tracks the current state, the previous state, and how long it
/// has been in the current state. Transition rules live with the code that
/// drives it (see `locomotion::controller`), as do enter/exit hooks.
///
/// # Usage
/// ```
/// use kartflight::fsm::StateMachine;
///
/// #[derive(Clone, Debug)]
/// enum Mode { Idle, Moving(f32) }
///
/// let mut fsm = StateMachine::new(Mode::Idle);
/// assert!(fsm.go(Mode::Moving(1.0)));
/// assert!(!fsm.go(Mode::Moving(2.0))); // same variant: no-op
/// fsm.tick(0.02);
/// assert!(!fsm.just_entered());
/// ```
#[derive(Debug, Clone)]
pub struct StateMachine<S: Clone> {
    pub state: S,
    pub previous: S,
    /// Seconds spent in the current state. Reset to 0.0 on each transition.
    pub elapsed: f32,
    entered_this_tick: bool,
}

impl<S: Clone> StateMachine<S> {
    /// Create a new machine starting in `initial`.
    /// `just_entered()` returns `true` until the first tick.
    pub fn new(initial: S) -> Self {
        Self {
            previous: initial.clone(),
            state: initial,
            elapsed: 0.0,
            entered_this_tick: true,
        }
    }

    /// Transition to `next` only if it is a **different variant** from the
    /// current state (compared by discriminant, so variant data is ignored).
    /// Returns whether a transition happened.
    pub fn go(&mut self, next: S) -> bool {
        if std::mem::discriminant(&self.state) == std::mem::discriminant(&next) {
            return false;
        }
        self.previous = std::mem::replace(&mut self.state, next);
        self.elapsed = 0.0;
        self.entered_this_tick = true;
        true
    }

    /// Advance the elapsed-in-state timer by `dt` seconds and clear the
    /// `just_entered` flag. Call once per fixed tick **after** transitions.
    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
        self.entered_this_tick = false;
    }

    /// `true` only between a transition and the next `tick`.
    pub fn just_entered(&self) -> bool {
        self.entered_this_tick
    }
}

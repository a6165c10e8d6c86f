use std::fmt::Debug;

/// Per-state hooks driven by [`StateMachine`].
pub trait StateLogic {
    type State: Copy + Eq + Debug;
    type Error;

    fn is_terminal(&self, state: Self::State) -> bool;

    fn entry(&mut self, state: Self::State) -> Result<(), Self::Error>;

    fn run(&mut self, state: Self::State) -> Result<(), Self::Error>;

    fn next(&mut self, state: Self::State) -> Result<Self::State, Self::Error>;

    fn exit(&mut self, state: Self::State) -> Result<(), Self::Error>;
}

/// Cooperative single-threaded scheduler.
///
/// `entry` runs once when a state becomes current and `exit` once when it is
/// left; a `next` that names the current state only repeats `run`. The
/// terminal state gets a single `run` after the last `exit`. Errors abort the
/// loop without further hooks.
pub struct StateMachine<L: StateLogic> {
    logic: L,
    initial: L::State,
}

impl<L: StateLogic> StateMachine<L> {
    pub fn new(logic: L, initial: L::State) -> Self {
        Self { logic, initial }
    }

    pub fn logic(&self) -> &L {
        &self.logic
    }

    pub fn logic_mut(&mut self) -> &mut L {
        &mut self.logic
    }

    pub fn into_logic(self) -> L {
        self.logic
    }

    /// Drive the machine until a terminal state; returns that state.
    pub fn run(&mut self) -> Result<L::State, L::Error> {
        let mut entered: Option<L::State> = None;
        let mut next = self.initial;

        while !self.logic.is_terminal(next) {
            if entered != Some(next) {
                if let Some(previous) = entered {
                    self.logic.exit(previous)?;
                }
                self.logic.entry(next)?;
                entered = Some(next);
            }
            self.logic.run(next)?;
            next = self.logic.next(next)?;
        }

        if let Some(previous) = entered {
            self.logic.exit(previous)?;
        }
        self.logic.run(next)?;
        Ok(next)
    }
}

use std::fmt::{Display, Formatter};

/// Lifecycle state of an element or of the whole pipeline.
///
/// Ordering follows the happy path, so `State::Null < State::Playing`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum State {
    Null,
    Ready,
    Paused,
    Playing,
}

impl State {
    /// The adjacent state one step closer to `target`, or `None` when already there.
    /// Transitions never skip a state.
    pub fn step_towards(self, target: State) -> Option<State> {
        use std::cmp::Ordering;
        match self.cmp(&target) {
            Ordering::Less => Some(self.up()),
            Ordering::Greater => Some(self.down()),
            Ordering::Equal => None,
        }
    }

    fn up(self) -> State {
        match self {
            State::Null => State::Ready,
            State::Ready => State::Paused,
            State::Paused | State::Playing => State::Playing,
        }
    }

    fn down(self) -> State {
        match self {
            State::Playing => State::Paused,
            State::Paused => State::Ready,
            State::Ready | State::Null => State::Null,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            State::Null => "NULL",
            State::Ready => "READY",
            State::Paused => "PAUSED",
            State::Playing => "PLAYING",
        }
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Non-failing outcome of a state change request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateChangeSuccess {
    /// The target state was reached before the call returned.
    Success,
    /// The change continues in the background; a state-changed notification
    /// from the pipeline confirms it later.
    Async,
    /// Live source: reached, but no preroll happens in paused.
    NoPreroll,
}

/// The framework refused a state change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("state change failed")]
pub struct StateChangeError;

#[cfg(test)]
mod tests {
    use super::State;

    #[test]
    fn test_step_towards_never_skips() {
        let mut state = State::Null;
        let mut path = vec![state];
        while let Some(next) = state.step_towards(State::Playing) {
            state = next;
            path.push(state);
        }
        assert_eq!(
            path,
            vec![State::Null, State::Ready, State::Paused, State::Playing]
        );

        let mut down = vec![state];
        while let Some(next) = state.step_towards(State::Null) {
            state = next;
            down.push(state);
        }
        assert_eq!(
            down,
            vec![State::Playing, State::Paused, State::Ready, State::Null]
        );
    }

    #[test]
    fn test_state_names() {
        assert_eq!(State::Null.to_string(), "NULL");
        assert_eq!(State::Playing.to_string(), "PLAYING");
        assert!(State::Ready < State::Paused);
    }
}

/// Outcome of a bounded fixed-point loop.
///
/// Both variants carry the state of the last completed iteration, so callers can still report a
/// loop that ran out of iterations.
#[derive(Debug, Clone, PartialEq)]
pub enum Convergence<T> {
    Converged(T),
    ExceededIterations(T),
}

impl<T> Convergence<T> {
    pub fn is_converged(&self) -> bool {
        matches!(self, Convergence::Converged(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Convergence::Converged(value) | Convergence::ExceededIterations(value) => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Convergence::Converged(value) | Convergence::ExceededIterations(value) => value,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Convergence<U> {
        match self {
            Convergence::Converged(value) => Convergence::Converged(f(value)),
            Convergence::ExceededIterations(value) => Convergence::ExceededIterations(f(value)),
        }
    }
}

// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use placer_model::board::BoardError;
use thiserror::Error;

/// Errors raised by the solver facade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    /// The board could not be constructed.
    #[error("invalid board: {0}")]
    Board(#[from] BoardError),
    /// The requested search strategy is not known.
    #[error("unsupported strategy: '{0}'")]
    UnsupportedStrategy(String),
    /// The requested bound estimator is not known.
    #[error("unsupported bound: '{0}'")]
    UnsupportedBound(String),
    /// The solver was configured with zero worker threads.
    #[error("the number of threads must be at least one")]
    InvalidThreadCount,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_error_converts() {
        let err: SolverError = BoardError::TooManyPlacers {
            placers: 5,
            size: 4,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "invalid board: cannot place 5 placers on a board of size 4"
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            SolverError::UnsupportedStrategy("bfs".into()).to_string(),
            "unsupported strategy: 'bfs'"
        );
        assert_eq!(
            SolverError::UnsupportedBound("lagrange".into()).to_string(),
            "unsupported bound: 'lagrange'"
        );
        assert_eq!(
            SolverError::InvalidThreadCount.to_string(),
            "the number of threads must be at least one"
        );
    }
}

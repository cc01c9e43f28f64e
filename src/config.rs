use crate::error::Error;
use crate::limiter::Limiter;
use crate::problem::{Problem, ProblemKind};




/**
 * The immutable parameters of a run: the diffusivity `eps`, the wind strength
 * `w0`, the flux limiter and the problem variant. A `ProblemConfig` can only
 * be obtained through `ProblemConfig::new`, which rejects `eps <= 0`, so every
 * value seen by the residual assembler is valid.
 */
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ProblemConfig {
    eps: f64,
    w0: f64,
    limiter: Limiter,
    problem: ProblemKind,
}




// ============================================================================
impl ProblemConfig {

    pub fn new(eps: f64, w0: f64, limiter: Limiter, problem: ProblemKind) -> Result<Self, Error> {
        // written so that NaN is rejected too
        if !(eps > 0.0) || !eps.is_finite() {
            return Err(Error::InvalidDiffusivity(eps))
        }
        Ok(Self { eps, w0, limiter, problem })
    }

    pub fn eps(&self) -> f64 {
        self.eps
    }

    pub fn w0(&self) -> f64 {
        self.w0
    }

    pub fn limiter(&self) -> Limiter {
        self.limiter
    }

    pub fn problem_kind(&self) -> ProblemKind {
        self.problem
    }

    /**
     * Return the point-wise functions of the configured problem.
     */
    pub fn problem(&self) -> Problem {
        Problem::new(self.problem, self.eps)
    }

    /**
     * Return the halo width needed by the configured limiter.
     */
    pub fn stencil_reach(&self) -> i64 {
        self.limiter.stencil_reach()
    }
}

use core::fmt;
use core::str::FromStr;
use crate::error::Error;




/**
 * Flux limiter applied to the advective face fluxes. The limiter maps the
 * smoothness ratio `theta` of the upwind solution to a coefficient which
 * blends the first-order upwind flux toward the downwind value. With
 * `Limiter::None` the scheme is pure first-order upwinding and the limiter is
 * never evaluated.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum Limiter {
    None,
    Centered,
    VanLeer,
}




// ============================================================================
impl Limiter {


    /**
     * Return the blend coefficient for the given smoothness ratio, or `None`
     * if no correction is to be applied.
     */
    pub fn blend(self, theta: f64) -> Option<f64> {
        match self {
            Limiter::None => None,
            Limiter::Centered => Some(centered(theta)),
            Limiter::VanLeer => Some(van_leer(theta)),
        }
    }


    /**
     * Like `blend`, but the smoothness ratio is only computed (by calling
     * `ratio`) when the limiter actually depends on it. The centered blend
     * therefore never reads the far-upwind value.
     */
    pub fn coefficient<F>(self, ratio: F) -> Option<f64>
    where
        F: FnOnce() -> f64
    {
        match self {
            Limiter::None => None,
            Limiter::Centered => Some(centered(0.0)),
            Limiter::VanLeer => Some(van_leer(ratio())),
        }
    }


    pub fn is_active(self) -> bool {
        self != Limiter::None
    }


    /**
     * Return the number of guard zones needed on each side of a subdomain to
     * evaluate the face fluxes with this limiter. Only van Leer reads one
     * value past the face neighbor.
     */
    pub fn stencil_reach(self) -> i64 {
        match self {
            Limiter::None | Limiter::Centered => 1,
            Limiter::VanLeer => 2,
        }
    }


    pub fn name(self) -> &'static str {
        match self {
            Limiter::None => "none",
            Limiter::Centered => "centered",
            Limiter::VanLeer => "vanleer",
        }
    }
}




/**
 * Central-difference blend; not TVD.
 */
fn centered(_theta: f64) -> f64 {
    0.5
}

fn van_leer(theta: f64) -> f64 {
    if theta.is_infinite() {
        return if theta > 0.0 { 1.0 } else { 0.0 }
    }
    let abs_theta = theta.abs();
    0.5 * (theta + abs_theta) / (1.0 + abs_theta)
}




// ============================================================================
impl FromStr for Limiter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Limiter::None),
            "centered" => Ok(Limiter::Centered),
            "vanleer" => Ok(Limiter::VanLeer),
            _ => Err(Error::UnknownLimiter(s.to_string())),
        }
    }
}

impl fmt::Display for Limiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

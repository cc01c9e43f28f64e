use core::fmt;
use core::str::FromStr;
use crate::error::Error;
use crate::exact::BoundaryLayerSolution;




/**
 * The point-wise data of an advection-diffusion problem: the wind field `a`,
 * the volumetric source `g`, and the Dirichlet value `b` imposed on the
 * `x = +1` face. Implementations are stateless apart from fixed parameters,
 * and are shared read-only between subdomains.
 */
pub trait FieldFunctions {

    /// Return the three components of the wind at the given point.
    fn wind(&self, x: f64, y: f64, z: f64) -> (f64, f64, f64);

    /// Return the source term at the given point, for the local solution
    /// value `u`.
    fn source(&self, x: f64, y: f64, z: f64, u: f64) -> f64;

    /// Return the Dirichlet value on the `x = +1` face.
    fn boundary_value(&self, y: f64, z: f64) -> f64;
}




/**
 * Identifier for one of the built-in problems
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum ProblemKind {
    Layer,
    Glaze,
}

impl FromStr for ProblemKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "layer" => Ok(ProblemKind::Layer),
            "glaze" => Ok(ProblemKind::Glaze),
            _ => Err(Error::UnknownProblem(s.to_string())),
        }
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemKind::Layer => write!(f, "layer"),
            ProblemKind::Glaze => write!(f, "glaze"),
        }
    }
}




/**
 * A boundary layer of width `eps` near `x = 1`, driven by the uniform wind
 * `a = <1,0,0>`. The source and boundary data are manufactured from
 * [`BoundaryLayerSolution`], so that with `w0 = 1` the exact solution is
 * known.
 */
#[derive(Clone, Debug)]
pub struct BoundaryLayer {
    exact: BoundaryLayerSolution,
}

impl BoundaryLayer {
    pub fn new(eps: f64) -> Self {
        Self { exact: BoundaryLayerSolution::new(eps) }
    }

    pub fn exact(&self) -> &BoundaryLayerSolution {
        &self.exact
    }
}

impl FieldFunctions for BoundaryLayer {
    fn wind(&self, _x: f64, _y: f64, _z: f64) -> (f64, f64, f64) {
        (1.0, 0.0, 0.0)
    }

    fn source(&self, x: f64, y: f64, z: f64, _u: f64) -> f64 {
        self.exact.source(x, y, z)
    }

    fn boundary_value(&self, y: f64, z: f64) -> f64 {
        self.exact.boundary_value(y, z)
    }
}




/**
 * The double-glazing problem of Elman, Silvester & Wathen: a recirculating
 * wind in the x-y plane, no source, and a hot wall at `x = 1`.
 */
#[derive(Clone, Debug, Default)]
pub struct DoubleGlazing;

impl FieldFunctions for DoubleGlazing {
    fn wind(&self, x: f64, y: f64, _z: f64) -> (f64, f64, f64) {
        (2.0 * y * (1.0 - x * x), -2.0 * x * (1.0 - y * y), 0.0)
    }

    fn source(&self, _x: f64, _y: f64, _z: f64, _u: f64) -> f64 {
        0.0
    }

    fn boundary_value(&self, _y: f64, _z: f64) -> f64 {
        1.0
    }
}




/**
 * One of the built-in problems, selected by configuration.
 */
#[derive(Clone, Debug)]
pub enum Problem {
    Layer(BoundaryLayer),
    Glaze(DoubleGlazing),
}

impl Problem {
    pub fn new(kind: ProblemKind, eps: f64) -> Self {
        match kind {
            ProblemKind::Layer => Problem::Layer(BoundaryLayer::new(eps)),
            ProblemKind::Glaze => Problem::Glaze(DoubleGlazing),
        }
    }

    /**
     * Return the exact solution, if this problem has one.
     */
    pub fn exact(&self) -> Option<&BoundaryLayerSolution> {
        match self {
            Problem::Layer(layer) => Some(layer.exact()),
            Problem::Glaze(_) => None,
        }
    }
}

impl FieldFunctions for Problem {
    fn wind(&self, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
        match self {
            Problem::Layer(p) => p.wind(x, y, z),
            Problem::Glaze(p) => p.wind(x, y, z),
        }
    }

    fn source(&self, x: f64, y: f64, z: f64, u: f64) -> f64 {
        match self {
            Problem::Layer(p) => p.source(x, y, z, u),
            Problem::Glaze(p) => p.source(x, y, z, u),
        }
    }

    fn boundary_value(&self, y: f64, z: f64) -> f64 {
        match self {
            Problem::Layer(p) => p.boundary_value(y, z),
            Problem::Glaze(p) => p.boundary_value(y, z),
        }
    }
}

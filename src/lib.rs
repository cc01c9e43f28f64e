//! Advdiff3 evaluates the discrete residual of a steady advection-diffusion
//! problem on the cube `[-1,1]^3`,
//!
//! ```text
//! -eps Laplacian u + w0 div(a u) = g(x,y,z,u),
//! ```
//!
//! with Dirichlet conditions on the x and y faces and periodic conditions in
//! z. The advective term is a conservative, first-order upwind flux which may
//! be blended toward the downwind value by a flux limiter. The residual is
//! what a nonlinear solver drives to zero; this crate provides it for any
//! trial field, on a single grid view or on a grid decomposed into
//! subdomains which exchange guard zones in parallel.

pub mod config;
pub mod error;
pub mod exact;
pub mod exchange;
pub mod field;
pub mod grid;
pub mod index_space;
pub mod limiter;
pub mod meshing;
pub mod problem;
pub mod residual;
pub mod subdomain;

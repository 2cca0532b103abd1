//! # Canon Solve
//!
//! Solvers back-compute a form's canonical parameter from whichever
//! property the user actually edited: given `area = 50.27`, a circle solver
//! answers `radius = 4.0` with the formula and assumptions it used.
//!
//! Solving happens strictly upstream of the engine:
//!
//! ```text
//! user edit → SolverRegistry.solver_for(kind, key)
//!           → Solver.solve_from(key, value)
//!           → SolveResult (solved / ambiguous / invalid domain / …)
//!           → caller builds the Declaration
//!           → canon-engine validates and realizes
//! ```
//!
//! A solver never sees a declaration and the engine never sees a solver.

pub mod registry;
pub mod solver;

pub use registry::SolverRegistry;
pub use solver::{SolveProvenance, SolveResult, Solution, Solver};

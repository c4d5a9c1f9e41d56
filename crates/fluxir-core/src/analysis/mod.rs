/*! Forward dataflow analyses over the control flow graph.
 *
 * A generic worklist solver computes per-block fixed points, instantiated by
 * two concrete analyses: reaching definitions (may, union join) and non-null
 * value tracking (must, intersection join). Results feed the code generator,
 * which uses them to resolve jump targets and elide redundant null checks.
 */

pub mod dataflow;
pub mod non_null;
pub mod reaching_defs;

pub use dataflow::{Analysis, Dataflow};
pub use non_null::NonNullAnalysis;
pub use reaching_defs::{Def, ReachingDefsAnalysis};

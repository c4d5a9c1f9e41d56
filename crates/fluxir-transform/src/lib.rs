/*! Lower structured method bodies into control flow graphs.
 *
 * The frontend hands over one statement tree per method; code generation wants
 * basic blocks and edges. This crate dissolves if/else, while and return into
 * graph structure, producing a CFG with a single start and a single end block
 * that the analyses and the backend operate on.
 */

pub mod lower;

pub use lower::{lower_method, CfgBuilder, TransformError};

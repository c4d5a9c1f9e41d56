/*! Test coverage for the CFG data model and the dataflow analyses.
 *
 * Graphs are built by hand through the `ControlFlowGraph` mutators so that the
 * solver and both concrete analyses are exercised against known shapes:
 * straight lines, diamonds and loops with back-edges.
 */

mod fixtures;

mod cfg_tests;
mod non_null_tests;

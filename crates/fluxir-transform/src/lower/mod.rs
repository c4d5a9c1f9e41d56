mod cfg_builder;
mod errors;

pub use cfg_builder::CfgBuilder;
pub use errors::TransformError;

use anyhow::Result;
use fluxir_core::ast::MethodBody;
use fluxir_core::cfg::ControlFlowGraph;

/// Builds and validates the control flow graph of `body`.
pub fn lower_method(body: &MethodBody) -> Result<ControlFlowGraph> {
    body.validate().map_err(TransformError::from)?;
    let cfg = CfgBuilder::new(body).build();
    cfg.validate().map_err(TransformError::from)?;
    Ok(cfg)
}

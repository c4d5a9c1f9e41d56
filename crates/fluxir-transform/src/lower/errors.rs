use fluxir_core::IrError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("malformed method body: {0}")]
    MalformedBody(String),

    #[error("control flow error: {0}")]
    ControlFlow(String),
}

impl From<IrError> for TransformError {
    fn from(err: IrError) -> Self {
        match err {
            IrError::MalformedBody(msg) => TransformError::MalformedBody(msg),
            IrError::MalformedCfg(msg) => TransformError::ControlFlow(msg),
        }
    }
}

#![forbid(unsafe_code)]

use thiserror::Error;
use twiddle_runtime::{BindingError, ParamsError};

/// Plugin registration and blade creation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluginError {
    #[error("plugin id `{id}` is already registered")]
    DuplicateId { id: String },
    #[error("no {kind} plugin accepts `{key}`")]
    NoMatchingPlugin { kind: &'static str, key: String },
    #[error("no plugin provides an api for blade `{id}`")]
    ApiMismatch { id: String },
    #[error("params handed to plugin `{id}` were resolved by another plugin")]
    ForeignParams { id: String },
    #[error(transparent)]
    Binding(#[from] BindingError),
    #[error(transparent)]
    Params(#[from] ParamsError),
}

/// Errors surfaced by [`Pane`](crate::Pane).
#[derive(Debug, Error)]
pub enum PaneError {
    #[error(transparent)]
    Plugin(#[from] PluginError),
    #[error(transparent)]
    Binding(#[from] BindingError),
    #[error("invalid pane config: {0}")]
    Config(#[from] serde_json::Error),
}

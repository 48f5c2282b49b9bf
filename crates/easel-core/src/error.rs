//! Error types for Easel

use thiserror::Error;

use crate::stage::StageKind;

/// Result type alias using Easel's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building pipeline sources
#[derive(Error, Debug)]
pub enum Error {
    /// Shader source failed to parse or validate. The log carries the full
    /// annotated compiler output.
    #[error("{stage} shader failed to compile:\n{log}")]
    Compile { stage: StageKind, log: String },

    /// The source compiled but declares no entry point for the requested stage
    #[error("no {stage} entry point found in shader source")]
    MissingEntryPoint { stage: StageKind },

    /// The shader declares a resource Easel cannot bind
    #[error("unsupported shader resource: {0}")]
    UnsupportedResource(String),

    /// The two stages disagree about varyings or shared bindings
    #[error("program link failed: {0}")]
    Link(String),

    /// A vertex layout that cannot describe real data
    #[error("invalid vertex layout: {0}")]
    Layout(String),

    /// Vertex or index data that does not fit its layout
    #[error("invalid vertex data: {0}")]
    Data(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Which end of an edge a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Source,
    Target,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Source => f.write_str("source"),
            Endpoint::Target => f.write_str("target"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("node \"{id}\" is declared more than once")]
    DuplicateNode { id: String },

    #[error("edge #{index} references unknown {endpoint} node \"{id}\"")]
    DanglingEdge {
        index: usize,
        endpoint: Endpoint,
        id: String,
    },

    #[error("edge #{index} starts and ends at node \"{id}\"")]
    SelfLoop { index: usize, id: String },

    #[error("edge #{index} connects \"{from}\" and \"{to}\", whose centers coincide")]
    CoincidentNodes {
        index: usize,
        from: String,
        to: String,
    },

    #[error("node \"{id}\" has a non-finite position")]
    NonFiniteCoordinate { id: String },

    #[error("edge #{index} has a non-finite curvature")]
    NonFiniteCurvature { index: usize },

    #[error("invalid theme: {message}")]
    Theme { message: String },

    #[error("theme JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("theme YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

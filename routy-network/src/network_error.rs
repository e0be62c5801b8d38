use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    #[error("edge weight must be positive, found {weight} for edge ({start}, {end})")]
    InvalidWeight {
        start: String,
        end: String,
        weight: f64,
    },
    #[error("edge endpoints must differ, found self loop at '{0}'")]
    SelfLoop(String),
    #[error("an edge between '{0}' and '{1}' already exists")]
    DuplicateEdge(String, String),
    #[error("no edge exists between '{0}' and '{1}'")]
    UnknownEdge(String, String),
    #[error("location '{0}' is not registered in the road network")]
    UnknownLocation(String),
    #[error("no path found from '{0}' to '{1}'")]
    NoPathFound(String, String),
    #[error("congestion threshold must be within [0, 1], found {0}")]
    InvalidThreshold(f64),
    #[error("{0}")]
    InternalError(String),
}

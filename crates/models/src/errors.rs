use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("missing required attribute `{0}`")]
    MissingAttribute(&'static str),
    #[error("request body must be a JSON object")]
    NotAnObject,
}

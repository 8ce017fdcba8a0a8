use thiserror::Error;

pub type Result<T, E = LifecycleError> = std::result::Result<T, E>;

/// Errors surfaced to whoever drives an instance. None of them are retried;
/// the operation that produced one committed nothing.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("mount called on an instance that is already mounted")]
    DoubleMount,

    #[error("`{op}` called after the instance was unmounted")]
    PostUnmount { op: &'static str },

    #[error("render read prop path `{path}`, which was never provided")]
    MissingPropPath { path: String },

    #[error("`{op}` called before the instance finished mounting")]
    NotMounted { op: &'static str },

    #[error("no instance of the requested component is registered under this key")]
    UnknownInstance,
}

use ember_source::Location;
use ember_value::Type;

/// An error that aborts the current evaluation.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("runtime error: type error: {construct} of different type at {location}")]
    TypeMismatch {
        construct: &'static str,
        location: Location,
    },
    #[error("runtime error: type error: {construct} of unsupported type {ty} at {location}")]
    UnsupportedType {
        construct: &'static str,
        ty: Type,
        location: Location,
    },
    #[error("runtime error: type error: if condition must be Bool, found {ty} at {location}")]
    NonBoolCondition { ty: Type, location: Location },
    #[error("runtime error: division by zero at {location}")]
    DivisionByZero { location: Location },
    #[error("runtime error: integer overflow at {location}")]
    IntegerOverflow { location: Location },
    #[error("runtime error: undefined variable {ident} at {location}")]
    UndefinedVariable { ident: String, location: Location },
    #[error("runtime error: value of type {ty} is not callable at {location}")]
    NotCallable { ty: Type, location: Location },
    #[error("runtime error: {ident} expects {expected} arguments, found {found} at {location}")]
    ArityMismatch {
        ident: String,
        expected: usize,
        found: usize,
        location: Location,
    },
    #[error("runtime error: {construct} is not supported at {location}")]
    Unsupported {
        construct: &'static str,
        location: Location,
    },
    #[error("runtime error: return outside of a function at {location}")]
    ReturnOutsideFunction { location: Location },
    #[error("runtime error: maximum call depth of {max} exceeded at {location}")]
    CallDepthExceeded { max: usize, location: Location },
    #[error("runtime error: {ident} failed: {message} at {location}")]
    NativeFnFailed {
        ident: String,
        message: String,
        location: Location,
    },
}

impl RuntimeError {
    pub fn location(&self) -> Location {
        match self {
            RuntimeError::TypeMismatch { location, .. }
            | RuntimeError::UnsupportedType { location, .. }
            | RuntimeError::NonBoolCondition { location, .. }
            | RuntimeError::DivisionByZero { location }
            | RuntimeError::IntegerOverflow { location }
            | RuntimeError::UndefinedVariable { location, .. }
            | RuntimeError::NotCallable { location, .. }
            | RuntimeError::ArityMismatch { location, .. }
            | RuntimeError::Unsupported { location, .. }
            | RuntimeError::ReturnOutsideFunction { location }
            | RuntimeError::CallDepthExceeded { location, .. }
            | RuntimeError::NativeFnFailed { location, .. } => *location,
        }
    }
}

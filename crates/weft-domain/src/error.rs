//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the weft interception engine
#[derive(Error, Debug)]
pub enum Error {
    /// A member selector does not name an interceptable member of its type
    #[error("Invalid member selector: {message}")]
    InvalidSelector {
        /// Why the selector was rejected
        message: String,
    },

    /// A binding could not be registered
    #[error("Registration error: {message}")]
    Registration {
        /// Description of the registration failure
        message: String,
    },

    /// A binding matched but no proxy strategy can satisfy it
    #[error("Cannot proxy {implementation}: {reason}")]
    Planning {
        /// Implementation type that could not be proxied
        implementation: String,
        /// Why planning failed
        reason: String,
    },

    /// A forwarding proxy was planned for a contract without a backend
    #[error("No forwarding proxy backend registered for service {service}")]
    MissingBackend {
        /// Service contract lacking a backend
        service: String,
    },

    /// A member declares an interceptor type nobody provided
    #[error("No provider registered for declared interceptor {interceptor} on {member}")]
    MissingInterceptorProvider {
        /// Declared interceptor type
        interceptor: String,
        /// Member carrying the declaration
        member: String,
    },

    /// An interceptor called `proceed()` twice within one invocation
    #[error("proceed() called more than once by interceptor #{position} on {member}")]
    ProceedCalledTwice {
        /// Intercepted member
        member: String,
        /// Chain position of the offending interceptor
        position: usize,
    },

    /// An argument slot was missing, consumed or of another type
    #[error("Argument {index}: {message}")]
    Argument {
        /// Argument position
        index: usize,
        /// What went wrong
        message: String,
    },

    /// The return slot held a value of an unexpected type
    #[error("Return value of {member} is not a {expected}")]
    ReturnTypeMismatch {
        /// Intercepted member
        member: String,
        /// Type the caller expected
        expected: String,
    },

    /// The container has no binding for the requested service
    #[error("Service not bound: {service}")]
    NotBound {
        /// Requested service type
        service: String,
    },

    /// A constructor asked for a named argument the binding does not carry
    #[error("Missing constructor argument '{name}' for {implementation}")]
    MissingConstructorArgument {
        /// Argument name
        name: String,
        /// Implementation being constructed
        implementation: String,
    },

    /// Error raised by a target member or an interceptor
    #[error("{message}")]
    Raised {
        /// Error message
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal engine error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// Registration and planning error creation methods
impl Error {
    /// Create an invalid member selector error
    pub fn invalid_selector<S: Into<String>>(message: S) -> Self {
        Self::InvalidSelector {
            message: message.into(),
        }
    }

    /// Create a registration error
    pub fn registration<S: Into<String>>(message: S) -> Self {
        Self::Registration {
            message: message.into(),
        }
    }

    /// Create a planning error
    pub fn planning<I: Into<String>, R: Into<String>>(implementation: I, reason: R) -> Self {
        Self::Planning {
            implementation: implementation.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing backend error
    pub fn missing_backend<S: Into<String>>(service: S) -> Self {
        Self::MissingBackend {
            service: service.into(),
        }
    }

    /// Create a missing interceptor provider error
    pub fn missing_interceptor_provider<I: Into<String>, M: Into<String>>(
        interceptor: I,
        member: M,
    ) -> Self {
        Self::MissingInterceptorProvider {
            interceptor: interceptor.into(),
            member: member.into(),
        }
    }
}

// Invocation error creation methods
impl Error {
    /// Create a double-proceed error
    pub fn proceed_called_twice<S: Into<String>>(member: S, position: usize) -> Self {
        Self::ProceedCalledTwice {
            member: member.into(),
            position,
        }
    }

    /// Create an argument error
    pub fn argument<S: Into<String>>(index: usize, message: S) -> Self {
        Self::Argument {
            index,
            message: message.into(),
        }
    }

    /// Create a return type mismatch error
    pub fn return_type_mismatch<M: Into<String>, E: Into<String>>(member: M, expected: E) -> Self {
        Self::ReturnTypeMismatch {
            member: member.into(),
            expected: expected.into(),
        }
    }

    /// Create an error raised by a target or an interceptor
    pub fn raised<S: Into<String>>(message: S) -> Self {
        Self::Raised {
            message: message.into(),
            source: None,
        }
    }

    /// Create a raised error wrapping a source error
    pub fn raised_with_source<S: Into<String>, E>(message: S, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Raised {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Container and infrastructure error creation methods
impl Error {
    /// Create a not bound error
    pub fn not_bound<S: Into<String>>(service: S) -> Self {
        Self::NotBound {
            service: service.into(),
        }
    }

    /// Create a missing constructor argument error
    pub fn missing_constructor_argument<N: Into<String>, I: Into<String>>(
        name: N,
        implementation: I,
    ) -> Self {
        Self::MissingConstructorArgument {
            name: name.into(),
            implementation: implementation.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>, E>(message: S, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

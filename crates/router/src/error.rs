use thiserror::Error;

/// A route table that cannot be turned into a working router.
///
/// Every variant is a deterministic function of what was registered, so it is reported by
/// [`RouterBuilder::build`](crate::router::RouterBuilder::build) before any request is dispatched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("middleware '{name}' can not be resolved")]
    UnresolvableMiddleware { name: String },

    #[error("middleware group '{name}' refers to itself")]
    MiddlewareCycle { name: String },

    #[error("controller '{controller}' can not be resolved")]
    UnresolvableController { controller: String },

    #[error("controller '{controller}' has no action '{action}'")]
    MissingControllerAction { controller: String, action: String },

    #[error("invalid action '{action}', expect 'Controller@method'")]
    InvalidAction { action: String },

    #[error("malformed path template '{template}': {reason}")]
    MalformedTemplate { template: String, reason: String },

    #[error("unsupported route method '{method}'")]
    UnsupportedMethod { method: String },
}

impl ConfigurationError {
    pub fn unresolvable_middleware<S: ToString>(name: S) -> Self {
        Self::UnresolvableMiddleware { name: name.to_string() }
    }

    pub fn unresolvable_controller<S: ToString>(controller: S) -> Self {
        Self::UnresolvableController { controller: controller.to_string() }
    }

    pub fn missing_controller_action<S1: ToString, S2: ToString>(controller: S1, action: S2) -> Self {
        Self::MissingControllerAction { controller: controller.to_string(), action: action.to_string() }
    }

    pub fn malformed_template<S1: ToString, S2: ToString>(template: S1, reason: S2) -> Self {
        Self::MalformedTemplate { template: template.to_string(), reason: reason.to_string() }
    }
}

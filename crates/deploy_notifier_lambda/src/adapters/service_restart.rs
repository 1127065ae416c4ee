use crate::errors::ActionError;

/// Forces a rolling redeployment of the managed service with no payload
/// change, signalling it to pick up the latest configuration.
pub trait ServiceRestarter {
    fn force_redeploy(&self) -> Result<(), ActionError>;
}

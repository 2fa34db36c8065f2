//! User sign-in: reuse the layer-2 account when present, register otherwise.

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::imx::types::ether_key;
use crate::imx::{LazyLayer2, Layer2Error, RegistrationResult, UserRecord};
use crate::observability::metrics;

const COMPONENT: &str = "[imx-user-registration]";

#[derive(Debug, Error)]
pub enum RegisterUserError {
    #[error("user client unavailable: {0}")]
    Client(#[source] Layer2Error),

    #[error("user lookup failed: {0}")]
    Lookup(#[source] Layer2Error),

    #[error("user registration failed: {0}")]
    Registration(#[source] Layer2Error),
}

/// Body of a sign-in response; exactly one side is populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_user: Option<RegistrationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_user: Option<UserRecord>,
}

#[derive(Debug, Clone)]
pub struct UserService {
    client: Arc<LazyLayer2>,
}

impl UserService {
    pub fn new(client: Arc<LazyLayer2>) -> Self {
        Self { client }
    }

    /// Look the configured user up and register it when the platform does
    /// not know it.
    ///
    /// Only a definite "not found" leads to registration; any other lookup
    /// failure is returned as is.
    #[tracing::instrument(name = "sign_in", skip(self), fields(component = COMPONENT))]
    pub async fn sign_in(&self) -> Result<SignInOutcome, RegisterUserError> {
        let client = self.client.get().await.map_err(RegisterUserError::Client)?;
        let address = client.address();
        tracing::info!("Registering user...");

        match client.get_user(address).await {
            Ok(existing) => {
                tracing::info!(address = %ether_key(address), "User already exists");
                metrics::record_registration("already_registered");
                Ok(SignInOutcome {
                    existing_user: Some(existing),
                    ..Default::default()
                })
            }
            Err(e) if e.is_not_found() => {
                let created = client
                    .register_imx(address, client.stark_public_key())
                    .await
                    .map_err(|e| {
                        metrics::record_registration("failed");
                        RegisterUserError::Registration(e)
                    })?;
                tracing::info!(
                    address = %ether_key(address),
                    tx_hash = %created.tx_hash,
                    "User has been created"
                );
                metrics::record_registration("submitted");
                Ok(SignInOutcome {
                    new_user: Some(created),
                    ..Default::default()
                })
            }
            Err(e) => {
                tracing::error!(error = %e, kind = e.kind(), "User lookup failed");
                Err(RegisterUserError::Lookup(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imx::client::Layer2Handle;
    use crate::imx::testing::{FakeLayer2, Lookup};
    use serde_json::json;
    use std::sync::atomic::Ordering;

    fn service(fake: Arc<FakeLayer2>) -> UserService {
        let handle: Layer2Handle = fake;
        UserService::new(Arc::new(LazyLayer2::ready(handle)))
    }

    #[tokio::test]
    async fn test_existing_user_is_not_registered() {
        let fake = Arc::new(FakeLayer2::new(Lookup::Found, Some("0x01".to_string())));
        let outcome = service(fake.clone()).sign_in().await.unwrap();

        assert!(outcome.existing_user.is_some());
        assert!(outcome.new_user.is_none());
        assert_eq!(fake.register_calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"existingUser": {"accounts": ["0x0f"]}})
        );
    }

    #[tokio::test]
    async fn test_unknown_user_is_registered_once() {
        let fake = Arc::new(FakeLayer2::new(Lookup::NotFound, Some("0x01".to_string())));
        let outcome = service(fake.clone()).sign_in().await.unwrap();

        assert_eq!(fake.register_calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"newUser": {"tx_hash": "0x01"}})
        );
    }

    #[tokio::test]
    async fn test_lookup_outage_does_not_register() {
        let fake = Arc::new(FakeLayer2::new(Lookup::Unavailable, Some("0x01".to_string())));
        let err = service(fake.clone()).sign_in().await.unwrap_err();

        assert!(matches!(err, RegisterUserError::Lookup(Layer2Error::Transport(_))));
        assert_eq!(fake.register_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_registration_failure_is_wrapped() {
        let fake = Arc::new(FakeLayer2::new(Lookup::NotFound, None));
        let err = service(fake.clone()).sign_in().await.unwrap_err();

        assert!(matches!(
            err,
            RegisterUserError::Registration(Layer2Error::Api { status: 400, .. })
        ));
        assert!(err.to_string().contains("invalid signature"));
    }
}

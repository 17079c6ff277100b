//! Transform provisioning
//!
//! Idempotent lookup-or-create of a named transform. A transform that already
//! exists under the requested name is returned as is; its outputs are not
//! compared with the recipe the request would have produced.

use std::fmt;
use std::sync::Arc;

use mediaprov_core::ladder;
use mediaprov_core::validation::{self, TransformRequest};
use mediaprov_core::{AppError, MediaServicesScope};
use serde_json::Value;

use crate::control_plane::MediaControlPlane;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// A transform with the name already existed
    Existing,
    /// The transform was submitted by this call
    Created,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedTransform {
    pub transform_id: String,
    pub outcome: ProvisionOutcome,
}

/// Provisioning stages, emitted as the `stage` log field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Validating,
    Querying,
    Found,
    NotFound,
    Building,
    Submitting,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validating => "validating",
            Stage::Querying => "querying",
            Stage::Found => "found",
            Stage::NotFound => "not_found",
            Stage::Building => "building",
            Stage::Submitting => "submitting",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Clone)]
pub struct TransformProvisioner {
    control_plane: Arc<dyn MediaControlPlane>,
    scope: MediaServicesScope,
}

impl TransformProvisioner {
    pub fn new(control_plane: Arc<dyn MediaControlPlane>, scope: MediaServicesScope) -> Self {
        Self {
            control_plane,
            scope,
        }
    }

    /// Validate a raw request body and provision the transform it names.
    pub async fn provision_raw(&self, raw: &Value) -> Result<ProvisionedTransform, AppError> {
        tracing::debug!(stage = %Stage::Validating, "Validating transform request");
        let request = validation::validate(raw).map_err(|e| {
            tracing::debug!(stage = %Stage::Validating, error = %e, "Transform request rejected");
            e
        })?;
        self.provision(&request).await
    }

    #[tracing::instrument(skip(self, request), fields(
        transform_name = %request.transform_name,
        account = %self.scope.account_name
    ))]
    pub async fn provision(
        &self,
        request: &TransformRequest,
    ) -> Result<ProvisionedTransform, AppError> {
        let name = request.transform_name.as_str();

        tracing::debug!(stage = %Stage::Querying, "Looking up transform");
        let existing = self
            .control_plane
            .get_transform(&self.scope, name)
            .await
            .map_err(|e| {
                tracing::warn!(stage = %Stage::Querying, error = %e, "Transform lookup failed");
                AppError::from(e)
            })?;

        if let Some(transform) = existing {
            tracing::info!(
                stage = %Stage::Found,
                transform_id = %transform.id,
                "Transform already exists"
            );
            return Ok(ProvisionedTransform {
                transform_id: transform.id,
                outcome: ProvisionOutcome::Existing,
            });
        }

        tracing::debug!(stage = %Stage::NotFound, "Transform does not exist");
        tracing::debug!(stage = %Stage::Building, "Building transform recipe");
        let recipe = ladder::build(&request.selector);
        let description = recipe.description();
        let outputs = [recipe.into_output()];

        tracing::debug!(stage = %Stage::Submitting, "Submitting transform");
        let transform = self
            .control_plane
            .create_or_update_transform(&self.scope, name, &outputs, description)
            .await
            .map_err(|e| {
                tracing::warn!(stage = %Stage::Submitting, error = %e, "Transform submission failed");
                AppError::from(e)
            })?;

        tracing::info!(
            stage = %Stage::Done,
            transform_id = %transform.id,
            "Transform created"
        );

        Ok(ProvisionedTransform {
            transform_id: transform.id,
            outcome: ProvisionOutcome::Created,
        })
    }
}

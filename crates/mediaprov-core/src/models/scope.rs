use serde::{Deserialize, Serialize};

/// The Media Services account every control-plane call is made in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaServicesScope {
    pub subscription_id: String,
    pub resource_group: String,
    pub account_name: String,
}

impl MediaServicesScope {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
        account_name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
            account_name: account_name.into(),
        }
    }

    /// ARM resource path of the account, without the endpoint host.
    pub fn account_path(&self) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Media/mediaServices/{}",
            self.subscription_id, self.resource_group, self.account_name
        )
    }
}

use database::organization::Organization;

use crate::speaker::avatar::AvatarPolicy;

/// What a request knows about where it runs: the organization, the conference
/// being administered, and the platform limits that apply to uploads.
#[derive(Debug, Clone)]
pub struct FormContext {
    pub organization: Organization,
    pub conference_id: i64,
    pub avatar_policy: AvatarPolicy,
    /// Overrides the organization's stored default locale.
    pub locale: Option<String>,
}

impl FormContext {
    pub fn default_locale(&self) -> &str {
        self.locale.as_deref().unwrap_or(&self.organization.default_locale)
    }
}

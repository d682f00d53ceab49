//! Contact and organization records.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One person, as resolved from a data provider node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, alias = "photo")]
    pub photo_path: Option<PathBuf>,
    #[serde(default, alias = "linkedIn")]
    pub linked_in_handle: Option<String>,
}

impl ContactRecord {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Default::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_photo(mut self, path: impl Into<PathBuf>) -> Self {
        self.photo_path = Some(path.into());
        self
    }

    pub fn with_linked_in(mut self, handle: impl Into<String>) -> Self {
        self.linked_in_handle = Some(handle.into());
        self
    }

    /// Display name, `First Last`.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Photo path, ignoring an empty string.
    pub fn photo(&self) -> Option<&std::path::Path> {
        self.photo_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

/// Run-level organization metadata shared by every card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub logo_path: Option<PathBuf>,
    #[serde(default)]
    pub url: Option<String>,
}

impl OrganizationInfo {
    pub fn logo(&self) -> Option<&std::path::Path> {
        self.logo_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

/// Treat `None` and `""` alike: an empty field is not emitted.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

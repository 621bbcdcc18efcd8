//! Mailing list descriptors and the operations on them.

use crate::{
    address::validate_address,
    metadata::{path_of, RequestMetadata},
    paging::{Cursor, Page, PageRequest},
    Client, Result,
};
use http::Method;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::SystemTime;

/// Who may post to and view a list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// Only the owner may post.
    #[default]
    ReadOnly,
    /// Members may post.
    Members,
    /// Anyone may post.
    Everyone,
}

impl AccessLevel {
    /// The wire name of this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::ReadOnly => "readonly",
            AccessLevel::Members => "members",
            AccessLevel::Everyone => "everyone",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mailing list descriptor.
///
/// The address is the durable key for every later operation. `created_at`
/// and `members_count` are assigned by the server and ignored on create.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    /// The list address, e.g. `dev@mg.example.com`.
    pub address: String,
    /// Human readable name.
    #[serde(default)]
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Posting permissions.
    #[serde(default)]
    pub access_level: AccessLevel,
    /// Server timestamp, e.g. `Tue, 09 Aug 2016 20:05:31 -0000`.
    #[serde(default)]
    pub created_at: String,
    /// Number of members on the list.
    #[serde(default)]
    pub members_count: u64,
}

impl List {
    /// Creates a descriptor with only the address set.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the access level.
    pub fn with_access_level(mut self, access_level: AccessLevel) -> Self {
        self.access_level = access_level;
        self
    }

    /// Parses `created_at`.
    ///
    /// Returns `None` if the list has not been created yet or the timestamp
    /// is not in UTC.
    ///
    /// # Examples
    ///
    /// ```
    /// use mailgun_lists::List;
    ///
    /// let mut list = List::new("dev@mg.example.com");
    /// assert!(list.created_at_time().is_none());
    ///
    /// list.created_at = "Tue, 09 Aug 2016 20:05:31 -0000".to_string();
    /// assert!(list.created_at_time().is_some());
    /// ```
    pub fn created_at_time(&self) -> Option<SystemTime> {
        let trimmed = self.created_at.trim();
        let stamp = ["-0000", "+0000", "UTC", "GMT"]
            .iter()
            .find_map(|zone| trimmed.strip_suffix(zone))?;
        httpdate::parse_http_date(&format!("{}GMT", stamp)).ok()
    }

    fn create_form(&self) -> Vec<(String, String)> {
        let mut form = vec![("address".to_string(), self.address.clone())];
        if !self.name.is_empty() {
            form.push(("name".to_string(), self.name.clone()));
        }
        if !self.description.is_empty() {
            form.push(("description".to_string(), self.description.clone()));
        }
        form.push((
            "access_level".to_string(),
            self.access_level.as_str().to_string(),
        ));
        form
    }
}

/// A partial update to a list.
///
/// Unset and empty fields leave the stored value alone. The address and
/// creation time cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListUpdate {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New access level.
    pub access_level: Option<AccessLevel>,
}

impl ListUpdate {
    /// An update that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Changes the name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Changes the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Changes the access level.
    pub fn access_level(mut self, access_level: AccessLevel) -> Self {
        self.access_level = Some(access_level);
        self
    }

    fn form(&self) -> Vec<(String, String)> {
        let mut form = Vec::new();
        if let Some(name) = self.name.as_ref().filter(|n| !n.is_empty()) {
            form.push(("name".to_string(), name.clone()));
        }
        if let Some(description) = self.description.as_ref().filter(|d| !d.is_empty()) {
            form.push(("description".to_string(), description.clone()));
        }
        if let Some(level) = self.access_level {
            form.push(("access_level".to_string(), level.as_str().to_string()));
        }
        form
    }
}

#[derive(Deserialize)]
pub(crate) struct ListEnvelope {
    pub(crate) list: List,
}

impl Client {
    /// Creates a mailing list.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`](crate::Error::Validation) if the address is
    ///   not a valid email address (nothing is sent).
    /// - [`Error::Conflict`](crate::Error::Conflict) if the list exists.
    pub async fn create_list(&self, list: &List) -> Result<List> {
        validate_address(&list.address)?;

        let metadata =
            RequestMetadata::new(Method::POST, path_of(&["lists"])).with_form(list.create_form());
        let envelope: ListEnvelope = self.call(metadata).await?;

        tracing::debug!(address = %envelope.list.address, "Created mailing list");
        Ok(envelope.list)
    }

    /// Fetches a list by address.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`](crate::Error::Validation) for a malformed
    ///   address (nothing is sent).
    /// - [`Error::NotFound`](crate::Error::NotFound) if there is no such list.
    pub async fn get_list_by_address(&self, address: &str) -> Result<List> {
        validate_address(address)?;
        let metadata = RequestMetadata::new(Method::GET, path_of(&["lists", address]));
        let envelope: ListEnvelope = self.call(metadata).await?;
        Ok(envelope.list)
    }

    /// Fetches one page of lists.
    ///
    /// `address` restricts the result to a single list address; `None` or an
    /// empty string means no filtering.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`](crate::Error::Validation) for a zero
    /// page size.
    pub async fn get_lists(
        &self,
        page: PageRequest,
        address: Option<&str>,
    ) -> Result<Page<List>> {
        self.get_lists_at(&Cursor::Offset(page), address).await
    }

    /// Fetches the page of lists a cursor points at.
    ///
    /// The address filter only applies to offset cursors; continuation
    /// cursors already carry the filter they were created with and are sent
    /// to the path the server gave.
    pub async fn get_lists_at(
        &self,
        cursor: &Cursor,
        address: Option<&str>,
    ) -> Result<Page<List>> {
        let mut params = cursor.query_pairs()?;
        let address = address.filter(|a| !a.is_empty());
        if let (Cursor::Offset(_), Some(address)) = (cursor, address) {
            params.push(("address".to_string(), address.to_string()));
        }

        let path = cursor.request_path(self.config().base_url(), path_of(&["lists"]))?;
        let metadata = RequestMetadata::new(Method::GET, path).with_query_params(params);
        self.call(metadata).await
    }

    /// Walks every page and returns all lists.
    pub async fn get_all_lists(&self, address: Option<&str>) -> Result<Vec<List>> {
        let mut cursor = Cursor::default();
        let mut lists = Vec::new();

        loop {
            let page = self.get_lists_at(&cursor, address).await?;
            let next = page.next_cursor(&cursor);
            lists.extend(page.items);
            match next {
                Some(next) => cursor = next,
                None => break,
            }
        }

        Ok(lists)
    }

    /// Applies a partial update to a list and returns the stored result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) if there is no such
    /// list.
    pub async fn update_list(&self, address: &str, update: &ListUpdate) -> Result<List> {
        validate_address(address)?;
        let metadata = RequestMetadata::new(Method::PUT, path_of(&["lists", address]))
            .with_form(update.form());
        let envelope: ListEnvelope = self.call(metadata).await?;
        Ok(envelope.list)
    }

    /// Deletes a list and all of its members.
    ///
    /// Not idempotent: deleting a missing list fails.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`](crate::Error::Validation) for a malformed
    ///   address (nothing is sent).
    /// - [`Error::NotFound`](crate::Error::NotFound) if there is no such list.
    pub async fn delete_list(&self, address: &str) -> Result<()> {
        validate_address(address)?;
        let metadata = RequestMetadata::new(Method::DELETE, path_of(&["lists", address]));
        self.call_discarding(metadata).await?;

        tracing::debug!(address = %address, "Deleted mailing list");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_level_wire_names() {
        assert_eq!(
            serde_json::to_string(&AccessLevel::ReadOnly).unwrap(),
            "\"readonly\""
        );
        let level: AccessLevel = serde_json::from_str("\"everyone\"").unwrap();
        assert_eq!(level, AccessLevel::Everyone);
        assert_eq!(AccessLevel::Members.to_string(), "members");
    }

    #[test]
    fn test_list_deserializes_server_payload() {
        let list: List = serde_json::from_str(
            r#"{
                "access_level": "members",
                "address": "dev@mg.example.com",
                "created_at": "Tue, 09 Aug 2016 20:05:31 -0000",
                "description": "Developers",
                "members_count": 3,
                "name": "dev"
            }"#,
        )
        .unwrap();
        assert_eq!(list.access_level, AccessLevel::Members);
        assert_eq!(list.members_count, 3);
        assert!(list.created_at_time().is_some());
    }

    #[test]
    fn test_created_at_rejects_non_utc_offset() {
        let mut list = List::new("dev@mg.example.com");
        list.created_at = "Tue, 09 Aug 2016 20:05:31 +0200".to_string();
        assert!(list.created_at_time().is_none());
    }

    #[test]
    fn test_create_form_skips_empty_fields() {
        let form = List::new("dev@mg.example.com").create_form();
        assert_eq!(
            form,
            vec![
                ("address".to_string(), "dev@mg.example.com".to_string()),
                ("access_level".to_string(), "readonly".to_string())
            ]
        );
    }

    #[test]
    fn test_update_form_only_has_set_fields() {
        let update = ListUpdate::new().description("changed").name("");
        assert_eq!(
            update.form(),
            vec![("description".to_string(), "changed".to_string())]
        );
        assert!(ListUpdate::new().form().is_empty());
    }
}

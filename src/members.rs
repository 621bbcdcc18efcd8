//! List members, single and bulk writes, and member listings.
//!
//! Subscription is tri-state on input (`None` leaves the server to decide or
//! keeps the stored value) but always concrete once stored: a [`Member`]
//! read back from the API is either subscribed or not.

use crate::{
    address::{parse_address, validate_address},
    lists::ListEnvelope,
    metadata::{path_of, RequestMetadata},
    paging::{Cursor, Page, PageRequest, SubscriptionFilter},
    Client, Error, List, Result,
};
use http::Method;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Largest number of records accepted by one bulk insert.
pub const MAX_BATCH_SIZE: usize = 1000;

/// Arbitrary per-member data.
pub type Vars = Map<String, Value>;

/// A stored list member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// The bare member address; unique within a list.
    pub address: String,
    /// Display name, empty when none was given.
    #[serde(default)]
    pub name: String,
    /// Custom variables attached to the member.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub vars: Vars,
    /// Subscription state.
    #[serde(default = "subscribed_by_default")]
    pub subscribed: bool,
}

fn subscribed_by_default() -> bool {
    true
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vars, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vars>::deserialize(deserializer)?.unwrap_or_default())
}

/// A member to create.
///
/// The address may carry a display name (`"Joe Cool <joe@example.com>"`).
/// Only the bare address is stored as the identity; the display name is used
/// as the member name unless `name` is set explicitly.
///
/// # Examples
///
/// ```
/// use mailgun_lists::NewMember;
/// use serde_json::json;
///
/// let member = NewMember::new("Joe Cool <joe@example.com>")
///     .var("team", json!("platform"))
///     .subscribed(false);
/// assert_eq!(member.subscribed, Some(false));
/// assert!(member.name.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewMember {
    /// Address, optionally with a display name.
    pub address: String,
    /// Explicit name; wins over a display name in the address.
    pub name: Option<String>,
    /// Custom variables.
    pub vars: Option<Vars>,
    /// Subscription state; `None` leaves it to the server default.
    pub subscribed: Option<bool>,
}

impl NewMember {
    /// Creates a member with only the address set.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    /// Sets the name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces all custom variables.
    pub fn vars(mut self, vars: Vars) -> Self {
        self.vars = Some(vars);
        self
    }

    /// Adds one custom variable.
    pub fn var(mut self, key: impl Into<String>, value: Value) -> Self {
        self.vars
            .get_or_insert_with(Vars::new)
            .insert(key.into(), value);
        self
    }

    /// Sets the subscription state.
    pub fn subscribed(mut self, subscribed: bool) -> Self {
        self.subscribed = Some(subscribed);
        self
    }
}

/// A partial update to a member.
///
/// Only fields that are `Some` are sent. `vars` replaces the stored map
/// wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberUpdate {
    /// New name.
    pub name: Option<String>,
    /// New custom variables.
    pub vars: Option<Vars>,
    /// New subscription state.
    pub subscribed: Option<bool>,
}

impl MemberUpdate {
    /// An update that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Changes the name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the custom variables.
    pub fn vars(mut self, vars: Vars) -> Self {
        self.vars = Some(vars);
        self
    }

    /// Changes the subscription state.
    pub fn subscribed(mut self, subscribed: bool) -> Self {
        self.subscribed = Some(subscribed);
        self
    }

    fn form(&self) -> Result<Vec<(String, String)>> {
        let mut form = Vec::new();
        if let Some(name) = &self.name {
            form.push(("name".to_string(), name.clone()));
        }
        if let Some(vars) = &self.vars {
            form.push(("vars".to_string(), vars_json(vars)?));
        }
        if let Some(subscribed) = self.subscribed {
            form.push(("subscribed".to_string(), yes_no(subscribed).to_string()));
        }
        Ok(form)
    }
}

/// One record of a bulk insert.
///
/// Records may be bare address strings or full member descriptions and can
/// be mixed freely in one batch.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberRecord {
    /// Just an address, optionally with a display name.
    Address(String),
    /// A member with any of its optional fields set.
    Member(NewMember),
}

impl MemberRecord {
    /// The address as given, possibly with a display name.
    pub fn address(&self) -> &str {
        match self {
            MemberRecord::Address(address) => address,
            MemberRecord::Member(member) => &member.address,
        }
    }

    /// The explicitly given name.
    pub fn name(&self) -> Option<&str> {
        match self {
            MemberRecord::Address(_) => None,
            MemberRecord::Member(member) => member.name.as_deref(),
        }
    }

    /// The explicitly given variables.
    pub fn vars(&self) -> Option<&Vars> {
        match self {
            MemberRecord::Address(_) => None,
            MemberRecord::Member(member) => member.vars.as_ref(),
        }
    }

    /// The explicitly given subscription state.
    pub fn subscribed(&self) -> Option<bool> {
        match self {
            MemberRecord::Address(_) => None,
            MemberRecord::Member(member) => member.subscribed,
        }
    }

    /// Resolves the record against batch defaults. Record fields win.
    fn to_wire(&self, defaults: &BatchDefaults) -> Result<WireMember> {
        let parsed = parse_address(self.address())?;
        let name = self
            .name()
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .or(parsed.display_name);

        Ok(WireMember {
            address: parsed.address,
            name,
            vars: self.vars().or(defaults.vars.as_ref()).cloned(),
            subscribed: self.subscribed().or(defaults.subscribed),
        })
    }
}

impl From<&str> for MemberRecord {
    fn from(address: &str) -> Self {
        MemberRecord::Address(address.to_string())
    }
}

impl From<String> for MemberRecord {
    fn from(address: String) -> Self {
        MemberRecord::Address(address)
    }
}

impl From<NewMember> for MemberRecord {
    fn from(member: NewMember) -> Self {
        MemberRecord::Member(member)
    }
}

/// Defaults applied to every record of a bulk insert that does not set the
/// field itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchDefaults {
    /// Subscription state for records that leave it unset.
    pub subscribed: Option<bool>,
    /// Variables for records that carry none.
    pub vars: Option<Vars>,
    /// Overwrite members that already exist instead of failing.
    pub upsert: bool,
}

impl BatchDefaults {
    /// No defaults, no upsert.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default subscription state.
    pub fn subscribed(mut self, subscribed: bool) -> Self {
        self.subscribed = Some(subscribed);
        self
    }

    /// Sets the default variables.
    pub fn vars(mut self, vars: Vars) -> Self {
        self.vars = Some(vars);
        self
    }

    /// Enables or disables upsert.
    pub fn upsert(mut self, upsert: bool) -> Self {
        self.upsert = upsert;
        self
    }
}

#[derive(Debug, Serialize, PartialEq)]
struct WireMember {
    address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vars: Option<Vars>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subscribed: Option<bool>,
}

#[derive(Deserialize)]
struct MemberEnvelope {
    member: Member,
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn vars_json(vars: &Vars) -> Result<String> {
    serde_json::to_string(vars).map_err(|e| Error::SerializationFailed(e.to_string()))
}

fn members_path(list: &str) -> Result<String> {
    validate_address(list)?;
    Ok(path_of(&["lists", list, "members"]))
}

fn member_path(list: &str, member: &str) -> Result<String> {
    validate_address(list)?;
    let member = parse_address(member)?;
    Ok(path_of(&["lists", list, "members", &member.address]))
}

impl Client {
    /// Fetches one page of a list's members.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a zero page size and
    /// [`Error::NotFound`] if the list does not exist.
    pub async fn get_members(
        &self,
        list: &str,
        page: PageRequest,
        filter: SubscriptionFilter,
    ) -> Result<Page<Member>> {
        self.get_members_at(list, filter, &Cursor::Offset(page)).await
    }

    /// Fetches the page of members a cursor points at.
    ///
    /// The filter only applies to offset cursors; continuation cursors
    /// already carry the filter they were created with and are sent to the
    /// path the server gave.
    pub async fn get_members_at(
        &self,
        list: &str,
        filter: SubscriptionFilter,
        cursor: &Cursor,
    ) -> Result<Page<Member>> {
        let mut params = cursor.query_pairs()?;
        if let (Cursor::Offset(_), Some(value)) = (cursor, filter.query_value()) {
            params.push(("subscribed".to_string(), value.to_string()));
        }

        let path = cursor.request_path(self.config().base_url(), members_path(list)?)?;
        let metadata = RequestMetadata::new(Method::GET, path).with_query_params(params);
        self.call(metadata).await
    }

    /// Walks every page and returns all matching members.
    pub async fn get_all_members(
        &self,
        list: &str,
        filter: SubscriptionFilter,
    ) -> Result<Vec<Member>> {
        let mut cursor = Cursor::default();
        let mut members = Vec::new();

        loop {
            let page = self.get_members_at(list, filter, &cursor).await?;
            let next = page.next_cursor(&cursor);
            members.extend(page.items);
            match next {
                Some(next) => cursor = next,
                None => break,
            }
        }

        tracing::debug!(list = %list, count = members.len(), "Fetched all members");
        Ok(members)
    }

    /// Fetches one member of a list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the member is not on the list.
    pub async fn get_member_by_address(&self, member: &str, list: &str) -> Result<Member> {
        let metadata = RequestMetadata::new(Method::GET, member_path(list, member)?);
        let envelope: MemberEnvelope = self.call(metadata).await?;
        Ok(envelope.member)
    }

    /// Adds a member to a list.
    ///
    /// With `upsert` an existing member is updated in place: fields left
    /// unset keep their stored values. A member created without an explicit
    /// subscription state starts out subscribed.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] for a malformed address (nothing is sent).
    /// - [`Error::Conflict`] if the member exists and `upsert` is false.
    pub async fn create_member(
        &self,
        upsert: bool,
        list: &str,
        member: &NewMember,
    ) -> Result<Member> {
        let record = MemberRecord::Member(member.clone());
        let wire = record.to_wire(&BatchDefaults::default())?;

        let mut form = vec![("address".to_string(), wire.address)];
        if let Some(name) = wire.name {
            form.push(("name".to_string(), name));
        }
        if let Some(vars) = &wire.vars {
            form.push(("vars".to_string(), vars_json(vars)?));
        }
        if let Some(subscribed) = wire.subscribed {
            form.push(("subscribed".to_string(), yes_no(subscribed).to_string()));
        }
        form.push(("upsert".to_string(), yes_no(upsert).to_string()));

        let metadata = RequestMetadata::new(Method::POST, members_path(list)?).with_form(form);
        let envelope: MemberEnvelope = self.call(metadata).await?;
        Ok(envelope.member)
    }

    /// Adds many members to a list in one request.
    ///
    /// Every record is resolved against `defaults` (record fields win) and
    /// validated before anything is sent. A single bad record fails the
    /// whole batch with one [`Error::Validation`] listing every problem.
    /// Returns the list descriptor after the insert.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use mailgun_lists::{Client, Config, MemberRecord, NewMember};
    ///
    /// # async fn example() -> Result<(), mailgun_lists::Error> {
    /// let client = Client::new(Config::from_env()?)?;
    /// let records = vec![
    ///     MemberRecord::from("ann@example.com"),
    ///     MemberRecord::from(NewMember::new("Bob <bob@example.com>").subscribed(false)),
    /// ];
    /// client.create_member_list(None, "dev@mg.example.com", &records).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_member_list(
        &self,
        defaults: Option<&BatchDefaults>,
        list: &str,
        members: &[MemberRecord],
    ) -> Result<List> {
        validate_address(list)?;
        let fallback = BatchDefaults::default();
        let defaults = defaults.unwrap_or(&fallback);
        let wire = resolve_batch(defaults, members)?;

        let payload = serde_json::to_string(&wire)
            .map_err(|e| Error::SerializationFailed(e.to_string()))?;
        let form = vec![
            ("members".to_string(), payload),
            ("upsert".to_string(), yes_no(defaults.upsert).to_string()),
        ];

        let metadata =
            RequestMetadata::new(Method::POST, path_of(&["lists", list, "members.json"]))
                .with_form(form);
        let envelope: ListEnvelope = self.call(metadata).await?;

        tracing::info!(list = %list, count = wire.len(), "Bulk inserted members");
        Ok(envelope.list)
    }

    /// Applies a partial update to a member and returns the stored result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the member is not on the list.
    pub async fn update_member(
        &self,
        member: &str,
        list: &str,
        update: &MemberUpdate,
    ) -> Result<Member> {
        let metadata = RequestMetadata::new(Method::PUT, member_path(list, member)?)
            .with_form(update.form()?);
        let envelope: MemberEnvelope = self.call(metadata).await?;
        Ok(envelope.member)
    }

    /// Marks a member as subscribed, leaving everything else unchanged.
    pub async fn subscribe(&self, member: &str, list: &str) -> Result<Member> {
        self.update_member(member, list, &MemberUpdate::new().subscribed(true))
            .await
    }

    /// Marks a member as unsubscribed, leaving everything else unchanged.
    pub async fn unsubscribe(&self, member: &str, list: &str) -> Result<Member> {
        self.update_member(member, list, &MemberUpdate::new().subscribed(false))
            .await
    }

    /// Removes a member from a list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the member is not on the list.
    pub async fn delete_member(&self, member: &str, list: &str) -> Result<()> {
        let metadata = RequestMetadata::new(Method::DELETE, member_path(list, member)?);
        self.call_discarding(metadata).await
    }
}

fn resolve_batch(defaults: &BatchDefaults, members: &[MemberRecord]) -> Result<Vec<WireMember>> {
    if members.is_empty() {
        return Err(Error::validation("bulk insert needs at least one member"));
    }
    if members.len() > MAX_BATCH_SIZE {
        return Err(Error::validation(format!(
            "bulk insert accepts at most {} members, got {}",
            MAX_BATCH_SIZE,
            members.len()
        )));
    }

    let mut wire = Vec::with_capacity(members.len());
    let mut problems = Vec::new();
    for (index, record) in members.iter().enumerate() {
        match record.to_wire(defaults) {
            Ok(member) => wire.push(member),
            Err(e) => problems.push(format!("record {}: {}", index, e)),
        }
    }

    if !problems.is_empty() {
        return Err(Error::validation(problems.join("; ")));
    }
    Ok(wire)
}

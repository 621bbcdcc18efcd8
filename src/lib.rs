//! # mailgun-lists - Mailing list management for the Mailgun API
//!
//! An async client for creating, inspecting and updating mailing lists and
//! their members. Listings are paginated with cursors, bulk inserts are
//! validated up front and applied all-or-nothing, and optional fields keep
//! "not set" distinct from "false" so partial updates only touch what the
//! caller asked for.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mailgun_lists::{
//!     AccessLevel, Client, Config, List, MemberUpdate, NewMember, PageRequest, SubscriptionFilter,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mailgun_lists::Error> {
//!     // MG_API_KEY and MG_DOMAIN must be set
//!     let client = Client::new(Config::from_env()?)?;
//!
//!     let address = format!("dev@{}", client.config().domain());
//!     client
//!         .create_list(&List::new(&address).with_access_level(AccessLevel::Members))
//!         .await?;
//!
//!     client
//!         .create_member(true, &address, &NewMember::new("Joe Example <joe@example.com>"))
//!         .await?;
//!     client
//!         .update_member("joe@example.com", &address, &MemberUpdate::new().name("Joe Cool"))
//!         .await?;
//!
//!     let page = client
//!         .get_members(&address, PageRequest::default(), SubscriptionFilter::Subscribed)
//!         .await?;
//!     println!("{} subscribed members", page.total_count);
//!
//!     client.delete_list(&address).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Status codes map onto [`Error`] variants: 404 is [`Error::NotFound`], 409
//! is [`Error::Conflict`], 400 and 422 are [`Error::Validation`] and any other
//! failure status is [`Error::RequestFailed`] with the raw body attached.
//! Network failures arrive as [`Error::Transport`]. Nothing is retried.
//!
//! ```no_run
//! use mailgun_lists::{Client, Error};
//!
//! # async fn example(client: Client) -> Result<(), Error> {
//! match client.get_member_by_address("joe@example.com", "dev@mg.example.com").await {
//!     Ok(member) => println!("subscribed: {}", member.subscribed),
//!     Err(Error::NotFound { .. }) => println!("not a member"),
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! Requests and responses are reported through `tracing`. Install any
//! subscriber to see them; the library installs none.

mod address;
mod client;
pub mod config;
mod error;
pub mod lists;
pub mod members;
pub mod metadata;
pub mod paging;
mod response;
pub mod transport;

pub use address::{parse_address, validate_address, ParsedAddress};
pub use client::{Client, ClientBuilder};
pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use lists::{AccessLevel, List, ListUpdate};
pub use members::{BatchDefaults, Member, MemberRecord, MemberUpdate, NewMember, Vars};
pub use paging::{Cursor, Page, PageRequest, Paging, SubscriptionFilter};
pub use response::RawResponse;
pub use transport::{HttpTransport, Transport};

//! Walks through the list and member lifecycle against a live account.
//!
//! This example shows how to:
//! - Load credentials from the environment
//! - Create a list and add members one at a time and in bulk
//! - Page through members with a subscription filter
//! - Update and remove members, then delete the list
//!
//! Run with: `MG_API_KEY=... MG_DOMAIN=... cargo run --example mailing_lists`

use mailgun_lists::{
    AccessLevel, Client, Config, Cursor, Error, List, MemberRecord, MemberUpdate, NewMember,
    PageRequest, SubscriptionFilter,
};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("mailgun_lists=debug,mailing_lists=info")
        .init();

    let client = Client::new(Config::from_env()?)?;
    let address = format!("demo-list@{}", client.config().domain());

    println!("=== Creating list {} ===", address);
    let list = client
        .create_list(
            &List::new(&address)
                .with_name("Demo list")
                .with_description("Created by the mailing_lists example")
                .with_access_level(AccessLevel::Members),
        )
        .await?;
    println!("Created at: {}", list.created_at);

    println!("=== Adding members ===");
    client
        .create_member(true, &address, &NewMember::new("Joe Example <joe@example.com>"))
        .await?;

    let records = vec![
        MemberRecord::from("ann@example.com"),
        MemberRecord::from(NewMember::new("bob@example.com").subscribed(false)),
        MemberRecord::from(NewMember::new("cat@example.com").var("team", json!("platform"))),
    ];
    let list = client.create_member_list(None, &address, &records).await?;
    println!("Members after bulk insert: {}", list.members_count);

    println!("=== Subscribed members, two per page ===");
    let mut cursor = Cursor::Offset(PageRequest::new(2, 0));
    loop {
        let page = client
            .get_members_at(&address, SubscriptionFilter::Subscribed, &cursor)
            .await?;
        for member in &page.items {
            println!("  {} ({})", member.address, member.name);
        }
        match page.next_cursor(&cursor) {
            Some(next) => cursor = next,
            None => break,
        }
    }

    println!("=== Updating and removing ===");
    let joe = client
        .update_member("joe@example.com", &address, &MemberUpdate::new().name("Joe Cool"))
        .await?;
    println!("Renamed to {}, still subscribed: {}", joe.name, joe.subscribed);
    client.delete_member("joe@example.com", &address).await?;

    client.delete_list(&address).await?;
    match client.get_list_by_address(&address).await {
        Err(Error::NotFound { .. }) => println!("List deleted"),
        Ok(_) => println!("List still visible; deletion may take a moment to propagate"),
        Err(e) => return Err(e),
    }

    Ok(())
}

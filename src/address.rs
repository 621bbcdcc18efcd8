//! Email address syntax checks and display-name parsing.

use crate::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

static ADDR_SPEC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@",
        r"[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?",
        r"(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    ))
    .expect("address pattern is valid")
});

// `Display Name <local@domain>`, display name optionally quoted.
static NAME_ADDR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*(?:"([^"]*)"|([^<>"]*?))\s*<([^<>]+)>\s*$"#)
        .expect("name-addr pattern is valid")
});

/// An address split into its identity and optional display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAddress {
    /// The bare `local@domain` address.
    pub address: String,
    /// The display name, when the input carried one.
    pub display_name: Option<String>,
}

/// Splits `"Display Name <addr@example.com>"` into name and bare address.
///
/// Bare addresses pass through with no display name. The bare address is
/// validated; an invalid one yields [`Error::Validation`].
///
/// # Examples
///
/// ```
/// use mailgun_lists::parse_address;
///
/// let parsed = parse_address("Joe Cool <joe@example.com>").unwrap();
/// assert_eq!(parsed.address, "joe@example.com");
/// assert_eq!(parsed.display_name.as_deref(), Some("Joe Cool"));
///
/// let bare = parse_address("joe@example.com").unwrap();
/// assert_eq!(bare.display_name, None);
/// ```
pub fn parse_address(input: &str) -> Result<ParsedAddress> {
    let (display_name, address) = match NAME_ADDR.captures(input) {
        Some(caps) => {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str().trim())
                .filter(|n| !n.is_empty())
                .map(str::to_string);
            let address = caps.get(3).map(|m| m.as_str().trim()).unwrap_or_default();
            (name, address)
        }
        None => (None, input.trim()),
    };

    validate_address(address)?;

    Ok(ParsedAddress {
        address: address.to_string(),
        display_name,
    })
}

/// Checks that `address` is a syntactically valid bare email address.
///
/// # Errors
///
/// Returns [`Error::Validation`] naming the offending input.
pub fn validate_address(address: &str) -> Result<()> {
    if address.len() > 254 || !ADDR_SPEC.is_match(address) {
        return Err(Error::validation(format!(
            "'{}' is not a valid email address",
            address
        )));
    }
    Ok(())
}

//! # Shared Utility Functions
//!
//! ## Address Formatting
//!
//! - [`shorten_address`] - `first6…last4` display form used everywhere an address is shown
//! - [`format_address`] - configurable prefix/suffix variant
//!
//! ```rust
//! use shared::utils::shorten_address;
//!
//! assert_eq!(shorten_address("0x742d35Cc6634C0532925a3b8D4C9db96590c6C87"), "0x742d…6C87");
//! assert_eq!(shorten_address(""), "");
//! ```

/// Ellipsis placed between the kept prefix and suffix.
pub const ELLIPSIS: char = '…';

/// Format an address by keeping the first `prefix_len` and last `suffix_len` characters.
///
/// Addresses too short to shorten meaningfully are returned as-is. Works on
/// characters rather than bytes so arbitrary input never panics.
pub fn format_address(address: &str, prefix_len: usize, suffix_len: usize) -> String {
    let chars: Vec<char> = address.chars().collect();
    let len = chars.len();

    if len < prefix_len + suffix_len {
        return address.to_string();
    }

    let prefix: String = chars[..prefix_len].iter().collect();
    let suffix: String = chars[len - suffix_len..].iter().collect();

    format!("{prefix}{ELLIPSIS}{suffix}")
}

/// Shorten a hex address to `first6…last4`.
///
/// Empty input yields an empty string. Any input of 10 or more characters yields
/// `s[0..6] + "…" + s[len-4..]`.
pub fn shorten_address(address: &str) -> String {
    if address.is_empty() {
        return String::new();
    }
    format_address(address, 6, 4)
}

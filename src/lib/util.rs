//! General utilities for op-binding
//!
//! Device id generation, shorthand derivation and executable naming.

use rand::Rng;

/// Alphabet used by the tool for device ids
pub const BASE32_ALPHABET: &[u8; 32] = b"abcdefghijklmnopqrstuvwxyz234567";

/// Length of a device id
pub const DEVICE_ID_LENGTH: usize = 26;

/// Pattern extracting the subdomain from a sign-in address
const SHORTHAND_PATTERN: &str = r"^.+//([^.]+)\..+$";

/// Generate a random string of the given length from the base32 alphabet
pub fn random_base32(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| BASE32_ALPHABET[rng.gen_range(0..BASE32_ALPHABET.len())] as char)
        .collect()
}

/// Check whether every character of the string is from the base32 alphabet
pub fn is_base32(s: &str) -> bool {
    s.bytes().all(|b| BASE32_ALPHABET.contains(&b))
}

/// Check whether the string is a valid device id
pub fn is_valid_device_id(s: &str) -> bool {
    s.len() == DEVICE_ID_LENGTH && is_base32(s)
}

/// Derive the account shorthand from a sign-in address.
///
/// The subdomain is lowercased and hyphens become underscores, so
/// `https://Foo-Bar.1password.com/` yields `foo_bar`.
pub fn shorthand_from_address(sign_in_address: &str) -> Option<String> {
    let re = regex::Regex::new(SHORTHAND_PATTERN).ok()?;
    let caps = re.captures(sign_in_address)?;
    let subdomain = caps.get(1)?.as_str();
    Some(subdomain.replace('-', "_").to_lowercase())
}

/// File name of the `op` executable on this platform
pub fn executable_file_name() -> &'static str {
    if cfg!(windows) {
        "op.exe"
    } else {
        "op"
    }
}

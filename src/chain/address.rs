//! Account address validation for the Celestia bech32 namespace.
//!
//! Validation is structural: prefix, separator, data-part length, and the
//! bech32 character set. The checksum is not recomputed; the wallet rejects
//! a corrupted address at signing time, and structural checks are enough to
//! keep other chains' addresses (different prefix) out of the dialogue.

/// Characters permitted in a bech32 data part. Excludes `1`, `b`, `i`, `o`.
const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Celestia account prefix.
pub const ACCOUNT_PREFIX: &str = "celestia";

const MIN_DATA_LEN: usize = 38;
const MAX_DATA_LEN: usize = 58;

/// Whether `candidate` is shaped like an account address under `prefix`.
///
/// Pure function. Rejects addresses from other prefix families
/// (`cosmos1…`, `osmo1…`) even when they are otherwise well-formed.
pub fn is_valid_address(candidate: &str, prefix: &str) -> bool {
    let Some(data) = candidate
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('1'))
    else {
        return false;
    };

    if data.len() < MIN_DATA_LEN || data.len() > MAX_DATA_LEN {
        return false;
    }

    data.chars().all(|c| BECH32_CHARSET.contains(c))
}

/// [`is_valid_address`] specialized to the Celestia account prefix.
pub fn is_valid_celestia_address(candidate: &str) -> bool {
    is_valid_address(candidate, ACCOUNT_PREFIX)
}

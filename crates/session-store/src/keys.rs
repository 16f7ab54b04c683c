//! Storage key constants.

/// Storage keys used by the client.
pub struct StorageKeys;

impl StorageKeys {
    /// Opaque bearer token for the authenticated principal.
    pub const TOKEN: &'static str = "token";

    /// Serialized profile of the authenticated principal (JSON).
    pub const USER: &'static str = "user";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_keys_distinct() {
        assert!(!StorageKeys::TOKEN.is_empty());
        assert!(!StorageKeys::USER.is_empty());
        assert_ne!(StorageKeys::TOKEN, StorageKeys::USER);
    }
}

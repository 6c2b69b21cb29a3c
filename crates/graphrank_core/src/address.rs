use thiserror::Error;

/// Reserved separator used by [`encode`]. No address field may contain it.
pub const ADDRESS_DELIMITER: char = ':';

/// Structured identifier for a graph entity: the plugin that owns it, the
/// repository it belongs to, and a plugin-local id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityAddress {
    pub plugin: String,
    pub repo: String,
    pub local_id: String,
}

impl EntityAddress {
    pub fn new(
        plugin: impl Into<String>,
        repo: impl Into<String>,
        local_id: impl Into<String>,
    ) -> Self {
        Self {
            plugin: plugin.into(),
            repo: repo.into(),
            local_id: local_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("address field `{field}` contains reserved delimiter {ADDRESS_DELIMITER:?}: {value}")]
    DelimiterInField { field: &'static str, value: String },
    #[error("malformed encoded address (expected 3 {ADDRESS_DELIMITER:?}-separated parts, got {parts}): {input}")]
    MalformedEncoding { input: String, parts: usize },
}

/// Encodes an address as `plugin:repo:local_id`, suitable for use as a map key.
///
/// Fails if any field contains [`ADDRESS_DELIMITER`]; otherwise pure and total.
pub fn encode(address: &EntityAddress) -> Result<String, AddressError> {
    let fields = [
        ("plugin", &address.plugin),
        ("repo", &address.repo),
        ("local_id", &address.local_id),
    ];
    for (field, value) in fields {
        if value.contains(ADDRESS_DELIMITER) {
            return Err(AddressError::DelimiterInField {
                field,
                value: value.clone(),
            });
        }
    }
    Ok(format!(
        "{}{ADDRESS_DELIMITER}{}{ADDRESS_DELIMITER}{}",
        address.plugin, address.repo, address.local_id
    ))
}

/// Reverses [`encode`]. Fails unless the input splits into exactly three parts.
pub fn decode(encoded: &str) -> Result<EntityAddress, AddressError> {
    let parts: Vec<&str> = encoded.split(ADDRESS_DELIMITER).collect();
    match parts.as_slice() {
        [plugin, repo, local_id] => Ok(EntityAddress::new(*plugin, *repo, *local_id)),
        _ => Err(AddressError::MalformedEncoding {
            input: encoded.to_string(),
            parts: parts.len(),
        }),
    }
}

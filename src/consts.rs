use std::time::Duration;

/// Timestamp embedded in backup names: "20250115_093000".
/// Fixed width and zero padded, so lexical order equals chronological order.
pub(crate) const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Infix between the file stem and the timestamp of a backup
pub(crate) const BACKUP_INFIX: &str = "_backup_";

/// Per-request timeout for key checks
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Dotted path of the balance value when a provider does not set one
pub(crate) const DEFAULT_BALANCE_FIELD: &str = "data.balance";

/// Model written to the consumer settings when a provider does not set one
pub(crate) const DEFAULT_MODEL_NAME: &str = "default-model";

/// Auth type the consumer application expects for OpenAI-compatible keys
pub(crate) const SELECTED_AUTH_TYPE: &str = "openai";

/// Settings schema version written when the consumer file has none
pub(crate) const SETTINGS_VERSION: u64 = 2;

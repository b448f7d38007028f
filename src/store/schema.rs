use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Persisted frequency counts: `{"bi": {"<prev><next>": n}, "uni": {"<c>": n}}`.
/// Either table may be absent in older data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountsData {
    #[serde(default)]
    pub bi: BTreeMap<String, u64>,
    #[serde(default)]
    pub uni: BTreeMap<String, u64>,
}

//! Switch vendor command dialects.

use serde::{Deserialize, Serialize};

/// Target switch vendor. A closed set: "unknown" is never stored, the
/// classifier always resolves to one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Brand {
    /// Cisco IOS / Catalyst
    Cisco,
    /// Juniper JunOS
    Juniper,
    /// HPE / Aruba / ProCurve
    #[serde(rename = "HPE")]
    Hpe,
}

impl Brand {
    /// All brands in classification priority order.
    pub const ALL: [Brand; 3] = [Brand::Cisco, Brand::Juniper, Brand::Hpe];

    pub fn as_str(&self) -> &'static str {
        match self {
            Brand::Cisco => "Cisco",
            Brand::Juniper => "Juniper",
            Brand::Hpe => "HPE",
        }
    }
}

impl std::fmt::Display for Brand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

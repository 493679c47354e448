//! Ready-made requests offered to clients as one-click starting points.

use serde::Serialize;

/// A named, ready-to-send request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuickRequest {
    pub label: &'static str,
    pub query: &'static str,
}

pub const QUICK_REQUESTS: [QuickRequest; 5] = [
    QuickRequest {
        label: "10 VLANs",
        query: "create 10 vlans with 1 port each cisco",
    },
    QuickRequest {
        label: "Secure ports",
        query: "secure unused ports cisco",
    },
    QuickRequest {
        label: "Trunk",
        query: "configure trunk with all vlans cisco",
    },
    QuickRequest {
        label: "SSH",
        query: "enable ssh with authentication cisco",
    },
    QuickRequest {
        label: "LACP",
        query: "create a 2-port link aggregation cisco",
    },
];

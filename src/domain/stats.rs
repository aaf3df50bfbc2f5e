//! Dashboard counters and chart series.

use serde::Serialize;

use crate::normalize::Raw;

/// Headline counters shown on the dashboard and statistics pages.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_users: i64,
    pub active_users: i64,
    pub total_products: i64,
    pub total_suppliers: i64,
    pub pending_suppliers: i64,
    pub total_visitors: i64,
    pub pending_visitors: i64,
    pub pending_withdrawals: i64,
    pub open_tickets: i64,
    pub total_licenses: i64,
    pub used_licenses: i64,
}

impl DashboardStats {
    pub fn normalize(raw: Raw<'_>) -> Self {
        Self {
            total_users: raw.integer_or(&["total_users", "users.total", "users_count"], 0),
            active_users: raw.integer_or(&["active_users", "users.active"], 0),
            total_products: raw.integer_or(&["total_products", "products.total"], 0),
            total_suppliers: raw.integer_or(&["total_suppliers", "suppliers.total"], 0),
            pending_suppliers: raw.integer_or(&["pending_suppliers", "suppliers.pending"], 0),
            total_visitors: raw.integer_or(&["total_visitors", "visitors.total"], 0),
            pending_visitors: raw.integer_or(&["pending_visitors", "visitors.pending"], 0),
            pending_withdrawals: raw
                .integer_or(&["pending_withdrawals", "withdrawals.pending"], 0),
            open_tickets: raw.integer_or(&["open_tickets", "tickets.open"], 0),
            total_licenses: raw.integer_or(&["total_licenses", "licenses.total"], 0),
            used_licenses: raw.integer_or(&["used_licenses", "licenses.used"], 0),
        }
    }
}

/// One month of synthesized chart data.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ChartPoint {
    pub label: &'static str,
    pub users: u32,
    pub revenue: u64,
    pub products: u32,
}

/// Solar Hijri month names used as chart labels.
pub const MONTH_LABELS: [&str; 12] = [
    "فروردین",
    "اردیبهشت",
    "خرداد",
    "تیر",
    "مرداد",
    "شهریور",
    "مهر",
    "آبان",
    "آذر",
    "دی",
    "بهمن",
    "اسفند",
];

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_and_nested_counters_are_read() {
        let value = json!({
            "total_users": 120,
            "suppliers": {"total": 8, "pending": 3},
            "open_tickets": "4"
        });
        let stats = DashboardStats::normalize(Raw::new(&value));
        assert_eq!(stats.total_users, 120);
        assert_eq!(stats.total_suppliers, 8);
        assert_eq!(stats.pending_suppliers, 3);
        assert_eq!(stats.open_tickets, 4);
        assert_eq!(stats.used_licenses, 0);
    }
}

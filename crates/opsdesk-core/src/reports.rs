// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dashboard report types returned by the `/api/dashboard/*` endpoints.

use serde::{Deserialize, Serialize};

use crate::types::{TicketPriority, TicketStatus, UserRole};

/// Direction of a dashboard trend indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
}

/// A count delta with direction, shown on summary cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountTrend {
    pub count: u32,
    pub trend: TrendDirection,
}

/// An hours delta with direction, shown on the response-time card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoursTrend {
    pub hours: f64,
    pub trend: TrendDirection,
}

/// Headline dashboard numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_tickets: usize,
    pub open_tickets: usize,
    pub closed_today: usize,
    /// Mean hours from creation to last update over non-open tickets,
    /// rounded to one decimal.
    pub average_response_time: f64,
    pub total_trend: CountTrend,
    pub open_trend: CountTrend,
    pub closed_trend: CountTrend,
    pub response_trend: HoursTrend,
}

/// Per-agent workload and outcome summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPerformance {
    pub user_id: i64,
    pub user_name: String,
    pub user_role: UserRole,
    pub avatar_url: Option<String>,
    pub assigned: usize,
    pub resolved: usize,
    pub average_response_time: f64,
    pub satisfaction: u32,
}

/// Ticket count and share for one status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusBreakdown {
    pub status: TicketStatus,
    pub count: usize,
    pub percentage: u32,
}

/// Ticket count for one priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityDistribution {
    pub priority: TicketPriority,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_serialize_with_camel_case_fields() {
        let metrics = DashboardMetrics {
            total_tickets: 23,
            open_tickets: 6,
            closed_today: 2,
            average_response_time: 4.5,
            total_trend: CountTrend { count: 12, trend: TrendDirection::Up },
            open_trend: CountTrend { count: 5, trend: TrendDirection::Down },
            closed_trend: CountTrend { count: 3, trend: TrendDirection::Up },
            response_trend: HoursTrend { hours: 0.5, trend: TrendDirection::Down },
        };
        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["totalTickets"], 23);
        assert_eq!(json["averageResponseTime"], 4.5);
        assert_eq!(json["openTrend"]["trend"], "down");
    }

    #[test]
    fn breakdown_serializes_status_as_snake_case() {
        let row = StatusBreakdown {
            status: TicketStatus::InProgress,
            count: 4,
            percentage: 17,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["status"], "in_progress");
        assert_eq!(json["percentage"], 17);
    }
}

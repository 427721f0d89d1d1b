use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Whether an item is visible in the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Active,
    Inactive,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Active => "active",
            ItemStatus::Inactive => "inactive",
        }
    }

    /// Entities persist status as text; unknown text is an inclusion violation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(ItemStatus::Active),
            "inactive" => Some(ItemStatus::Inactive),
            _ => None,
        }
    }
}

/// Order lifecycle. `Ordered` is the open cart; the rest are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Ordered,
    Paid,
    Cancelled,
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Ordered => "ordered",
            OrderStatus::Paid => "paid",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ordered" => Some(OrderStatus::Ordered),
            "paid" => Some(OrderStatus::Paid),
            "cancelled" => Some(OrderStatus::Cancelled),
            "completed" => Some(OrderStatus::Completed),
            _ => None,
        }
    }

    /// Terminal orders are immutable: no line edits, no further transitions.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Ordered)
    }

    /// The only legal transition is out of `Ordered`.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        *self == OrderStatus::Ordered && next.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_statuses_only() {
        assert_eq!(OrderStatus::parse("ordered"), Some(OrderStatus::Ordered));
        assert_eq!(OrderStatus::parse("paid"), Some(OrderStatus::Paid));
        assert_eq!(OrderStatus::parse("shipped"), None);
        assert_eq!(ItemStatus::parse("active"), Some(ItemStatus::Active));
        assert_eq!(ItemStatus::parse("ACTIVE"), None);
    }

    #[test]
    fn only_ordered_may_transition() {
        assert!(OrderStatus::Ordered.can_transition_to(OrderStatus::Paid));
        assert!(OrderStatus::Ordered.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Paid.can_transition_to(OrderStatus::Completed));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Ordered));
        assert!(!OrderStatus::Ordered.can_transition_to(OrderStatus::Ordered));
    }

    #[test]
    fn terminal_states() {
        assert!(!OrderStatus::Ordered.is_terminal());
        assert!(OrderStatus::Paid.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Completed.is_terminal());
    }
}

//! Point-of-sale dashboard channel.
//!
//! Watches `pos_orders` and `pos_order_items`. Both collections invalidate
//! the kitchen and waiter views, but only order-level changes notify: item
//! lines churn far too often to surface individually.

use lodgeboard_realtime::channels::{ChannelConfig, Discriminant, ScopeFilter};
use lodgeboard_realtime::events::{ChangeEvent, Operation, SnapshotFields};
use lodgeboard_realtime::invalidation::RegionKey;
use lodgeboard_realtime::notifications::{NotableTransition, Severity};

pub const POS_ORDERS: RegionKey = RegionKey::new("pos-orders");
pub const KITCHEN_ORDERS: RegionKey = RegionKey::new("kitchen-orders");
pub const WAITER_ORDERS: RegionKey = RegionKey::new("waiter-orders");

const REGIONS: &[RegionKey] = &[POS_ORDERS, KITCHEN_ORDERS, WAITER_ORDERS];

pub fn channels() -> Vec<ChannelConfig> {
    vec![
        ChannelConfig {
            entity: "pos_orders",
            filter: ScopeFilter::Property,
            discriminant: Some(Discriminant::Text("status")),
            regions: REGIONS,
            build: order_message,
        },
        ChannelConfig {
            entity: "pos_order_items",
            filter: ScopeFilter::Property,
            discriminant: None,
            regions: REGIONS,
            build: silent,
        },
    ]
}

fn silent(_event: &ChangeEvent) -> Option<NotableTransition> {
    None
}

fn order_message(event: &ChangeEvent) -> Option<NotableTransition> {
    match event.operation {
        Operation::Created => {
            let row = event.after.as_ref()?;
            let number = row.str_field("order_number").unwrap_or("(unnumbered)");
            let body = match row.display_field("table_number") {
                Some(table) => format!("Order {} opened for table {}", number, table),
                None => format!("Order {} opened", number),
            };
            Some(NotableTransition::info("New order", body))
        }
        Operation::Updated => {
            let row = event.after.as_ref()?;
            let number = row.str_field("order_number").unwrap_or("(unnumbered)");
            let (label, severity) = match row.str_field("status")? {
                "preparing" => ("is being prepared", Severity::Info),
                "ready" => ("is ready to serve", Severity::Success),
                "served" => ("was served", Severity::Info),
                "paid" => ("was paid", Severity::Success),
                "cancelled" => ("was cancelled", Severity::Warning),
                _ => return None,
            };
            Some(NotableTransition::new(
                "Order update",
                format!("Order {} {}", number, label),
                severity,
            ))
        }
        Operation::Deleted => {
            let row = event.before.as_ref()?;
            let number = row.str_field("order_number").unwrap_or("(unnumbered)");
            Some(NotableTransition::info(
                "Order removed",
                format!("Order {} was removed", number),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::support::{created, updated};
    use lodgeboard_realtime::classifier::classify;
    use serde_json::json;

    #[test]
    fn test_new_order_references_number_and_table() {
        let channel = channels().remove(0);
        let event = created(
            "pos_orders",
            json!({"order_number": "ORD-042", "table_number": "7", "status": "open"}),
        );
        let transition = classify(&channel, &event).unwrap();
        assert!(transition.body.contains("ORD-042"));
        assert!(transition.body.contains("7"));
    }

    #[test]
    fn test_payment_is_a_success_transition() {
        let channel = channels().remove(0);
        let event = updated(
            "pos_orders",
            json!({"order_number": "ORD-042", "status": "served"}),
            json!({"order_number": "ORD-042", "status": "paid"}),
        );
        assert_eq!(
            classify(&channel, &event).unwrap().severity,
            Severity::Success
        );
    }

    #[test]
    fn test_order_items_never_notify() {
        let channel = channels().remove(1);
        let event = created("pos_order_items", json!({"name": "Espresso", "qty": 2}));
        assert!(classify(&channel, &event).is_none());
    }
}

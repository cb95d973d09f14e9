//! Folios dashboard channel.
//!
//! Watches `folios`, `payments`, and `folio_items`. Payments announce on
//! creation; folio line items only invalidate, matching the billing screen's
//! refresh behavior.

use lodgeboard_realtime::channels::{ChannelConfig, Discriminant, ScopeFilter};
use lodgeboard_realtime::events::{ChangeEvent, Operation, SnapshotFields};
use lodgeboard_realtime::invalidation::RegionKey;
use lodgeboard_realtime::notifications::{NotableTransition, Severity};

pub const FOLIOS: RegionKey = RegionKey::new("folios");
pub const FOLIO_STATS: RegionKey = RegionKey::new("folio-stats");
pub const PAYMENTS: RegionKey = RegionKey::new("payments");

const FOLIO_REGIONS: &[RegionKey] = &[FOLIOS, FOLIO_STATS];
const PAYMENT_REGIONS: &[RegionKey] = &[FOLIOS, FOLIO_STATS, PAYMENTS];

pub fn channels() -> Vec<ChannelConfig> {
    vec![
        ChannelConfig {
            entity: "folios",
            filter: ScopeFilter::Property,
            discriminant: Some(Discriminant::Text("status")),
            regions: FOLIO_REGIONS,
            build: folio_message,
        },
        ChannelConfig {
            entity: "payments",
            filter: ScopeFilter::Property,
            discriminant: None,
            regions: PAYMENT_REGIONS,
            build: payment_message,
        },
        ChannelConfig {
            entity: "folio_items",
            filter: ScopeFilter::Property,
            discriminant: None,
            regions: FOLIO_REGIONS,
            build: silent,
        },
    ]
}

fn silent(_event: &ChangeEvent) -> Option<NotableTransition> {
    None
}

fn folio_message(event: &ChangeEvent) -> Option<NotableTransition> {
    match event.operation {
        Operation::Created => {
            let row = event.after.as_ref()?;
            let number = row.str_field("folio_number").unwrap_or("(unnumbered)");
            Some(NotableTransition::info(
                "Folio opened",
                format!("Folio {} was opened", number),
            ))
        }
        Operation::Updated => {
            let row = event.after.as_ref()?;
            let number = row.str_field("folio_number").unwrap_or("(unnumbered)");
            let (label, severity) = match row.str_field("status")? {
                "settled" => ("was settled", Severity::Success),
                "closed" => ("was closed", Severity::Success),
                "voided" => ("was voided", Severity::Warning),
                _ => return None,
            };
            Some(NotableTransition::new(
                "Folio update",
                format!("Folio {} {}", number, label),
                severity,
            ))
        }
        Operation::Deleted => {
            let row = event.before.as_ref()?;
            let number = row.str_field("folio_number").unwrap_or("(unnumbered)");
            Some(NotableTransition::info(
                "Folio removed",
                format!("Folio {} was removed", number),
            ))
        }
    }
}

fn payment_message(event: &ChangeEvent) -> Option<NotableTransition> {
    match event.operation {
        Operation::Created => {
            let row = event.after.as_ref()?;
            let body = match (row.display_field("amount"), row.str_field("currency")) {
                (Some(amount), Some(currency)) => {
                    format!("Payment of {} {} was recorded", amount, currency)
                }
                (Some(amount), None) => format!("Payment of {} was recorded", amount),
                _ => "A payment was recorded".to_string(),
            };
            Some(NotableTransition::success("Payment received", body))
        }
        // Adjustments edit rows in place; only creation and reversal surface.
        Operation::Updated => None,
        Operation::Deleted => {
            let row = event.before.as_ref()?;
            let body = match row.display_field("amount") {
                Some(amount) => format!("Payment of {} was reversed", amount),
                None => "A payment was reversed".to_string(),
            };
            Some(NotableTransition::warning("Payment reversed", body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::support::{created, deleted, updated};
    use lodgeboard_realtime::classifier::classify;
    use serde_json::json;

    #[test]
    fn test_settled_folio_is_a_success_transition() {
        let channel = channels().remove(0);
        let event = updated(
            "folios",
            json!({"folio_number": "F-1009", "status": "open"}),
            json!({"folio_number": "F-1009", "status": "settled"}),
        );
        let transition = classify(&channel, &event).unwrap();
        assert_eq!(transition.severity, Severity::Success);
        assert!(transition.body.contains("F-1009"));
    }

    #[test]
    fn test_payment_creation_announces_amount() {
        let channel = channels().remove(1);
        let event = created("payments", json!({"amount": 180.50, "currency": "EUR"}));
        let transition = classify(&channel, &event).unwrap();
        assert_eq!(transition.severity, Severity::Success);
        assert!(transition.body.contains("180.5"));
        assert!(transition.body.contains("EUR"));
    }

    #[test]
    fn test_payment_reversal_is_a_warning() {
        let channel = channels().remove(1);
        let event = deleted("payments", json!({"amount": 180.50}));
        assert_eq!(
            classify(&channel, &event).unwrap().severity,
            Severity::Warning
        );
    }

    #[test]
    fn test_folio_items_never_notify() {
        let channel = channels().remove(2);
        let event = created("folio_items", json!({"description": "Minibar", "amount": 12}));
        assert!(classify(&channel, &event).is_none());
    }
}

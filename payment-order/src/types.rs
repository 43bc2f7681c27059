//! Payment orders and their confirmation slots

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A person authorized to confirm payment orders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmer {
    /// Record ID
    pub id: i64,

    /// Display name
    pub name: String,
}

impl Confirmer {
    /// Create a confirmer
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Opaque confirmation token referencing its confirmer.
///
/// Tokens are minted per confirmation request; the workflow only reads
/// `token.confirmer`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmationToken {
    /// Token ID
    pub id: i64,

    /// The confirmer the token was issued to
    pub confirmer: Confirmer,
}

impl ConfirmationToken {
    /// Create a token for a confirmer
    pub fn new(id: i64, confirmer: Confirmer) -> Self {
        Self { id, confirmer }
    }
}

/// One of the two confirmation slots of a payment order.
///
/// A confirmed slot is terminal; the stored name survives deletion of the
/// confirmer record so the no-repeat rule keeps working.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Confirmation {
    /// Whether the slot is filled
    pub confirmed: bool,

    /// When the slot was filled
    pub timestamp: Option<DateTime<Utc>>,

    /// Display name of the confirmer at confirmation time
    pub confirmer_name: Option<String>,

    /// Confirmer record ID; may no longer resolve if the record was deleted
    pub confirmer_id: Option<i64>,

    /// Token the confirmation came in with
    pub token_id: Option<i64>,

    /// Free-text remark from the confirmer
    pub remark: Option<String>,
}

impl Confirmation {
    /// Whether the slot is filled
    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub(crate) fn record(
        &mut self,
        timestamp: DateTime<Utc>,
        confirmer: &Confirmer,
        token_id: i64,
        remark: Option<String>,
    ) {
        self.confirmed = true;
        self.timestamp = Some(timestamp);
        self.confirmer_name = Some(confirmer.name.clone());
        self.confirmer_id = Some(confirmer.id);
        self.token_id = Some(token_id);
        self.remark = remark;
    }
}

/// A payment order awaiting its two confirmations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOrder {
    /// Order ID
    pub id: i64,

    /// Project the payment belongs to
    pub project_name: String,

    /// Amount in cents
    pub amount_cents: i64,

    /// First confirmation slot
    pub first_confirmation: Confirmation,

    /// Second confirmation slot
    pub second_confirmation: Confirmation,
}

impl PaymentOrder {
    /// Create an unconfirmed order
    pub fn new(id: i64, project_name: impl Into<String>, amount_cents: i64) -> Self {
        Self {
            id,
            project_name: project_name.into(),
            amount_cents,
            first_confirmation: Confirmation::default(),
            second_confirmation: Confirmation::default(),
        }
    }

    /// Whether both slots are filled
    pub fn is_confirmed(&self) -> bool {
        self.first_confirmation.is_confirmed() && self.second_confirmation.is_confirmed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_order_is_unconfirmed() {
        let order = PaymentOrder::new(1, "Sommerfest", 12_000);
        assert!(!order.is_confirmed());
        assert!(!order.first_confirmation.is_confirmed());
    }

    #[test]
    fn test_order_confirmed_only_with_both_slots() {
        let mut order = PaymentOrder::new(1, "Sommerfest", 12_000);
        let alice = Confirmer::new(1, "Alice");

        order
            .first_confirmation
            .record(Utc::now(), &alice, 10, None);
        assert!(!order.is_confirmed());

        let bob = Confirmer::new(2, "Bob");
        order
            .second_confirmation
            .record(Utc::now(), &bob, 11, Some("checked receipts".to_string()));
        assert!(order.is_confirmed());
        assert_eq!(
            order.second_confirmation.remark.as_deref(),
            Some("checked receipts")
        );
    }
}

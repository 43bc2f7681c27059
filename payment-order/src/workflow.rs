//! Dual-confirmation workflow
//!
//! Slots fill in order, first then second; a filled pair is terminal.
//! One person may fill at most one slot per order. Identity is the stored
//! confirmer ID; when that ID no longer resolves (record deleted since),
//! the stored display name steps in, so a deleted account reappearing
//! under the same name still cannot confirm twice.
//!
//! The workflow mutates the order in place and never persists; the caller
//! commits afterwards.

use crate::directory::ConfirmerDirectory;
use crate::error::{Error, Result};
use crate::types::{Confirmation, ConfirmationToken, Confirmer, PaymentOrder};
use bursary_core::Clock;
use std::sync::Arc;

/// Confirmation workflow helper
pub struct ConfirmationWorkflow {
    directory: Arc<dyn ConfirmerDirectory>,
    clock: Arc<dyn Clock>,
}

impl ConfirmationWorkflow {
    /// Create a workflow over the given boundaries
    pub fn new(directory: Arc<dyn ConfirmerDirectory>, clock: Arc<dyn Clock>) -> Self {
        Self { directory, clock }
    }

    /// Whether this confirmer already filled one of the order's slots
    pub fn has_already_confirmed(&self, confirmer: &Confirmer, order: &PaymentOrder) -> bool {
        self.slot_matches(&order.first_confirmation, confirmer)
            || self.slot_matches(&order.second_confirmation, confirmer)
    }

    fn slot_matches(&self, slot: &Confirmation, confirmer: &Confirmer) -> bool {
        if !slot.is_confirmed() {
            return false;
        }
        match slot.confirmer_id {
            Some(id) if id == confirmer.id => true,
            Some(id) => {
                self.directory.find(id).is_none()
                    && slot.confirmer_name.as_deref() == Some(confirmer.name.as_str())
            }
            // No ID was stored at all; the name is all we have
            None => slot.confirmer_name.as_deref() == Some(confirmer.name.as_str()),
        }
    }

    /// Fill the next free slot with this token's confirmer.
    ///
    /// Fails with [`Error::AlreadyConfirmed`] when both slots are filled
    /// and [`Error::AlreadyConfirmedByConfirmer`] when the confirmer
    /// already filled one.
    pub fn confirm(
        &self,
        order: &mut PaymentOrder,
        token: &ConfirmationToken,
        remark: Option<String>,
    ) -> Result<()> {
        if order.is_confirmed() {
            return Err(Error::AlreadyConfirmed);
        }

        let confirmer = &token.confirmer;
        if self.has_already_confirmed(confirmer, order) {
            return Err(Error::AlreadyConfirmedByConfirmer(confirmer.name.clone()));
        }

        let timestamp = self.clock.now();
        let slot = if !order.first_confirmation.is_confirmed() {
            &mut order.first_confirmation
        } else {
            &mut order.second_confirmation
        };
        slot.record(timestamp, confirmer, token.id, remark);

        tracing::debug!(
            order = order.id,
            confirmer = %confirmer.name,
            confirmed = order.is_confirmed(),
            "recorded confirmation"
        );

        Ok(())
    }
}

impl std::fmt::Debug for ConfirmationWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfirmationWorkflow").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::MemoryConfirmerDirectory;
    use bursary_core::FixedClock;
    use chrono::{TimeZone, Utc};

    struct Fixture {
        directory: Arc<MemoryConfirmerDirectory>,
        workflow: ConfirmationWorkflow,
    }

    fn fixture() -> Fixture {
        let directory = Arc::new(MemoryConfirmerDirectory::new());
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2021, 6, 15, 12, 0, 0).unwrap(),
        ));
        let workflow = ConfirmationWorkflow::new(
            Arc::clone(&directory) as Arc<dyn ConfirmerDirectory>,
            clock,
        );
        Fixture {
            directory,
            workflow,
        }
    }

    fn token_for(f: &Fixture, token_id: i64, confirmer_id: i64, name: &str) -> ConfirmationToken {
        let confirmer = Confirmer::new(confirmer_id, name);
        f.directory.insert(confirmer.clone());
        ConfirmationToken::new(token_id, confirmer)
    }

    #[test]
    fn test_two_confirmers_complete_the_order() {
        let f = fixture();
        let mut order = PaymentOrder::new(1, "Sommerfest", 12_000);

        f.workflow
            .confirm(&mut order, &token_for(&f, 10, 1, "Alice"), None)
            .unwrap();
        assert!(order.first_confirmation.is_confirmed());
        assert!(!order.is_confirmed());

        f.workflow
            .confirm(
                &mut order,
                &token_for(&f, 11, 2, "Bob"),
                Some("receipts checked".to_string()),
            )
            .unwrap();
        assert!(order.is_confirmed());
        assert_eq!(order.second_confirmation.confirmer_id, Some(2));
        assert_eq!(order.second_confirmation.token_id, Some(11));
        assert_eq!(
            order.second_confirmation.remark.as_deref(),
            Some("receipts checked")
        );
    }

    #[test]
    fn test_fully_confirmed_order_is_terminal() {
        let f = fixture();
        let mut order = PaymentOrder::new(1, "Sommerfest", 12_000);

        f.workflow
            .confirm(&mut order, &token_for(&f, 10, 1, "Alice"), None)
            .unwrap();
        f.workflow
            .confirm(&mut order, &token_for(&f, 11, 2, "Bob"), None)
            .unwrap();

        let err = f
            .workflow
            .confirm(&mut order, &token_for(&f, 12, 3, "Carol"), None)
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyConfirmed));
    }

    #[test]
    fn test_same_confirmer_cannot_fill_both_slots() {
        let f = fixture();
        let mut order = PaymentOrder::new(1, "Sommerfest", 12_000);
        let token = token_for(&f, 10, 1, "Alice");

        f.workflow.confirm(&mut order, &token, None).unwrap();
        let err = f.workflow.confirm(&mut order, &token, None).unwrap_err();
        assert!(matches!(err, Error::AlreadyConfirmedByConfirmer(name) if name == "Alice"));
        assert!(!order.is_confirmed());
    }

    #[test]
    fn test_deleted_confirmer_blocks_same_display_name() {
        let f = fixture();
        let mut order = PaymentOrder::new(1, "Sommerfest", 12_000);

        f.workflow
            .confirm(&mut order, &token_for(&f, 10, 1, "Alice"), None)
            .unwrap();

        // Record 1 is deleted; a new account reuses the display name
        f.directory.remove(1);
        let err = f
            .workflow
            .confirm(&mut order, &token_for(&f, 11, 99, "Alice"), None)
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyConfirmedByConfirmer(_)));
    }

    #[test]
    fn test_deleted_confirmer_does_not_block_other_names() {
        let f = fixture();
        let mut order = PaymentOrder::new(1, "Sommerfest", 12_000);

        f.workflow
            .confirm(&mut order, &token_for(&f, 10, 1, "Alice"), None)
            .unwrap();
        f.directory.remove(1);

        f.workflow
            .confirm(&mut order, &token_for(&f, 11, 2, "Bob"), None)
            .unwrap();
        assert!(order.is_confirmed());
    }

    #[test]
    fn test_live_confirmer_with_same_name_is_a_different_person() {
        let f = fixture();
        let mut order = PaymentOrder::new(1, "Sommerfest", 12_000);

        // Two distinct live records happen to share a display name
        f.workflow
            .confirm(&mut order, &token_for(&f, 10, 1, "Alice"), None)
            .unwrap();
        f.workflow
            .confirm(&mut order, &token_for(&f, 11, 2, "Alice"), None)
            .unwrap();
        assert!(order.is_confirmed());
    }

    #[test]
    fn test_confirmation_records_clock_timestamp() {
        let f = fixture();
        let mut order = PaymentOrder::new(1, "Sommerfest", 12_000);

        f.workflow
            .confirm(&mut order, &token_for(&f, 10, 1, "Alice"), None)
            .unwrap();
        assert_eq!(
            order.first_confirmation.timestamp,
            Some(Utc.with_ymd_and_hms(2021, 6, 15, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_has_already_confirmed_ignores_empty_slots() {
        let f = fixture();
        let order = PaymentOrder::new(1, "Sommerfest", 12_000);
        let alice = Confirmer::new(1, "Alice");
        assert!(!f.workflow.has_already_confirmed(&alice, &order));
    }
}

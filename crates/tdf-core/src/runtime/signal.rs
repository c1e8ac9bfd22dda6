// crates/tdf-core/src/runtime/signal.rs
// ============================================================================
// Module: TDF Signal-Inclusion Evaluator
// Description: Checks data-item presence on captured signaling messages.
// Purpose: Evaluate DLEP tests against documents in the signals collection.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The captured message for the test's signal is looked up by name. The first
//! directive is checked against the message's data items; when it holds and a
//! second directive exists, that one is checked against the sub data items of
//! the matched data item. If the data item was required to be absent there is
//! nothing to nest under, so a second directive fails the test.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::document::SignalDocumentLayout;
use crate::core::identifiers::CollectionName;
use crate::core::record::SignalInclusionTest;
use crate::interfaces::DocumentStore;
use crate::interfaces::SharedDocumentStore;
use crate::runtime::evaluator::Evaluation;
use crate::runtime::evaluator::ExecutionError;

// ============================================================================
// SECTION: Evaluator
// ============================================================================

/// Evaluates signal-inclusion tests against captured messages.
#[derive(Clone)]
pub struct SignalEvaluator {
    /// Store holding captured messages.
    store: SharedDocumentStore,
    /// Collection holding captured messages.
    signals: CollectionName,
    /// Field names used to navigate a message.
    layout: SignalDocumentLayout,
}

impl SignalEvaluator {
    /// Creates an evaluator over a signals collection.
    #[must_use]
    pub const fn new(
        store: SharedDocumentStore,
        signals: CollectionName,
        layout: SignalDocumentLayout,
    ) -> Self {
        Self {
            store,
            signals,
            layout,
        }
    }

    /// Evaluates one test.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::Store`] when the message lookup fails.
    pub fn evaluate(&self, test: &SignalInclusionTest) -> Result<Evaluation, ExecutionError> {
        let (Some(signal), Some(inclusion), Some(data_item)) =
            (&test.signal, test.signal_inclusion, &test.data_item)
        else {
            return Ok(Evaluation::failed());
        };
        let Some(message) = self.store.find_document(&self.signals, &self.layout.name_field, signal)?
        else {
            return Ok(Evaluation::failed());
        };

        let entry = self.layout.find_entry(&message, &self.layout.items_field, data_item);
        if !inclusion.is_satisfied_by(entry.is_some()) {
            return Ok(Evaluation::failed());
        }

        let Some(nested) = test.item_inclusion else {
            return Ok(Evaluation::passed());
        };
        let (Some(entry), Some(sub_item)) = (entry, &test.sub_item) else {
            return Ok(Evaluation::failed());
        };
        let has_sub_item =
            self.layout.find_entry(entry, &self.layout.sub_items_field, sub_item).is_some();
        Ok(Evaluation::from_passed(nested.is_satisfied_by(has_sub_item)))
    }
}

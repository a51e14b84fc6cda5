//! Desired-versus-observed comparison.
//!
//! Only labels decide whether an update is needed. Firewall rules, server
//! attachments and the placement group type are not diffed; an update
//! re-sends the desired labels and nothing else.

use crate::resource::Labels;

/// Unset desired labels match an empty observed set; set labels must match exactly.
pub fn labels_up_to_date(desired: Option<&Labels>, observed: &Labels) -> bool {
    match desired {
        None => observed.is_empty(),
        Some(desired) => desired == observed,
    }
}

/// Placement group label check, written as its explicit four-case table.
///
/// Must agree with [`labels_up_to_date`] on every input.
pub fn placement_group_labels_up_to_date(desired: Option<&Labels>, observed: &Labels) -> bool {
    match (desired, observed.is_empty()) {
        (None, true) => true,
        (None, false) => false,
        (Some(desired), _) if desired == observed => true,
        (Some(_), _) => false,
    }
}

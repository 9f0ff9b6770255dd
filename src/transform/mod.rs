//! Batch operations over decoded contact data.
//!
//! Everything in this module is a pure function: no I/O, no hidden state.
//! The workflows read files through [`crate::codec`], call into here, and
//! write the results back.
//!
//! | Operation | Function(s) |
//! |-----------|-------------|
//! | add | [`add_numbers`], [`add_contacts`] |
//! | delete | [`delete_numbers`], [`crate::codec::vcard::remove_numbers`] |
//! | merge | [`merge_lines`], [`merge_vcards`], [`merge_tables`] |
//! | split | [`partition_sizes`], [`split_items`] |
//! | dedupe | [`dedupe_numbers`], [`dedupe_cards`] |
//! | rename-contact | [`replace_contact_name`] |
//! | rename-file | [`crate::naming::auto_file_names`], [`crate::naming::UniqueNames`] |
//! | count | [`CountReport`] |
//! | to vCard | [`plan_vcf`] |

mod combine;
mod convert;
mod count;
mod dedupe;
mod edit;
mod rename;

pub use combine::{SplitMode, merge_lines, merge_tables, merge_vcards, partition_sizes, split_items};
pub use convert::{SplitChoice, VcfOutput, VcfPlan, plan_vcf};
pub use count::CountReport;
pub use dedupe::{DedupeOutcome, dedupe_by, dedupe_cards, dedupe_numbers};
pub use edit::{add_contacts, add_numbers, delete_numbers};
pub use rename::{contains_name, replace_contact_name};

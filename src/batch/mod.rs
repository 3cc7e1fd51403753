//! Generic batch mutation engine.
//!
//! Every bulk endpoint (lesson create/update/delete, song import/delete,
//! assignment upserts) runs through this one engine, parameterized by an
//! entity-specific strategy. Items are validated, resolved against existing
//! state, and applied independently: a failing item is recorded and the
//! loop moves on. Results come back index-correlated with the submitted
//! list.

pub mod engine;
pub mod outcome;
pub mod policy;
pub mod report;

pub use engine::{
    error_message, run, run_delete, run_validate_only, BatchDeleteStrategy, BatchError,
    BatchOptions, BatchStrategy,
};
pub use outcome::{
    BatchReport, BatchSummary, FieldError, ItemOutcome, ItemStatus, ValidationFailure,
    ValidationOutcome, ValidationReport, ValidationSummary,
};
pub use policy::{LookupResult, ResolvedAction};
pub use report::{BatchResponse, DeletedId, ItemErrorEntry, ValidationResponse};

//! outlier-engine: builds ready-to-execute outlier detection statements.
//!
//! Flow: build an [`OutlierDetectionRequest`], hand it to the
//! [`StatementDispatcher`], bind the returned [`GeneratedStatement`]
//! parameters and pass the text to an external executor. Nothing here
//! touches a database.

pub mod dispatcher;
pub mod orgunit;
pub mod processors;
pub mod request;
pub mod statement;

pub use dispatcher::{ProcessorKind, StatementDispatcher};
pub use orgunit::{InMemoryHierarchy, OrgUnitPathPredicate, PathPredicateBuilder};
pub use processors::StatementProcessor;
pub use request::{DataItem, OrgUnit, OutlierDetectionRequest, OutlierRequestBuilder};
pub use statement::{GeneratedStatement, ParamValue};

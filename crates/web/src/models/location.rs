//! Location domain model.

use quill_core::types::LocationId;
use serde::Serialize;

use super::post::Publication;

/// A place a post can be tagged with.
#[derive(Debug, Clone, Serialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub publication: Publication,
}

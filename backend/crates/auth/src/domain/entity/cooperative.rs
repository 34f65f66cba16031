//! Cooperative Entity
//!
//! Reference data. Managed outside this service; read-only here.

use kernel::id::CooperativeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cooperative {
    pub cooperative_id: CooperativeId,
    pub name: String,
    pub location: String,
}

impl Cooperative {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            cooperative_id: CooperativeId::new(),
            name: name.into(),
            location: location.into(),
        }
    }
}

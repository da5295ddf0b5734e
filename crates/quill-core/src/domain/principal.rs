use uuid::Uuid;

/// The authenticated actor behind a request.
///
/// Only the identifier takes part in access decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
}

impl Principal {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

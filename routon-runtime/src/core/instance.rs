#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instance {
    /// Instance unique identifier.
    id: uuid::Uuid,
    /// Machine model.
    model: String,
    /// Machine version.
    version: (u8, u8, u8),
}

impl Instance {
    /// Construct new instance.
    pub fn new(id: uuid::Uuid, model: impl ToString, version: (u8, u8, u8)) -> Self {
        Self {
            id,
            model: model.to_string(),
            version,
        }
    }

    /// Retrieve the instance unique identifier.
    #[inline]
    pub fn id(&self) -> &uuid::Uuid {
        &self.id
    }

    /// Retrieve the machine model.
    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Retrieve the instance version.
    #[inline]
    pub fn version(&self) -> (u8, u8, u8) {
        self.version
    }
}

impl std::fmt::Display for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Instance ID: {}; Model: {}; Version: {}.{}.{}",
            self.id, self.model, self.version.0, self.version.1, self.version.2
        )
    }
}

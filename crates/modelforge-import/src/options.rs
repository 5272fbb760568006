/// Options that control how imports behave.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Keep relations whose source and target are the same entity.
    pub allow_self_reference: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            allow_self_reference: true,
        }
    }
}

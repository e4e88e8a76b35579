//! Registration of `#[injectable]` types
//!
//! The attribute submits a [`SingletonEntry`] through `inventory`; booting the
//! container walks the collected entries once.

pub struct SingletonEntry {
    pub register: fn(),
    /// Type name, for logs
    pub name: &'static str,
}

inventory::collect!(SingletonEntry);

pub fn bootstrap() {
    for entry in inventory::iter::<SingletonEntry> {
        tracing::debug!(service = entry.name, "registering injectable");
        (entry.register)();
    }
}

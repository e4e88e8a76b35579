//! Per-thread container overrides for tests
//!
//! ```rust,ignore
//! let _guard = TestContainer::fake();
//! TestContainer::bind::<dyn Mailer>(Arc::new(RecordingMailer::default()));
//! ```

use super::{Container, TEST_CONTAINER};
use std::any::Any;
use std::sync::Arc;

pub struct TestContainer;

impl TestContainer {
    /// Install an empty override container for the current thread
    ///
    /// Overrides are removed when the guard drops.
    pub fn fake() -> TestContainerGuard {
        TEST_CONTAINER.with(|c| *c.borrow_mut() = Some(Container::new()));
        TestContainerGuard { _private: () }
    }

    pub fn singleton<T: Any + Send + Sync + 'static>(instance: T) {
        TEST_CONTAINER.with(|c| {
            c.borrow_mut()
                .get_or_insert_with(Container::new)
                .singleton(instance)
        });
    }

    pub fn bind<T: ?Sized + Send + Sync + 'static>(instance: Arc<T>) {
        TEST_CONTAINER.with(|c| c.borrow_mut().get_or_insert_with(Container::new).bind(instance));
    }
}

pub struct TestContainerGuard {
    _private: (),
}

impl Drop for TestContainerGuard {
    fn drop(&mut self) {
        TEST_CONTAINER.with(|c| *c.borrow_mut() = None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::App;

    #[test]
    fn test_fake_overrides_and_clears() {
        {
            let _guard = TestContainer::fake();
            TestContainer::singleton(String::from("faked"));
            assert_eq!(App::get::<String>(), Some("faked".to_string()));
        }
        assert!(!App::has::<String>());
    }
}

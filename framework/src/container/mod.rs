//! Service container
//!
//! Concrete singletons are stored by type, trait objects under `Arc<dyn Trait>`.
//! Tests swap bindings per thread through [`testing::TestContainer`].
//!
//! ```rust,ignore
//! use kit::{bind, App};
//!
//! bind!(dyn Mailer, LogMailer);
//! let mailer = App::resolve_make::<dyn Mailer>()?;
//! ```

pub mod provider;
pub mod testing;

use crate::error::FrameworkError;
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

static APP_CONTAINER: OnceLock<RwLock<Container>> = OnceLock::new();

thread_local! {
    pub(crate) static TEST_CONTAINER: RefCell<Option<Container>> = const { RefCell::new(None) };
}

/// Type-erased bindings keyed by `TypeId`
#[derive(Default)]
pub struct Container {
    bindings: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a concrete singleton
    pub fn singleton<T: Any + Send + Sync + 'static>(&mut self, instance: T) {
        self.bindings.insert(TypeId::of::<T>(), Arc::new(instance));
    }

    /// Bind a trait object; stored under `TypeId::of::<Arc<T>>()`
    pub fn bind<T: ?Sized + Send + Sync + 'static>(&mut self, instance: Arc<T>) {
        self.bindings.insert(TypeId::of::<Arc<T>>(), Arc::new(instance));
    }

    pub fn get<T: Any + Send + Sync + Clone + 'static>(&self) -> Option<T> {
        self.bindings
            .get(&TypeId::of::<T>())?
            .downcast_ref::<T>()
            .cloned()
    }

    pub fn make<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.bindings
            .get(&TypeId::of::<Arc<T>>())?
            .downcast_ref::<Arc<T>>()
            .cloned()
    }

    pub fn has<T: Any + 'static>(&self) -> bool {
        self.bindings.contains_key(&TypeId::of::<T>())
    }

    pub fn has_binding<T: ?Sized + 'static>(&self) -> bool {
        self.bindings.contains_key(&TypeId::of::<Arc<T>>())
    }
}

fn global() -> &'static RwLock<Container> {
    APP_CONTAINER.get_or_init(|| RwLock::new(Container::new()))
}

/// Container facade
///
/// Resolution checks the thread-local test container first.
pub struct App;

impl App {
    pub fn init() {
        global();
    }

    pub fn singleton<T: Any + Send + Sync + 'static>(instance: T) {
        if let Ok(mut c) = global().write() {
            c.singleton(instance);
        }
    }

    pub fn bind<T: ?Sized + Send + Sync + 'static>(instance: Arc<T>) {
        if let Ok(mut c) = global().write() {
            c.bind(instance);
        }
    }

    pub fn get<T: Any + Send + Sync + Clone + 'static>() -> Option<T> {
        let faked = TEST_CONTAINER.with(|c| c.borrow().as_ref().and_then(|c| c.get::<T>()));
        if faked.is_some() {
            return faked;
        }
        global().read().ok()?.get::<T>()
    }

    pub fn make<T: ?Sized + Send + Sync + 'static>() -> Option<Arc<T>> {
        let faked = TEST_CONTAINER.with(|c| c.borrow().as_ref().and_then(|c| c.make::<T>()));
        if faked.is_some() {
            return faked;
        }
        global().read().ok()?.make::<T>()
    }

    /// Resolve a concrete type or fail with a 500
    pub fn resolve<T: Any + Send + Sync + Clone + 'static>() -> Result<T, FrameworkError> {
        Self::get::<T>().ok_or_else(FrameworkError::service_not_found::<T>)
    }

    /// Resolve a trait binding or fail with a 500
    pub fn resolve_make<T: ?Sized + Send + Sync + 'static>() -> Result<Arc<T>, FrameworkError> {
        Self::make::<T>().ok_or_else(FrameworkError::service_not_found::<T>)
    }

    pub fn has<T: Any + 'static>() -> bool {
        TEST_CONTAINER.with(|c| c.borrow().as_ref().is_some_and(|c| c.has::<T>()))
            || global().read().map(|c| c.has::<T>()).unwrap_or(false)
    }

    pub fn has_binding<T: ?Sized + 'static>() -> bool {
        TEST_CONTAINER.with(|c| c.borrow().as_ref().is_some_and(|c| c.has_binding::<T>()))
            || global().read().map(|c| c.has_binding::<T>()).unwrap_or(false)
    }

    /// Register every `#[injectable]` type
    pub fn boot_services() {
        provider::bootstrap();
    }
}

/// Bind a trait to an implementation, wrapping it in `Arc`
///
/// ```rust,ignore
/// bind!(dyn Mailer, LogMailer);
/// ```
#[macro_export]
macro_rules! bind {
    ($trait:ty, $instance:expr) => {
        $crate::App::bind::<$trait>(::std::sync::Arc::new($instance) as ::std::sync::Arc<$trait>)
    };
}

#[macro_export]
macro_rules! singleton {
    ($instance:expr) => {
        $crate::App::singleton($instance)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct English;

    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    #[test]
    fn test_bind_and_make_trait_object() {
        let mut container = Container::new();
        container.bind::<dyn Greeter>(Arc::new(English));
        container.singleton(42u32);

        assert!(container.has_binding::<dyn Greeter>());
        assert_eq!(container.make::<dyn Greeter>().map(|g| g.greet()), Some("hello".to_string()));
        assert_eq!(container.get::<u32>(), Some(42));
        assert_eq!(container.get::<u64>(), None);
    }
}

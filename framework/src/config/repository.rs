use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

type Store = HashMap<TypeId, Box<dyn Any + Send + Sync>>;

/// Config structs keyed by their type
static CONFIGS: OnceLock<RwLock<Store>> = OnceLock::new();

fn store() -> &'static RwLock<Store> {
    CONFIGS.get_or_init(|| RwLock::new(HashMap::new()))
}

pub fn register<T: Any + Send + Sync + 'static>(config: T) {
    if let Ok(mut configs) = store().write() {
        configs.insert(TypeId::of::<T>(), Box::new(config));
    }
}

pub fn get<T: Any + Send + Sync + Clone + 'static>() -> Option<T> {
    let configs = store().read().ok()?;
    configs
        .get(&TypeId::of::<T>())
        .and_then(|boxed| boxed.downcast_ref::<T>())
        .cloned()
}

pub fn has<T: Any + 'static>() -> bool {
    store()
        .read()
        .map(|configs| configs.contains_key(&TypeId::of::<T>()))
        .unwrap_or(false)
}

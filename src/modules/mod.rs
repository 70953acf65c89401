pub mod books;

use bookshelf_kernel::ModuleRegistry;

/// Register all resource modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, store: books::SharedStore) {
    registry.register_custom(books::create_module(store));
}

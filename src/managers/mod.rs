// urlstash managers
// Managers handle stateful operations over the store: the active entry
// lifecycle (create, edit, visit, query) and the trash lifecycle
// (soft-delete, restore, purge).

pub mod entry_manager;
pub mod trash_manager;

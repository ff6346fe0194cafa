mod export_modal;
mod group_directory;
mod import_modal;
mod layout;
mod picker;

pub use export_modal::ExportModal;
pub use group_directory::GroupDirectory;
pub use import_modal::ImportModal;
pub use layout::Layout;
pub use picker::Picker;

mod filters;
mod library;
mod routines;
mod users;

pub use filters::BLACKLIST_FILE;
pub use filters::WHITELIST_FILE;
pub use filters::load_filter_sets;
pub use filters::parse_titles;
pub use library::Library;
pub use library::LibraryError;
pub use library::LibraryService;
pub use library::StoredPlaylist;
pub use routines::ProgramKind;
pub use routines::Routine;
pub use routines::RoutineError;
pub use routines::RoutineStore;
pub use users::UserError;
pub use users::UserRegistry;

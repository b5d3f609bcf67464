pub mod catalog;
pub mod config;
pub mod ffmpeg;
pub mod ingest;
pub mod lifecycle;
pub mod metrics;
pub mod scanner;
pub mod testing;
pub mod title;
pub mod workdir;

pub use catalog::{
    CatalogError, CatalogStats, DirectoryKey, DuplicateDirectory, MediaCatalog, Movie,
    MovieFilter, SqliteCatalog, Subtitle, SubtitleFilter,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, ConfigOverrides,
    Resolution, SanitizedConfig,
};
pub use ingest::{CatalogWriter, GroupDetector, IngestSummary};
pub use lifecycle::{
    LifecycleState, NetworkService, ServeOutcome, ServiceContext, ServiceError, ShutdownTrigger,
    Supervisor, SupervisorError, SHUTDOWN_DEADLINE,
};
pub use scanner::{scan_dir, DirectoryEntry, EntryKind, ScanError, ScanReport};
pub use title::{normalize, ParsedTitle, ReleaseNameParser, TitleParser};
pub use workdir::{WorkDir, WorkDirError};

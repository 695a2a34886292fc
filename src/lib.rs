pub mod temp_dir;

pub use temp_dir::created_path::{CreatedPath, Encoding};
pub use temp_dir::error::{ErrorKind, MkdtempError};
pub use temp_dir::file_url::FileUrl;
pub use temp_dir::maker::{MakerConfig, MkdtempOptions, TempDirMaker};
pub use temp_dir::portability::{
	DiagnosticSink, PortabilityWarning, RecordingSink, TracingSink, process_warning,
};
pub use temp_dir::template::Template;
pub use temp_dir::{mkdtemp, mkdtemp_async};

pub mod applier;
pub mod cli;
pub mod coerce;
pub mod config;
pub mod context;
pub mod dom;
pub mod fetch;
pub mod merge;
pub mod navigate;
pub mod resolve;
pub mod selector;
pub mod telemetry;
pub mod template;

// Convenience re-exports
pub use applier::{apply_page_config, ApplyOutcome, ApplyReport};
pub use config::{ApplierSettings, SelectorSettings, Settings};
pub use context::PageContext;
pub use dom::{Document, MemoryDocument, OptionList, PropertyTarget, SelectOption};
pub use fetch::{AnyFetcher, DirFetcher, FetchError, Fetcher, HttpFetcher};
pub use merge::apply_properties;
pub use navigate::{DispatchedRedirect, Navigator, RecordingNavigator, Redirect};
pub use selector::{init_configuration, ApiEnvironment, EnvironmentMap};
pub use template::{load_template, LandingTemplate};

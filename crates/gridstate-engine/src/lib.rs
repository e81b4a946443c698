//! gridstate engine - drives a `GridState` for one data grid
//!
//! `GridEngine` applies page, sort and filter actions and then either pages
//! its own rows (local mode) or notifies the host to fetch the page from a
//! server (remote mode). Supporting pieces are usable on their own:
//!
//! - `pipeline` - filter, sort and paginate rows in memory
//! - `pagination` - the sliding window of page number links
//! - `odata` - `$top/$skip/$orderby/$filter` for remote sources
//! - `debounce` - the cancellable timer behind filter requests
//! - `settings` / `logging` - host-facing configuration

pub mod debounce;
mod engine;
mod error;
mod events;
pub mod logging;
pub mod odata;
pub mod pagination;
pub mod pipeline;
mod settings;

pub use engine::{GridEngine, Mode};
pub use error::{EngineError, EngineResult};
pub use events::{EngineEvent, RemotePage};
pub use pagination::{PageWindow, WindowShift};
pub use settings::EngineSettings;

pub use gridstate_core;

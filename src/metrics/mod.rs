pub mod keys;
pub mod monitor;
pub mod registry;
pub mod stats;
pub mod stream;
pub mod window;

pub use keys::{KeyScheme, WindowKeys};
pub use monitor::PerfMonitor;
pub use registry::{MetricDescriptor, MetricRegistry};
pub use stats::AggregateResult;
pub use window::{SampleWindow, WindowSnapshot, DEFAULT_MAX_RETAINED};

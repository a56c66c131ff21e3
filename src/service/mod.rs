pub mod demand;
pub mod forecast;
pub mod loader;
pub mod trend;
pub mod usage;

mod tabular;

pub use forecast::{run_pipeline, ForecastService, ForecastUpload, PipelineInput};

mod temp;

pub use temp::TempMetricExporter;

pub mod csv_export;

pub use csv_export::{export_approximate_csv, export_exact_csv, export_summary_csv};

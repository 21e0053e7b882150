// slideshow_cli: file formats and the command-line front end.
//
// The engine crate knows nothing about files. This crate supplies the
// pieces that do:
// - `dataset.rs`: parses the `H|V <n> tags...` dataset format.
// - `output.rs`:  formats result files and names them by timestamp, dataset
//                 and score.
// - `store.rs`:   `FileStore`, the `DatasetStore` backed by a data and an
//                 output directory.
//
// `main.rs` layers configuration (defaults, then an optional JSON file,
// then flags), sets up logging, and runs every dataset.

pub mod dataset;
pub mod output;
pub mod store;

pub use dataset::{DatasetError, parse_dataset, read_dataset};
pub use output::{OutputError, format_slideshow, result_file_name, write_slideshow};
pub use store::FileStore;

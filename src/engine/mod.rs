//! Engine module: checksum, ledger, reporter and CLI plumbing

pub mod arg_parser;
pub mod checksum;
pub mod cli;
pub mod generate;
pub mod ledger;
pub mod progress;
pub mod reporter;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::{Cli, Commands};
pub use checksum::{Fnv1a, checksum, sidecar_contents};
pub use cli::handle_run;
pub use generate::generate_test_data;
pub use ledger::Ledger;
pub use reporter::Reporter;
pub use tools::{duplicate_names, parse_package_list, read_package_list};

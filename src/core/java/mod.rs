pub mod memory;
pub mod runtime;

pub use memory::{suggested_ram_options, total_memory_bytes, RamAllocation};
pub use runtime::{resolve_runtime_executable, resolve_runtime_executable_from};

pub mod inventory;

pub use inventory::HttpInventoryClient;

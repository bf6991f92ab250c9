pub mod inventory;

pub use inventory::InventoryClient;

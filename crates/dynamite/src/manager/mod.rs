//! Item managers: typed access to one configured table.

mod error;
mod item_manager;

pub use error::{
    map_delete_item_error, map_get_item_error, map_put_item_error, ManagerError, Result,
};
pub use item_manager::{ItemManager, SharedServices};

pub mod cart;
pub mod storage;

pub use cart::{CartStore, InMemoryCart};
pub use storage::SqliteCart;

//! Item/Key Model
//!
//! Value types for stored records and their composite identity.
//!
//! ## Shape
//! ```text
//! Item
//! ├── primary_key: Key { partition_key, sort_key? }   (derived at write time)
//! └── attributes:  name -> AttributeValue            (owned payload)
//! ```
//!
//! Keys are derived from the attributes under the table's configured
//! key-attribute names and never change afterwards.

mod value;
mod key;
mod item;

pub use value::{AttributeValue, Attributes};
pub use key::Key;
pub use item::Item;

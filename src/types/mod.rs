//! The data model the encoder walks: dtypes, typed N-dimensional storage,
//! labeled containers and the dynamic value tree.

mod array;
mod dtype;
mod frame;
mod value;

pub use array::{Item, NdArray, NdView};
pub use dtype::DType;
pub use frame::{Block, DataFrame, Index, Series};
pub use value::{AttrValue, Attribute, Decimal, Opaque, Value};

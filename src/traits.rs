//! This module defines shared traits used to read typed array elements generically.

use crate::types::Item;

/// Converts a native array element into the encoder's item representation.
pub trait ToItem {
    fn to_item(&self) -> Item<'static>;
}

// Implement the trait for all primitive element types.
macro_rules! impl_to_item {
    ($variant:ident as $wide:ty: $($T:ty),+) => {
        $(
            impl ToItem for $T {
                #[inline]
                fn to_item(&self) -> Item<'static> {
                    Item::$variant(*self as $wide)
                }
            }
        )+
    };
}

impl_to_item!(Int as i64: i8, i16, i32, i64);
impl_to_item!(UInt as u64: u8, u16, u32, u64);
impl_to_item!(Float as f64: f32, f64);

impl ToItem for bool {
    #[inline]
    fn to_item(&self) -> Item<'static> {
        Item::Bool(*self)
    }
}

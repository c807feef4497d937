// In: src/traversal/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Traversal Layer
// ====================================================================================
//
//   1. [Driver (Encoder)]        -> receives the root `Value` and an `EventSink`
//         |
//         `-> for every node: asks the dispatcher what to do with it
//
//   2. [Dispatcher]              -> classifies scalars, or picks a frame kind and a
//         |                         cursor from the node type and orientation
//         `-> labels are rendered here, once per node, by `kernels::labels`
//
//   3. [Cursors]                 -> array, block, sequence, mapping, attribute and
//                                   split-field cursors; each step yields a child
//                                   `Node`, which goes back to step 1
//
// Parent cursors construct their children directly and hand them back as
// `Node`s, so no traversal state is shared between nesting levels.
// ====================================================================================

pub(crate) mod array_cursor;
pub(crate) mod block_cursor;
pub(crate) mod containers;
pub(crate) mod cursor;
pub(crate) mod dispatcher;
pub mod driver;

pub use array_cursor::ArrayCursor;
pub use block_cursor::BlockCursor;
pub use driver::{DefaultHandler, Encoder};

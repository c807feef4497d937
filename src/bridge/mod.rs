// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the public-facing API of the framejson library. It wraps the
// traversal engine in a small set of stateless functions and is the boundary
// between the outside world (Arrow data, caller options) and the internal value
// model.
//
// Data Flow (Value -> JSON):
//
//   1. [Stateless API (to_json / to_json_value / encode_events)] -> Receives `&Value`
//         |
//         `-> a. Validates the `EncoderConfig` (no output on failure)
//         |
//         `-> b. Builds an `Encoder` and the requested `EventSink`
//
//   2. [Traversal Engine (traversal::driver)] -> Emits events into the sink
//
//   3. [Sink (JsonWriter / ValueSink)]         -> Returns `String` or `serde_json::Value`
//
//
// Data Flow (Arrow -> JSON):
//
//   1. [Stateless API (record_batch_to_json)] -> Receives `&RecordBatch`
//         |
//         `-> Calls `arrow_impl` to convert the batch -> block-backed `DataFrame`
//
//   2. Continues as `to_json` above.
//
// ====================================================================================
pub mod arrow_impl;
pub mod stateless_api;

pub use arrow_impl::{arrow_to_ndarray, record_batch_to_frame};
pub use stateless_api::{
    encode_events, record_batch_to_json, to_json, to_json_value, to_json_with_handler,
};

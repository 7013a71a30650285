//! Data source clients.
//!
//! Each client turns a third-party payload into `RawMeasurement`s. The
//! pipeline never sees transport errors: a failed fetch becomes an empty
//! batch.

pub mod openaq;

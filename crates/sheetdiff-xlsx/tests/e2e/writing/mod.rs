//! Writing tests - the exporter's output must read back to the same model.

mod roundtrip;

//! # Agora Test Suite
//!
//! Cross-crate scenarios that exercise several services together.
//!
//! ```text
//! tests/
//! ├── src/integration/   # Multi-crate flows
//! └── benches/           # Criterion benchmarks
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ag-tests
//! cargo test -p ag-tests integration::broker_fallback
//! cargo bench -p ag-tests
//! ```

pub mod integration;

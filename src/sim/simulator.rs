//! Balance simulator: a greedy bot plays the pure transitions tick by tick.
//! Run with: cargo test simulate_greedy -- --nocapture

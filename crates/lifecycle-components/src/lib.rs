//! Sample components built on `lifecycle-core`.
//!
//! - [`LifeCycleSample`] exercises every hook: derived colour state, the
//!   `number % 10 == 4` veto, snapshot capture of the heading colour.
//! - [`EventPractice`] shows event handlers as plain functions over an
//!   instance.
//! - [`MyComponent`] is stateless and validates its props.

pub mod event_practice;
pub mod life_cycle_sample;
pub mod my_component;
pub mod tests;

pub use event_practice::*;
pub use life_cycle_sample::*;
pub use my_component::*;

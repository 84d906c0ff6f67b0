pub mod core;
pub mod gui;
pub mod render;
pub mod run_effect;
pub mod runtime;

#[cfg(test)]
mod tests;

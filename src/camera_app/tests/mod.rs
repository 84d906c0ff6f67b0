mod core_test;
mod runtime_test;

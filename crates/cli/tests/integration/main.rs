mod common;
mod extract_tests;
mod pack_tests;

/// Unit test harness for the public library API
mod basic_tests;

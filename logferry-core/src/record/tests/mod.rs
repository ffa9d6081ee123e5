mod address_tests;
mod raw_tests;

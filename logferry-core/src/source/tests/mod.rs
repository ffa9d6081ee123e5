mod framing_tests;
mod socket_tests;

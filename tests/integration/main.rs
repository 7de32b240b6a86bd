//! Integration tests for poly-majority

mod clob_test;
mod config_test;
mod e2e_test;
mod gamma_test;
mod market_test;

//! Testing utilities for extraction directives.
//!
//! This module provides:
//! - HTML page and table builders shaped like portal markup
//! - Assertions over extraction outcomes

mod assertions;
mod fixtures;

pub use assertions::{
    assert_found, assert_record_count, assert_section_missing, assert_table_missing,
};
pub use fixtures::{PageFixture, TableFixture};

//! Reading tests - verify the reader's tabular model for hand-built packages.

mod dates;
mod layout;
mod values;

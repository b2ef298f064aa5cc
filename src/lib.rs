pub use kiln_internal::*;

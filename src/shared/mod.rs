pub mod clock;
pub mod shutdown;
pub mod types;
pub mod validations;

pub use clock::*;
pub use shutdown::*;
pub use types::*;
pub use validations::*;

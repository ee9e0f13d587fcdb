pub mod money;
pub mod shutdown;
pub mod types;
pub mod validations;

pub use money::*;
pub use shutdown::*;
pub use types::*;
pub use validations::*;

mod careers;
mod contact;
mod health_check;

pub use careers::*;
pub use contact::*;
pub use health_check::*;

pub mod navigate;
pub mod session;

pub use navigate::Navigator;

pub mod lookup;
pub mod request;

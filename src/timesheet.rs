pub(crate) mod decode;
pub(crate) mod model;
pub mod payload;
